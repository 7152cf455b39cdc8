//! Credential hashing.
//!
//! The API key is the SHA-256 of `username:password`, rendered as 64
//! lowercase hex characters. There is no salt, so the same credentials always
//! produce the same key. The backend stores the same derived value, which is
//! what makes it usable as a bearer token.

use std::fmt;

use super::sha256;

/// Length of an API key in hex characters
pub const API_KEY_LEN: usize = sha256::DIGEST_LEN * 2;

/// Number of key characters shown by `Debug`
const REDACTED_PREFIX_LEN: usize = 8;

/// Username/password pair for a single login attempt. Never persisted.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Derive the API key for these credentials
    pub fn api_key(&self) -> ApiKey {
        hash_credentials(&self.username, &self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A derived API key: 64 lowercase hex characters.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ApiKey(String);

impl ApiKey {
    fn from_digest(digest: &[u8]) -> Self {
        Self(hex::encode(digest))
    }

    /// Accept a key from outside the hasher (e.g. a seeded session slot).
    /// Returns `None` unless it is exactly 64 hex characters.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.len() == API_KEY_LEN && s.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(s.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// The value sent in the `X-API-Key` header
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix safe to show in logs and status output
    pub fn fingerprint(&self) -> &str {
        &self.0[..REDACTED_PREFIX_LEN]
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({}…)", self.fingerprint())
    }
}

fn key_material(username: &str, password: &str) -> String {
    format!("{}:{}", username, password)
}

/// Derive the API key for a username/password pair.
///
/// Uses the `sha2` crate when the `accelerated` feature is enabled and the
/// portable implementation otherwise. Output is identical either way.
pub fn hash_credentials(username: &str, password: &str) -> ApiKey {
    #[cfg(feature = "accelerated")]
    {
        use sha2::{Digest, Sha256};
        let digest = Sha256::digest(key_material(username, password).as_bytes());
        ApiKey::from_digest(&digest)
    }

    #[cfg(not(feature = "accelerated"))]
    {
        hash_credentials_portable(username, password)
    }
}

/// Derive the API key using only the portable SHA-256.
pub fn hash_credentials_portable(username: &str, password: &str) -> ApiKey {
    let digest = sha256::digest(key_material(username, password).as_bytes());
    ApiKey::from_digest(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        // sha256("alice:wonderland")
        let key = hash_credentials("alice", "wonderland");
        assert_eq!(
            key.as_str(),
            "7534dfc5bb83f1334c1dd32ff8f46bea35e851686dbed7a695cd0cf659cf01d8"
        );
    }

    #[test]
    fn test_deterministic() {
        let a = hash_credentials("user", "pass");
        let b = hash_credentials("user", "pass");
        assert_eq!(a, b);
        assert_eq!(
            a.as_str(),
            "ef4c914c591698b268db3c64163eafda7209a630f236ebf0eebf045460df723a"
        );
    }

    #[test]
    fn test_key_shape() {
        let key = hash_credentials("someone", "secret");
        assert_eq!(key.as_str().len(), API_KEY_LEN);
        assert!(key
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_empty_and_unicode_inputs() {
        assert_eq!(
            hash_credentials("", "").as_str(),
            "e7ac0786668e0ff0f02b62bd04f45ff636fd82db63b1104601c975dc005f3a67"
        );
        assert_eq!(
            hash_credentials("bob", "").as_str(),
            "92ad3f808a5eb27b6360f58d945c9c7c174c55d801d7a5427c7c4a2f51f938c7"
        );
        assert_eq!(
            hash_credentials("ünïcödé", "пароль").as_str(),
            "21713443c5f455f279ab8ab43d38bb5a4c1e6270ea3b5341cea9a79131d1a85a"
        );
    }

    #[test]
    fn test_separator_is_not_escaped() {
        // "a:b" + "c" and "a" + "b:c" both hash "a:b:c"
        assert_eq!(hash_credentials("a:b", "c"), hash_credentials("a", "b:c"));
        assert_ne!(hash_credentials("ab", "c"), hash_credentials("a", "bc"));
    }

    #[test]
    fn test_primary_matches_portable() {
        let long = "y".repeat(200);
        let pairs = [
            ("alice", "wonderland"),
            ("", ""),
            ("ünïcödé", "пароль"),
            ("a very long username that spans more than one block", "and a password to match it"),
            ("x", long.as_str()),
        ];
        for (user, pass) in pairs {
            assert_eq!(
                hash_credentials(user, pass),
                hash_credentials_portable(user, pass),
                "{}:{}",
                user,
                pass
            );
        }
    }

    #[test]
    fn test_credentials_api_key() {
        let creds = Credentials::new("alice", "wonderland");
        assert_eq!(creds.api_key(), hash_credentials("alice", "wonderland"));
    }

    #[test]
    fn test_debug_redacts() {
        let creds = Credentials::new("alice", "wonderland");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("wonderland"));

        let key = creds.api_key();
        let rendered = format!("{:?}", key);
        assert!(rendered.contains("7534dfc5"));
        assert!(!rendered.contains(key.as_str()));
    }

    #[test]
    fn test_parse() {
        let key = hash_credentials("alice", "wonderland");
        assert_eq!(ApiKey::parse(key.as_str()), Some(key.clone()));
        assert_eq!(
            ApiKey::parse(&key.as_str().to_ascii_uppercase()),
            Some(key.clone())
        );
        assert_eq!(ApiKey::parse(&format!("  {}\n", key.as_str())), Some(key));

        assert!(ApiKey::parse("").is_none());
        assert!(ApiKey::parse("abc123").is_none());
        assert!(ApiKey::parse(&"g".repeat(API_KEY_LEN)).is_none());
        assert!(ApiKey::parse(&"a".repeat(API_KEY_LEN + 1)).is_none());
    }
}
