//! Interactive shell around the session controller.
//!
//! Reads one command per line and processes it to completion before reading
//! the next, so the controller sees exactly one state transition per event.

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use keygate_core::auth::{Credentials, TokenSlot};
use keygate_core::{SessionController, SessionError, SessionState, View};

const HELP: &str = "\
Commands:
  login [username]   Log in (password is prompted, never echoed)
  random             Fetch a random number
  add <num1> <num2>  Add two integers on the server
  logout             Forget the API key
  status             Show login state
  help               Show this help
  quit               Exit";

// ============================================================================
// Commands
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { username: Option<String> },
    Random,
    Add { num1: i64, num2: i64 },
    Logout,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parse a line of input. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match (name.to_lowercase().as_str(), args.as_slice()) {
            ("login", []) => Command::Login { username: None },
            ("login", [username]) => Command::Login {
                username: Some(username.to_string()),
            },
            ("random", []) => Command::Random,
            ("add", [a, b]) => Command::Add {
                num1: parse_integer(a)?,
                num2: parse_integer(b)?,
            },
            ("add", _) => return Err("Usage: add <num1> <num2>".to_string()),
            ("logout", []) => Command::Logout,
            ("status", []) => Command::Status,
            ("help" | "?", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            ("login" | "random" | "logout" | "status" | "help" | "quit" | "exit", _) => {
                return Err(format!("'{}' takes different arguments; type 'help'", name))
            }
            _ => return Err(format!("Unknown command '{}'; type 'help'", name)),
        };
        Ok(Some(command))
    }
}

fn parse_integer(s: &str) -> Result<i64, String> {
    s.parse()
        .map_err(|_| format!("'{}' is not an integer", s))
}

// ============================================================================
// Shell
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellState {
    Running,
    Quitting,
}

/// Source of credentials for `login`
pub trait CredentialPrompt {
    fn credentials(&mut self, username: Option<String>) -> Result<Credentials>;
}

/// Reads the username from stdin and the password from the terminal
/// without echo.
pub struct TerminalPrompt;

impl CredentialPrompt for TerminalPrompt {
    fn credentials(&mut self, username: Option<String>) -> Result<Credentials> {
        let username = match username {
            Some(username) => username,
            None => {
                print!("Username: ");
                io::stdout().flush()?;
                let mut input = String::new();
                io::stdin()
                    .read_line(&mut input)
                    .context("Failed to read username")?;
                input.trim().to_string()
            }
        };
        let password =
            rpassword::prompt_password("Password: ").context("Failed to read password")?;
        Ok(Credentials::new(username, password))
    }
}

pub struct Shell<S: TokenSlot, P: CredentialPrompt = TerminalPrompt> {
    controller: SessionController<S>,
    prompt: P,
    state: ShellState,
}

impl<S: TokenSlot> Shell<S> {
    pub fn new(controller: SessionController<S>) -> Self {
        Self::with_prompt(controller, TerminalPrompt)
    }
}

impl<S: TokenSlot, P: CredentialPrompt> Shell<S, P> {
    pub fn with_prompt(controller: SessionController<S>, prompt: P) -> Self {
        Self {
            controller,
            prompt,
            state: ShellState::Running,
        }
    }

    fn prompt_text(&self) -> &'static str {
        match self.controller.view() {
            View::Login => "keygate (logged out)> ",
            View::Dashboard => "keygate> ",
        }
    }

    /// Read and process commands until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        println!("{}", self.status());
        println!("Type 'help' for commands.");

        let stdin = io::stdin();
        while self.state == ShellState::Running {
            print!("{}", self.prompt_text());
            let _ = io::stdout().flush();

            let mut line = String::new();
            match stdin.read_line(&mut line) {
                Ok(0) => {
                    println!();
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Failed to read input, leaving shell");
                    break;
                }
            }

            let output = self.handle_line(&line).await;
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Ok(())
    }

    /// Parse and process one line of input. Returns the text to show.
    pub async fn handle_line(&mut self, line: &str) -> String {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return String::new(),
            Err(message) => return message,
        };
        debug!(?command, "Processing command");

        match command {
            Command::Login { username } if !self.controller.is_logged_in() => {
                match self.prompt.credentials(username) {
                    Ok(credentials) => self.login(&credentials).await,
                    Err(e) => {
                        warn!(error = %e, "Could not read credentials");
                        format!("Login cancelled: {:#}", e)
                    }
                }
            }
            other => self.execute(other).await,
        }
    }

    async fn login(&mut self, credentials: &Credentials) -> String {
        match self.controller.login(credentials).await {
            Ok(()) => "Login successful.".to_string(),
            Err(e) => e.to_string(),
        }
    }

    /// Process a command that needs no further input. Returns the text to show.
    pub async fn execute(&mut self, command: Command) -> String {
        match command {
            Command::Login { .. } => SessionError::AlreadyLoggedIn.to_string(),
            Command::Random => match self.controller.random_number().await {
                Ok(random) => format!("Random Number: {}", random.number),
                Err(e) => e.to_string(),
            },
            Command::Add { num1, num2 } => match self.controller.add_numbers(num1, num2).await {
                Ok(sum) => format!("Result: {}", sum),
                Err(e) => e.to_string(),
            },
            Command::Logout => {
                self.controller.logout();
                "Logged out.".to_string()
            }
            Command::Status => self.status(),
            Command::Help => HELP.to_string(),
            Command::Quit => {
                self.state = ShellState::Quitting;
                String::new()
            }
        }
    }

    fn status(&self) -> String {
        match self.controller.state() {
            SessionState::LoggedOut => format!(
                "Not logged in (server: {}).",
                self.controller.api().base_url()
            ),
            SessionState::LoggedIn(key) => format!(
                "Logged in (server: {}, key {}…).",
                self.controller.api().base_url(),
                key.fingerprint()
            ),
        }
    }
}
