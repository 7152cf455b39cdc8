use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomNumber {
    pub number: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddNumbersRequest {
    pub num1: i64,
    pub num2: i64,
}

/// Sum as computed by the backend, echoing the operands it received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddNumbersResponse {
    pub num1: i64,
    pub num2: i64,
    pub result: i64,
}

impl fmt::Display for AddNumbersResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} = {}", self.num1, self.num2, self.result)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_request_shape() {
        let body = serde_json::to_value(AddNumbersRequest { num1: 2, num2: 3 }).unwrap();
        assert_eq!(body, json!({"num1": 2, "num2": 3}));
    }

    #[test]
    fn test_add_response_parse_and_display() {
        let parsed: AddNumbersResponse =
            serde_json::from_value(json!({"num1": 2, "num2": 3, "result": 5})).unwrap();
        assert_eq!(parsed, AddNumbersResponse { num1: 2, num2: 3, result: 5 });
        assert_eq!(parsed.to_string(), "2 + 3 = 5");
    }

    #[test]
    fn test_random_number_ignores_extra_fields() {
        let parsed: RandomNumber =
            serde_json::from_value(json!({"number": 42, "min": 1, "max": 100})).unwrap();
        assert_eq!(parsed.number, 42);
    }

    #[test]
    fn test_random_number_rejects_non_integer() {
        assert!(serde_json::from_value::<RandomNumber>(json!({"number": "42"})).is_err());
        assert!(serde_json::from_value::<RandomNumber>(json!({})).is_err());
    }
}
