use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request to send a direct message
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "from_user_id", rename = "fromUserId", default)]
    pub from_user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "to_user_id", rename = "toUserId", default)]
    pub to_user_id: String,
    #[validate(custom(function = "validate_not_blank"))]
    #[serde(default)]
    pub message: String,
    #[serde(alias = "from_user_name", rename = "fromUserName", default)]
    pub from_user_name: Option<String>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(from: &str, to: &str, message: &str) -> SendMessageRequest {
        SendMessageRequest {
            from_user_id: from.to_string(),
            to_user_id: to.to_string(),
            message: message.to_string(),
            from_user_name: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("a", "b", "hello").validate().is_ok());
    }

    #[test]
    fn test_missing_fields_rejected() {
        assert!(request("", "b", "hello").validate().is_err());
        assert!(request("a", "", "hello").validate().is_err());
        assert!(request("a", "b", "").validate().is_err());
        assert!(request("a", "b", "   ").validate().is_err());
    }

    #[test]
    fn test_missing_json_fields_default_to_empty() {
        let req: SendMessageRequest = serde_json::from_str(r#"{"fromUserId":"a"}"#).unwrap();
        assert_eq!(req.to_user_id, "");
        assert!(req.validate().is_err());
    }
}
