//! Request DTOs for API endpoints

use serde::Deserialize;
use validator::Validate;

/// Slash command invocation as Slack posts it (form encoded)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommandRequest {
    /// Verification token; checked by the HTTP layer
    #[serde(default)]
    pub token: String,

    #[validate(length(min = 1, message = "team_id is required"))]
    pub team_id: String,

    #[validate(length(min = 2, max = 64, message = "command must be 2-64 characters"))]
    pub command: String,

    #[serde(default)]
    #[validate(length(max = 4000, message = "text must be at most 4000 characters"))]
    pub text: String,

    #[validate(length(min = 1, message = "channel_id is required"))]
    pub channel_id: String,

    #[serde(default)]
    pub channel_name: String,

    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CommandRequest {
        CommandRequest {
            token: "secret".to_string(),
            team_id: "T1".to_string(),
            command: "/comedian".to_string(),
            text: "show".to_string(),
            channel_id: "C1".to_string(),
            channel_name: "general".to_string(),
            user_id: "U1".to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut req = request();
        req.user_id.clear();
        assert!(req.validate().is_err());

        let mut req = request();
        req.command = "/".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_optional_fields_default() {
        let req: CommandRequest = serde_json::from_value(serde_json::json!({
            "team_id": "T1",
            "command": "/comedian",
            "channel_id": "C1",
            "user_id": "U1"
        }))
        .unwrap();
        assert!(req.text.is_empty());
        assert!(req.token.is_empty());
    }
}
