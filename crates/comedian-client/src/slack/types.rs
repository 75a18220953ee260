//! Slack Web API response shapes

use comedian_core::entities::WorkspaceMember;
use serde::Deserialize;

/// `auth.test`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthInfo {
    pub user_id: String,
    pub team_id: String,
    #[serde(default)]
    pub team: String,
}

/// `apps.connections.open`
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionUrl {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConversationEnvelope {
    pub channel: ConversationInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConversationInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UsersPage {
    #[serde(default)]
    pub members: Vec<SlackMember>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl UsersPage {
    /// Cursor of the next page; Slack sends an empty string on the last one
    pub fn next_cursor(&self) -> Option<&str> {
        self.response_metadata
            .as_ref()
            .map(|m| m.next_cursor.as_str())
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SlackProfile {
    #[serde(default)]
    pub real_name: String,
}

/// Entry of `users.list`
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SlackMember {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub profile: SlackProfile,
    #[serde(default)]
    pub tz: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub deleted: bool,
}

impl From<SlackMember> for WorkspaceMember {
    fn from(m: SlackMember) -> Self {
        let real_name = m.real_name.unwrap_or(m.profile.real_name);
        // Slackbot is a bot but Slack does not flag it as one
        let is_bot = m.is_bot || m.id == "USLACKBOT";
        WorkspaceMember {
            user_id: m.id,
            user_name: m.name,
            real_name,
            tz: m.tz.unwrap_or_default(),
            is_admin: m.is_admin,
            is_owner: m.is_owner,
            is_bot,
            deleted: m.deleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_real_name_fallback() {
        let m: SlackMember = serde_json::from_value(serde_json::json!({
            "id": "U1",
            "name": "alice",
            "profile": {"real_name": "Alice A"},
            "is_owner": true
        }))
        .unwrap();
        let member = WorkspaceMember::from(m);
        assert_eq!(member.real_name, "Alice A");
        assert!(member.is_owner);
        assert!(!member.is_bot);
    }

    #[test]
    fn test_slackbot_is_bot() {
        let m = SlackMember {
            id: "USLACKBOT".to_string(),
            ..Default::default()
        };
        assert!(WorkspaceMember::from(m).is_bot);
    }

    #[test]
    fn test_next_cursor() {
        let page: UsersPage = serde_json::from_value(serde_json::json!({
            "members": [],
            "response_metadata": {"next_cursor": ""}
        }))
        .unwrap();
        assert_eq!(page.next_cursor(), None);

        let page: UsersPage = serde_json::from_value(serde_json::json!({
            "members": [],
            "response_metadata": {"next_cursor": "dXNlcjpVMEc5V0ZYTlo="}
        }))
        .unwrap();
        assert_eq!(page.next_cursor(), Some("dXNlcjpVMEc5V0ZYTlo="));
    }
}
