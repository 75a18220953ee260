//! Outbound ports to external services: the chat workspace and the
//! optional Collector analytics service.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::repositories::RepoResult;
use crate::entities::{Attachment, WorkspaceMember};

#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Post a message visible to the whole channel
    async fn send_message(
        &self,
        channel_id: &str,
        text: &str,
        attachments: &[Attachment],
    ) -> RepoResult<()>;

    /// Post a message only `user_id` can see
    async fn send_ephemeral(&self, channel_id: &str, user_id: &str, text: &str) -> RepoResult<()>;

    async fn send_direct_message(&self, user_id: &str, text: &str) -> RepoResult<()>;

    /// Resolve a channel's display name
    async fn channel_name(&self, channel_id: &str) -> RepoResult<String>;

    /// Full member directory of the workspace
    async fn list_members(&self) -> RepoResult<Vec<WorkspaceMember>>;
}

/// What a Collector request is about
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CollectorScope {
    User(String),
    Project(String),
    UserInProject { user_id: String, project: String },
}

impl CollectorScope {
    /// `{scope}/{key}` path segments of the logger endpoint
    pub fn path(&self) -> String {
        match self {
            Self::User(user_id) => format!("users/{user_id}"),
            Self::Project(project) => format!("projects/{project}"),
            Self::UserInProject { user_id, project } => {
                format!("user-in-project/{user_id}/{project}")
            }
        }
    }
}

/// Commit and worklog totals for a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollectorData {
    pub total_commits: i64,
    /// Seconds of logged work
    pub worklogs: i64,
}

#[async_trait]
pub trait Collector: Send + Sync {
    async fn fetch(
        &self,
        team_name: &str,
        scope: &CollectorScope,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<CollectorData>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_paths() {
        assert_eq!(CollectorScope::User("U1".to_string()).path(), "users/U1");
        assert_eq!(
            CollectorScope::Project("backend".to_string()).path(),
            "projects/backend"
        );
        assert_eq!(
            CollectorScope::UserInProject {
                user_id: "U1".to_string(),
                project: "backend".to_string(),
            }
            .path(),
            "user-in-project/U1/backend"
        );
    }

    #[test]
    fn test_collector_data_from_json() {
        let data: CollectorData =
            serde_json::from_str(r#"{"total_commits": 4, "worklogs": 25200}"#).unwrap();
        assert_eq!(data.total_commits, 4);
        assert_eq!(data.worklogs, 25_200);
    }
}
