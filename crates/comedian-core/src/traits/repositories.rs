//! Repository traits (ports) - define the interface for data access
//!
//! One trait per entity. Services hold `Arc<dyn XRepository>` and only
//! reach for the methods they need; `comedian-db` provides the PostgreSQL
//! implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    BotSettings, Channel, NotificationThread, Standup, Standuper, TimeTable, User,
};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Bot Settings Repository
// ============================================================================

#[async_trait]
pub trait BotSettingsRepository: Send + Sync {
    async fn find_by_team(&self, team_id: &str) -> RepoResult<Option<BotSettings>>;

    /// All connected workspaces
    async fn list(&self) -> RepoResult<Vec<BotSettings>>;

    /// Insert or update by `team_id`, returning the stored row
    async fn upsert(&self, settings: &BotSettings) -> RepoResult<BotSettings>;
}

// ============================================================================
// Channel Repository
// ============================================================================

#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Find channel by Slack channel id
    async fn find_by_channel_id(&self, channel_id: &str) -> RepoResult<Option<Channel>>;

    /// List all channels of a workspace
    async fn list_by_team(&self, team_id: &str) -> RepoResult<Vec<Channel>>;

    /// List channels with a deadline set
    async fn list_active(&self, team_id: &str) -> RepoResult<Vec<Channel>>;

    /// Create a channel, returning it with its id
    async fn create(&self, channel: &Channel) -> RepoResult<Channel>;

    /// Update name, deadline, submission days and timezone
    async fn update(&self, channel: &Channel) -> RepoResult<()>;

    /// Delete a channel together with its standupers, timetables and
    /// notification thread
    async fn delete(&self, channel_id: &str) -> RepoResult<()>;
}

// ============================================================================
// Standuper Repository
// ============================================================================

#[async_trait]
pub trait StanduperRepository: Send + Sync {
    async fn find(&self, user_id: &str, channel_id: &str) -> RepoResult<Option<Standuper>>;

    /// Standupers of a channel in creation order
    async fn list_by_channel(&self, channel_id: &str) -> RepoResult<Vec<Standuper>>;

    /// Every channel membership of a user
    async fn list_by_user(&self, team_id: &str, user_id: &str) -> RepoResult<Vec<Standuper>>;

    /// Fails with `StanduperAlreadyExists` on a duplicate `(team, user, channel)`
    async fn create(&self, standuper: &Standuper) -> RepoResult<Standuper>;

    /// Delete a standuper and its timetable
    async fn delete(&self, id: i64) -> RepoResult<()>;

    /// Delete every membership of a user, returning how many were removed
    async fn delete_by_user(&self, team_id: &str, user_id: &str) -> RepoResult<u64>;
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find(&self, team_id: &str, user_id: &str) -> RepoResult<Option<User>>;

    async fn list_by_team(&self, team_id: &str) -> RepoResult<Vec<User>>;

    /// Insert or update by `(team_id, user_id)`
    async fn upsert(&self, user: &User) -> RepoResult<User>;

    async fn delete(&self, team_id: &str, user_id: &str) -> RepoResult<()>;
}

// ============================================================================
// Standup Repository
// ============================================================================

/// Filter for standup listings; `None` fields are not constrained
#[derive(Debug, Clone)]
pub struct StandupQuery {
    pub team_id: Option<String>,
    pub user_id: Option<String>,
    pub channel_id: Option<String>,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl StandupQuery {
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            team_id: None,
            user_id: None,
            channel_id: None,
            from,
            to,
        }
    }

    pub fn team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    /// Whether a standup matches this filter; `to` is exclusive
    pub fn matches(&self, standup: &Standup) -> bool {
        self.team_id.as_ref().is_none_or(|t| *t == standup.team_id)
            && self.user_id.as_ref().is_none_or(|u| *u == standup.user_id)
            && self
                .channel_id
                .as_ref()
                .is_none_or(|c| *c == standup.channel_id)
            && standup.created_at >= self.from
            && standup.created_at < self.to
    }
}

#[async_trait]
pub trait StandupRepository: Send + Sync {
    async fn create(&self, standup: &Standup) -> RepoResult<Standup>;

    /// Update comment and modification time
    async fn update(&self, standup: &Standup) -> RepoResult<()>;

    async fn find_by_message_ts(&self, channel_id: &str, ts: &str)
        -> RepoResult<Option<Standup>>;

    async fn delete_by_message_ts(&self, channel_id: &str, ts: &str) -> RepoResult<()>;

    /// First standup of a user in a channel within `[from, to)`
    async fn find_submitted(
        &self,
        user_id: &str,
        channel_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Option<Standup>>;

    /// Distinct users who submitted in a channel within `[from, to)`
    async fn submitted_user_ids(
        &self,
        channel_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Vec<String>>;

    /// Standups matching a query, oldest first
    async fn list(&self, query: &StandupQuery) -> RepoResult<Vec<Standup>>;
}

// ============================================================================
// TimeTable Repository
// ============================================================================

#[async_trait]
pub trait TimeTableRepository: Send + Sync {
    async fn find_by_standuper(&self, standuper_id: i64) -> RepoResult<Option<TimeTable>>;

    async fn list_by_channel(&self, channel_id: &str) -> RepoResult<Vec<TimeTable>>;

    /// Insert or replace the timetable of a standuper
    async fn save(&self, timetable: &TimeTable) -> RepoResult<TimeTable>;

    async fn delete_by_standuper(&self, standuper_id: i64) -> RepoResult<()>;
}

// ============================================================================
// Notification Thread Repository
// ============================================================================

#[async_trait]
pub trait NotificationThreadRepository: Send + Sync {
    async fn find_by_channel(&self, channel_id: &str) -> RepoResult<Option<NotificationThread>>;

    async fn create(&self, thread: &NotificationThread) -> RepoResult<NotificationThread>;

    /// Persist counter, next notification time and user ids
    async fn update(&self, thread: &NotificationThread) -> RepoResult<()>;

    async fn delete(&self, id: i64) -> RepoResult<()>;

    async fn delete_by_channel(&self, channel_id: &str) -> RepoResult<u64>;
}
