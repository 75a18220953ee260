//! In-memory implementations for unit testing without PostgreSQL or Slack.
//!
//! Enabled with the `test-support` feature:
//!
//! ```toml
//! [dev-dependencies]
//! comedian-core = { workspace = true, features = ["test-support"] }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;

use crate::entities::{
    Attachment, BotSettings, Channel, NotificationThread, Standup, Standuper, TimeTable, User,
    WorkspaceMember,
};
use crate::error::DomainError;
use crate::traits::{
    BotSettingsRepository, ChannelRepository, ChatGateway, Collector, CollectorData,
    CollectorScope, NotificationThreadRepository, RepoResult, StandupQuery, StandupRepository,
    StanduperRepository, TimeTableRepository, UserRepository,
};

// ── InMemoryStore ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct Tables {
    bots: Vec<BotSettings>,
    channels: Vec<Channel>,
    standupers: Vec<Standuper>,
    users: Vec<User>,
    standups: Vec<Standup>,
    timetables: Vec<TimeTable>,
    threads: Vec<NotificationThread>,
}

/// Implements every repository trait over shared vectors.
///
/// Deletes cascade the same way the PostgreSQL foreign keys do.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    next_id: Arc<AtomicI64>,
    fail: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a database error
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn standups(&self) -> Vec<Standup> {
        self.tables.lock().standups.clone()
    }

    pub fn threads(&self) -> Vec<NotificationThread> {
        self.tables.lock().threads.clone()
    }

    fn id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn check(&self) -> RepoResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BotSettingsRepository for InMemoryStore {
    async fn find_by_team(&self, team_id: &str) -> RepoResult<Option<BotSettings>> {
        self.check()?;
        let t = self.tables.lock();
        Ok(t.bots.iter().find(|b| b.team_id == team_id).cloned())
    }

    async fn list(&self) -> RepoResult<Vec<BotSettings>> {
        self.check()?;
        Ok(self.tables.lock().bots.clone())
    }

    async fn upsert(&self, settings: &BotSettings) -> RepoResult<BotSettings> {
        self.check()?;
        let mut t = self.tables.lock();
        if let Some(existing) = t.bots.iter_mut().find(|b| b.team_id == settings.team_id) {
            let id = existing.id;
            *existing = settings.clone();
            existing.id = id;
            return Ok(existing.clone());
        }
        let mut stored = settings.clone();
        stored.id = self.id();
        t.bots.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl ChannelRepository for InMemoryStore {
    async fn find_by_channel_id(&self, channel_id: &str) -> RepoResult<Option<Channel>> {
        self.check()?;
        let t = self.tables.lock();
        Ok(t.channels.iter().find(|c| c.channel_id == channel_id).cloned())
    }

    async fn list_by_team(&self, team_id: &str) -> RepoResult<Vec<Channel>> {
        self.check()?;
        let t = self.tables.lock();
        Ok(t.channels.iter().filter(|c| c.team_id == team_id).cloned().collect())
    }

    async fn list_active(&self, team_id: &str) -> RepoResult<Vec<Channel>> {
        self.check()?;
        let t = self.tables.lock();
        Ok(t.channels
            .iter()
            .filter(|c| c.team_id == team_id && c.is_active())
            .cloned()
            .collect())
    }

    async fn create(&self, channel: &Channel) -> RepoResult<Channel> {
        self.check()?;
        let mut t = self.tables.lock();
        if t.channels.iter().any(|c| c.channel_id == channel.channel_id) {
            return Err(DomainError::ChannelAlreadyExists(channel.channel_id.clone()));
        }
        let mut stored = channel.clone();
        stored.id = self.id();
        t.channels.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, channel: &Channel) -> RepoResult<()> {
        self.check()?;
        let mut t = self.tables.lock();
        let existing = t
            .channels
            .iter_mut()
            .find(|c| c.channel_id == channel.channel_id)
            .ok_or_else(|| DomainError::ChannelNotFound(channel.channel_id.clone()))?;
        *existing = channel.clone();
        Ok(())
    }

    async fn delete(&self, channel_id: &str) -> RepoResult<()> {
        self.check()?;
        let mut t = self.tables.lock();
        let before = t.channels.len();
        t.channels.retain(|c| c.channel_id != channel_id);
        if t.channels.len() == before {
            return Err(DomainError::ChannelNotFound(channel_id.to_string()));
        }
        t.standupers.retain(|s| s.channel_id != channel_id);
        t.timetables.retain(|tt| tt.channel_id != channel_id);
        t.threads.retain(|th| th.channel_id != channel_id);
        Ok(())
    }
}

#[async_trait]
impl StanduperRepository for InMemoryStore {
    async fn find(&self, user_id: &str, channel_id: &str) -> RepoResult<Option<Standuper>> {
        self.check()?;
        let t = self.tables.lock();
        Ok(t.standupers
            .iter()
            .find(|s| s.user_id == user_id && s.channel_id == channel_id)
            .cloned())
    }

    async fn list_by_channel(&self, channel_id: &str) -> RepoResult<Vec<Standuper>> {
        self.check()?;
        let t = self.tables.lock();
        Ok(t.standupers
            .iter()
            .filter(|s| s.channel_id == channel_id)
            .cloned()
            .collect())
    }

    async fn list_by_user(&self, team_id: &str, user_id: &str) -> RepoResult<Vec<Standuper>> {
        self.check()?;
        let t = self.tables.lock();
        Ok(t.standupers
            .iter()
            .filter(|s| s.team_id == team_id && s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, standuper: &Standuper) -> RepoResult<Standuper> {
        self.check()?;
        let mut t = self.tables.lock();
        if t.standupers.iter().any(|s| {
            s.team_id == standuper.team_id
                && s.user_id == standuper.user_id
                && s.channel_id == standuper.channel_id
        }) {
            return Err(DomainError::StanduperAlreadyExists {
                user_id: standuper.user_id.clone(),
                channel_id: standuper.channel_id.clone(),
            });
        }
        let mut stored = standuper.clone();
        stored.id = self.id();
        t.standupers.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        self.check()?;
        let mut t = self.tables.lock();
        let Some(pos) = t.standupers.iter().position(|s| s.id == id) else {
            return Err(DomainError::StanduperIdNotFound(id));
        };
        t.standupers.remove(pos);
        t.timetables.retain(|tt| tt.standuper_id != id);
        Ok(())
    }

    async fn delete_by_user(&self, team_id: &str, user_id: &str) -> RepoResult<u64> {
        self.check()?;
        let mut t = self.tables.lock();
        let ids: HashSet<i64> = t
            .standupers
            .iter()
            .filter(|s| s.team_id == team_id && s.user_id == user_id)
            .map(|s| s.id)
            .collect();
        t.standupers.retain(|s| !ids.contains(&s.id));
        t.timetables.retain(|tt| !ids.contains(&tt.standuper_id));
        Ok(ids.len() as u64)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find(&self, team_id: &str, user_id: &str) -> RepoResult<Option<User>> {
        self.check()?;
        let t = self.tables.lock();
        Ok(t.users
            .iter()
            .find(|u| u.team_id == team_id && u.user_id == user_id)
            .cloned())
    }

    async fn list_by_team(&self, team_id: &str) -> RepoResult<Vec<User>> {
        self.check()?;
        let t = self.tables.lock();
        Ok(t.users.iter().filter(|u| u.team_id == team_id).cloned().collect())
    }

    async fn upsert(&self, user: &User) -> RepoResult<User> {
        self.check()?;
        let mut t = self.tables.lock();
        if let Some(existing) = t
            .users
            .iter_mut()
            .find(|u| u.team_id == user.team_id && u.user_id == user.user_id)
        {
            let id = existing.id;
            *existing = user.clone();
            existing.id = id;
            return Ok(existing.clone());
        }
        let mut stored = user.clone();
        stored.id = self.id();
        t.users.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, team_id: &str, user_id: &str) -> RepoResult<()> {
        self.check()?;
        let mut t = self.tables.lock();
        let before = t.users.len();
        t.users
            .retain(|u| !(u.team_id == team_id && u.user_id == user_id));
        if t.users.len() == before {
            return Err(DomainError::UserNotFound(user_id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl StandupRepository for InMemoryStore {
    async fn create(&self, standup: &Standup) -> RepoResult<Standup> {
        self.check()?;
        let mut stored = standup.clone();
        stored.id = self.id();
        self.tables.lock().standups.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, standup: &Standup) -> RepoResult<()> {
        self.check()?;
        let mut t = self.tables.lock();
        let existing = t
            .standups
            .iter_mut()
            .find(|s| s.id == standup.id)
            .ok_or_else(|| DomainError::StandupNotFound(standup.message_ts.clone()))?;
        existing.comment.clone_from(&standup.comment);
        existing.modified_at = standup.modified_at;
        Ok(())
    }

    async fn find_by_message_ts(
        &self,
        channel_id: &str,
        ts: &str,
    ) -> RepoResult<Option<Standup>> {
        self.check()?;
        let t = self.tables.lock();
        Ok(t.standups
            .iter()
            .find(|s| s.channel_id == channel_id && s.message_ts == ts)
            .cloned())
    }

    async fn delete_by_message_ts(&self, channel_id: &str, ts: &str) -> RepoResult<()> {
        self.check()?;
        let mut t = self.tables.lock();
        let before = t.standups.len();
        t.standups
            .retain(|s| !(s.channel_id == channel_id && s.message_ts == ts));
        if t.standups.len() == before {
            return Err(DomainError::StandupNotFound(ts.to_string()));
        }
        Ok(())
    }

    async fn find_submitted(
        &self,
        user_id: &str,
        channel_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Option<Standup>> {
        self.check()?;
        let query = StandupQuery::between(from, to).user(user_id).channel(channel_id);
        let t = self.tables.lock();
        Ok(t.standups.iter().find(|s| query.matches(s)).cloned())
    }

    async fn submitted_user_ids(
        &self,
        channel_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Vec<String>> {
        self.check()?;
        let query = StandupQuery::between(from, to).channel(channel_id);
        let t = self.tables.lock();
        let mut ids: Vec<String> = t
            .standups
            .iter()
            .filter(|s| query.matches(s))
            .map(|s| s.user_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn list(&self, query: &StandupQuery) -> RepoResult<Vec<Standup>> {
        self.check()?;
        let t = self.tables.lock();
        let mut out: Vec<Standup> = t.standups.iter().filter(|s| query.matches(s)).cloned().collect();
        out.sort_by_key(|s| s.created_at);
        Ok(out)
    }
}

#[async_trait]
impl TimeTableRepository for InMemoryStore {
    async fn find_by_standuper(&self, standuper_id: i64) -> RepoResult<Option<TimeTable>> {
        self.check()?;
        let t = self.tables.lock();
        Ok(t.timetables
            .iter()
            .find(|tt| tt.standuper_id == standuper_id)
            .cloned())
    }

    async fn list_by_channel(&self, channel_id: &str) -> RepoResult<Vec<TimeTable>> {
        self.check()?;
        let t = self.tables.lock();
        Ok(t.timetables
            .iter()
            .filter(|tt| tt.channel_id == channel_id)
            .cloned()
            .collect())
    }

    async fn save(&self, timetable: &TimeTable) -> RepoResult<TimeTable> {
        self.check()?;
        let mut t = self.tables.lock();
        if let Some(existing) = t
            .timetables
            .iter_mut()
            .find(|tt| tt.standuper_id == timetable.standuper_id)
        {
            existing.days = timetable.days;
            return Ok(existing.clone());
        }
        let mut stored = timetable.clone();
        stored.id = self.id();
        t.timetables.push(stored.clone());
        Ok(stored)
    }

    async fn delete_by_standuper(&self, standuper_id: i64) -> RepoResult<()> {
        self.check()?;
        let mut t = self.tables.lock();
        let before = t.timetables.len();
        t.timetables.retain(|tt| tt.standuper_id != standuper_id);
        if t.timetables.len() == before {
            return Err(DomainError::TimeTableNotFound(standuper_id));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationThreadRepository for InMemoryStore {
    async fn find_by_channel(&self, channel_id: &str) -> RepoResult<Option<NotificationThread>> {
        self.check()?;
        let t = self.tables.lock();
        Ok(t.threads.iter().find(|th| th.channel_id == channel_id).cloned())
    }

    async fn create(&self, thread: &NotificationThread) -> RepoResult<NotificationThread> {
        self.check()?;
        let mut t = self.tables.lock();
        t.threads.retain(|th| th.channel_id != thread.channel_id);
        let mut stored = thread.clone();
        stored.id = self.id();
        t.threads.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, thread: &NotificationThread) -> RepoResult<()> {
        self.check()?;
        let mut t = self.tables.lock();
        let existing = t
            .threads
            .iter_mut()
            .find(|th| th.id == thread.id)
            .ok_or(DomainError::NotificationThreadNotFound(thread.id))?;
        *existing = thread.clone();
        Ok(())
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        self.check()?;
        let mut t = self.tables.lock();
        let before = t.threads.len();
        t.threads.retain(|th| th.id != id);
        if t.threads.len() == before {
            return Err(DomainError::NotificationThreadNotFound(id));
        }
        Ok(())
    }

    async fn delete_by_channel(&self, channel_id: &str) -> RepoResult<u64> {
        self.check()?;
        let mut t = self.tables.lock();
        let before = t.threads.len();
        t.threads.retain(|th| th.channel_id != channel_id);
        Ok((before - t.threads.len()) as u64)
    }
}

// ── MockChatGateway ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentKind {
    Channel,
    Ephemeral,
    Direct,
}

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub kind: SentKind,
    /// Channel id, or the user id for direct messages
    pub target: String,
    /// Recipient of an ephemeral message
    pub user_id: Option<String>,
    pub text: String,
    pub attachments: Vec<Attachment>,
}

/// Records every outbound message during a test run.
#[derive(Clone, Default)]
pub struct MockChatGateway {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    members: Arc<Mutex<Vec<WorkspaceMember>>>,
    channel_names: Arc<Mutex<HashMap<String, String>>>,
    failing_channels: Arc<Mutex<HashSet<String>>>,
}

impl MockChatGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    /// Messages posted to a channel, excluding ephemeral ones
    pub fn channel_messages(&self, channel_id: &str) -> Vec<SentMessage> {
        self.sent
            .lock()
            .iter()
            .filter(|m| m.kind == SentKind::Channel && m.target == channel_id)
            .cloned()
            .collect()
    }

    pub fn ephemerals(&self) -> Vec<SentMessage> {
        self.sent
            .lock()
            .iter()
            .filter(|m| m.kind == SentKind::Ephemeral)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }

    pub fn set_members(&self, members: Vec<WorkspaceMember>) {
        *self.members.lock() = members;
    }

    pub fn set_channel_name(&self, channel_id: &str, name: &str) {
        self.channel_names
            .lock()
            .insert(channel_id.to_string(), name.to_string());
    }

    /// Sends to this channel fail with a gateway error
    pub fn fail_channel(&self, channel_id: &str) {
        self.failing_channels.lock().insert(channel_id.to_string());
    }

    fn record(&self, message: SentMessage) -> RepoResult<()> {
        if self.failing_channels.lock().contains(&message.target) {
            return Err(DomainError::ChatGatewayError(format!(
                "channel_not_found: {}",
                message.target
            )));
        }
        self.sent.lock().push(message);
        Ok(())
    }
}

#[async_trait]
impl ChatGateway for MockChatGateway {
    async fn send_message(
        &self,
        channel_id: &str,
        text: &str,
        attachments: &[Attachment],
    ) -> RepoResult<()> {
        self.record(SentMessage {
            kind: SentKind::Channel,
            target: channel_id.to_string(),
            user_id: None,
            text: text.to_string(),
            attachments: attachments.to_vec(),
        })
    }

    async fn send_ephemeral(&self, channel_id: &str, user_id: &str, text: &str) -> RepoResult<()> {
        self.record(SentMessage {
            kind: SentKind::Ephemeral,
            target: channel_id.to_string(),
            user_id: Some(user_id.to_string()),
            text: text.to_string(),
            attachments: Vec::new(),
        })
    }

    async fn send_direct_message(&self, user_id: &str, text: &str) -> RepoResult<()> {
        self.record(SentMessage {
            kind: SentKind::Direct,
            target: user_id.to_string(),
            user_id: Some(user_id.to_string()),
            text: text.to_string(),
            attachments: Vec::new(),
        })
    }

    async fn channel_name(&self, channel_id: &str) -> RepoResult<String> {
        Ok(self
            .channel_names
            .lock()
            .get(channel_id)
            .cloned()
            .unwrap_or_else(|| channel_id.to_lowercase()))
    }

    async fn list_members(&self) -> RepoResult<Vec<WorkspaceMember>> {
        Ok(self.members.lock().clone())
    }
}

// ── MockCollector ─────────────────────────────────────────────────────────────

/// Canned Collector responses keyed by scope path.
///
/// Unknown scopes return zeroes. `set_failing(true)` makes every call error.
#[derive(Clone, Default)]
pub struct MockCollector {
    data: Arc<Mutex<HashMap<String, CollectorData>>>,
    fail: Arc<AtomicBool>,
    calls: Arc<Mutex<Vec<(String, NaiveDate, NaiveDate)>>>,
}

impl MockCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, scope: &CollectorScope, data: CollectorData) {
        self.data.lock().insert(scope.path(), data);
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<(String, NaiveDate, NaiveDate)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Collector for MockCollector {
    async fn fetch(
        &self,
        _team_name: &str,
        scope: &CollectorScope,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<CollectorData> {
        self.calls.lock().push((scope.path(), from, to));
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::CollectorError("collector unavailable".to_string()));
        }
        Ok(self.data.lock().get(&scope.path()).copied().unwrap_or_default())
    }
}
