//! Roster service
//!
//! Keeps channels, standupers and the user directory in step with what
//! happens in the workspace.

use std::collections::HashSet;

use comedian_core::entities::{BotSettings, Channel, Standuper};
use comedian_core::events::{ChannelPayload, MembershipPayload};
use comedian_core::value_objects::ChannelRole;
use comedian_core::DomainError;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Result of a directory sync
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub upserted: usize,
    pub removed: usize,
}

/// Roster service
pub struct RosterService<'a> {
    ctx: &'a ServiceContext,
    settings: &'a BotSettings,
}

impl<'a> RosterService<'a> {
    pub fn new(ctx: &'a ServiceContext, settings: &'a BotSettings) -> Self {
        Self { ctx, settings }
    }

    /// Find a channel, registering it on first sight
    #[instrument(skip(self))]
    pub async fn ensure_channel(&self, channel_id: &str) -> ServiceResult<Channel> {
        if let Some(channel) = self.ctx.channel_repo().find_by_channel_id(channel_id).await? {
            return Ok(channel);
        }

        let name = match self.ctx.chat().channel_name(channel_id).await {
            Ok(name) if !name.is_empty() => name,
            Ok(_) => channel_id.to_string(),
            Err(e) => {
                warn!(channel_id, error = %e, "Could not resolve channel name");
                channel_id.to_string()
            }
        };
        let channel = Channel::new(
            self.settings.team_id.clone(),
            channel_id.to_string(),
            name,
            self.settings.timezone.clone(),
        );

        match self.ctx.channel_repo().create(&channel).await {
            Ok(created) => {
                info!(channel_id, name = %created.channel_name, "Channel registered");
                Ok(created)
            }
            Err(DomainError::ChannelAlreadyExists(_)) => self
                .ctx
                .channel_repo()
                .find_by_channel_id(channel_id)
                .await?
                .ok_or_else(|| DomainError::ChannelNotFound(channel_id.to_string()).into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Find a standuper, enrolling the user as a developer on first sight
    #[instrument(skip(self))]
    pub async fn ensure_standuper(&self, user_id: &str, channel_id: &str) -> ServiceResult<Standuper> {
        if let Some(standuper) = self.ctx.standuper_repo().find(user_id, channel_id).await? {
            return Ok(standuper);
        }

        let standuper = Standuper::new(
            self.settings.team_id.clone(),
            user_id.to_string(),
            channel_id.to_string(),
            ChannelRole::Developer,
        );
        match self.ctx.standuper_repo().create(&standuper).await {
            Ok(created) => {
                info!(user_id, channel_id, "Standuper enrolled");
                Ok(created)
            }
            Err(DomainError::StanduperAlreadyExists { .. }) => self
                .ctx
                .standuper_repo()
                .find(user_id, channel_id)
                .await?
                .ok_or_else(|| {
                    DomainError::StanduperNotFound {
                        user_id: user_id.to_string(),
                        channel_id: channel_id.to_string(),
                    }
                    .into()
                }),
            Err(e) => Err(e.into()),
        }
    }

    /// The bot joining a channel registers it
    #[instrument(skip(self, payload), fields(channel_id = %payload.channel_id))]
    pub async fn member_joined(&self, payload: &MembershipPayload) -> ServiceResult<()> {
        if payload.user_id == self.settings.bot_user_id {
            self.ensure_channel(&payload.channel_id).await?;
        }
        Ok(())
    }

    /// A member leaving drops their standuper; the bot leaving drops the channel
    #[instrument(skip(self, payload), fields(channel_id = %payload.channel_id))]
    pub async fn member_left(&self, payload: &MembershipPayload) -> ServiceResult<()> {
        if payload.user_id == self.settings.bot_user_id {
            return self.drop_channel(&payload.channel_id).await;
        }

        if let Some(standuper) = self
            .ctx
            .standuper_repo()
            .find(&payload.user_id, &payload.channel_id)
            .await?
        {
            self.ctx.standuper_repo().delete(standuper.id).await?;
            info!(user_id = %payload.user_id, "Standuper removed after leaving channel");
        }
        Ok(())
    }

    #[instrument(skip(self, payload), fields(channel_id = %payload.channel_id))]
    pub async fn bot_removed(&self, payload: &ChannelPayload) -> ServiceResult<()> {
        self.drop_channel(&payload.channel_id).await
    }

    async fn drop_channel(&self, channel_id: &str) -> ServiceResult<()> {
        match self.ctx.channel_repo().delete(channel_id).await {
            Ok(()) => {
                info!(channel_id, "Channel removed");
                Ok(())
            }
            Err(DomainError::ChannelNotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Mirror the workspace directory into the users table.
    ///
    /// Bots are skipped. Deleted accounts lose their user row and every
    /// channel membership.
    #[instrument(skip(self), fields(team_id = %self.settings.team_id))]
    pub async fn sync_users(&self) -> ServiceResult<SyncSummary> {
        let team_id = &self.settings.team_id;
        let members = self.ctx.chat().list_members().await?;
        let mut summary = SyncSummary::default();
        let mut active = HashSet::new();

        for member in members {
            if member.is_bot || member.user_id == self.settings.bot_user_id {
                continue;
            }
            if member.deleted {
                self.remove_user(&member.user_id).await?;
                summary.removed += 1;
                continue;
            }
            active.insert(member.user_id.clone());
            self.ctx.user_repo().upsert(&member.into_user(team_id)).await?;
            summary.upserted += 1;
        }

        for user in self.ctx.user_repo().list_by_team(team_id).await? {
            if !active.contains(&user.user_id) {
                self.remove_user(&user.user_id).await?;
                summary.removed += 1;
            }
        }

        info!(upserted = summary.upserted, removed = summary.removed, "Users synced");
        Ok(summary)
    }

    async fn remove_user(&self, user_id: &str) -> ServiceResult<()> {
        let team_id = &self.settings.team_id;
        self.ctx.standuper_repo().delete_by_user(team_id, user_id).await?;
        match self.ctx.user_repo().delete(team_id, user_id).await {
            Ok(()) | Err(DomainError::UserNotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{harness, BOT, TEAM};
    use comedian_core::entities::WorkspaceMember;
    use comedian_core::traits::{ChannelRepository, StanduperRepository, UserRepository};

    fn membership(channel_id: &str, user_id: &str) -> MembershipPayload {
        MembershipPayload {
            team_id: TEAM.to_string(),
            channel_id: channel_id.to_string(),
            user_id: user_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_bot_join_registers_channel_with_name() {
        let h = harness();
        h.chat.set_channel_name("C1", "backend");
        let roster = RosterService::new(&h.ctx, &h.settings);

        roster.member_joined(&membership("C1", BOT)).await.unwrap();

        let channel = ChannelRepository::find_by_channel_id(h.store.as_ref(), "C1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(channel.channel_name, "backend");
        assert_eq!(channel.timezone, "UTC");
        assert!(!channel.is_active());
    }

    #[tokio::test]
    async fn test_regular_join_is_ignored() {
        let h = harness();
        let roster = RosterService::new(&h.ctx, &h.settings);
        roster.member_joined(&membership("C1", "U1")).await.unwrap();
        assert!(ChannelRepository::find_by_channel_id(h.store.as_ref(), "C1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_member_left_removes_standuper() {
        let h = harness();
        h.channel("C1", None).await;
        h.standuper("U1", "C1", ChannelRole::Developer).await;
        let roster = RosterService::new(&h.ctx, &h.settings);

        roster.member_left(&membership("C1", "U1")).await.unwrap();
        // leaving twice is harmless
        roster.member_left(&membership("C1", "U1")).await.unwrap();

        assert!(StanduperRepository::find(h.store.as_ref(), "U1", "C1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_bot_left_drops_channel() {
        let h = harness();
        h.channel("C1", Some("10:00")).await;
        h.standuper("U1", "C1", ChannelRole::Developer).await;
        let roster = RosterService::new(&h.ctx, &h.settings);

        roster.member_left(&membership("C1", BOT)).await.unwrap();

        assert!(ChannelRepository::find_by_channel_id(h.store.as_ref(), "C1")
            .await
            .unwrap()
            .is_none());
        assert!(StanduperRepository::list_by_channel(h.store.as_ref(), "C1")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_sync_users() {
        let h = harness();
        h.user("UGONE", false).await;
        h.channel("C1", None).await;
        h.standuper("UDEL", "C1", ChannelRole::Developer).await;
        h.chat.set_members(vec![
            WorkspaceMember {
                user_id: "U1".to_string(),
                user_name: "alice".to_string(),
                is_admin: true,
                ..Default::default()
            },
            WorkspaceMember {
                user_id: "UB".to_string(),
                is_bot: true,
                ..Default::default()
            },
            WorkspaceMember {
                user_id: "UDEL".to_string(),
                deleted: true,
                ..Default::default()
            },
        ]);

        let summary = RosterService::new(&h.ctx, &h.settings)
            .sync_users()
            .await
            .unwrap();

        assert_eq!(summary.upserted, 1);
        assert_eq!(summary.removed, 2);
        let users = UserRepository::list_by_team(h.store.as_ref(), TEAM).await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].is_admin());
        assert!(StanduperRepository::find(h.store.as_ref(), "UDEL", "C1")
            .await
            .unwrap()
            .is_none());
    }
}
