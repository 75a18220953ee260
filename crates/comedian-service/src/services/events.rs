//! Routes inbound chat events to the services that own them

use chrono::Utc;
use comedian_core::entities::BotSettings;
use comedian_core::ChatEvent;
use tracing::instrument;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::roster::RosterService;
use super::standup::StandupService;

pub struct EventService<'a> {
    ctx: &'a ServiceContext,
    settings: &'a BotSettings,
}

impl<'a> EventService<'a> {
    pub fn new(ctx: &'a ServiceContext, settings: &'a BotSettings) -> Self {
        Self { ctx, settings }
    }

    #[instrument(skip(self, event), fields(channel_id = %event.channel_id()))]
    pub async fn handle(&self, event: &ChatEvent) -> ServiceResult<()> {
        let standups = StandupService::new(self.ctx, self.settings);
        let roster = RosterService::new(self.ctx, self.settings);

        match event {
            ChatEvent::MessageCreated(message) => {
                standups.handle_message(message, Utc::now()).await?;
            }
            ChatEvent::MessageEdited(message) => {
                standups.handle_edit(message, Utc::now()).await?;
            }
            ChatEvent::MessageDeleted(payload) => {
                standups.handle_delete(payload).await?;
            }
            ChatEvent::MemberJoinedChannel(payload) => roster.member_joined(payload).await?,
            ChatEvent::MemberLeftChannel(payload) => roster.member_left(payload).await?,
            ChatEvent::BotRemovedFromChannel(payload) => roster.bot_removed(payload).await?,
        }
        Ok(())
    }
}
