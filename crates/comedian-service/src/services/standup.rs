//! Standup service
//!
//! Turns channel messages that mention the bot into stored standups.

use chrono::{DateTime, Days, Utc};
use comedian_common::Localizer;
use comedian_core::entities::{BotSettings, Standup};
use comedian_core::events::{MessageDeletedPayload, MessagePayload};
use comedian_core::DomainError;
use tracing::{debug, info, instrument, warn};

use super::classifier::{classify, KeywordCategory};
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::roster::RosterService;

/// What happened to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Not addressed to the bot
    Ignored,
    MissingKeywords(KeywordCategory),
    AlreadySubmitted,
    Accepted,
    Updated,
}

/// Standup service
pub struct StandupService<'a> {
    ctx: &'a ServiceContext,
    settings: &'a BotSettings,
    localizer: Localizer,
}

impl<'a> StandupService<'a> {
    pub fn new(ctx: &'a ServiceContext, settings: &'a BotSettings) -> Self {
        Self {
            ctx,
            settings,
            localizer: ctx.localizer(settings),
        }
    }

    fn mention(&self) -> String {
        format!("<@{}>", self.settings.bot_user_id)
    }

    fn addresses_bot(&self, message: &MessagePayload) -> bool {
        message.user_id != self.settings.bot_user_id && message.text.contains(&self.mention())
    }

    /// Comment text with the bot mention stripped
    fn comment(&self, text: &str) -> String {
        text.replace(&self.mention(), "").trim().to_string()
    }

    /// Handle a new channel message
    #[instrument(skip(self, message), fields(channel_id = %message.channel_id, user_id = %message.user_id))]
    pub async fn handle_message(
        &self,
        message: &MessagePayload,
        now: DateTime<Utc>,
    ) -> ServiceResult<SubmissionOutcome> {
        if !self.addresses_bot(message) {
            return Ok(SubmissionOutcome::Ignored);
        }

        let roster = RosterService::new(self.ctx, self.settings);
        let channel = roster.ensure_channel(&message.channel_id).await?;
        roster
            .ensure_standuper(&message.user_id, &message.channel_id)
            .await?;

        if let Err(missing) = classify(&message.text) {
            debug!(?missing, "Message is not a standup");
            self.reply(message, &self.localizer.t(missing.message_id()))
                .await;
            return Ok(SubmissionOutcome::MissingKeywords(missing));
        }

        let today = channel.local_date(now);
        let from = channel.day_start(today);
        let to = today
            .checked_add_days(Days::new(1))
            .map_or(now, |next| channel.day_start(next));
        if self
            .ctx
            .standup_repo()
            .find_submitted(&message.user_id, &message.channel_id, from, to)
            .await?
            .is_some()
        {
            self.reply(message, &self.localizer.t("one_standup_per_day"))
                .await;
            return Ok(SubmissionOutcome::AlreadySubmitted);
        }

        let mut standup = Standup::new(
            self.settings.team_id.clone(),
            message.channel_id.clone(),
            message.user_id.clone(),
            self.comment(&message.text),
            message.ts.clone(),
        );
        standup.created_at = now;
        standup.modified_at = now;

        match self.ctx.standup_repo().create(&standup).await {
            Ok(_) => {}
            Err(DomainError::StandupAlreadySubmitted) => {
                self.reply(message, &self.localizer.t("one_standup_per_day"))
                    .await;
                return Ok(SubmissionOutcome::AlreadySubmitted);
            }
            Err(e) => return Err(e.into()),
        }

        info!("Standup accepted");
        self.reply(message, &self.localizer.t("standup_accepted"))
            .await;
        Ok(SubmissionOutcome::Accepted)
    }

    /// Handle an edited message.
    ///
    /// An edit of a stored standup replaces its comment when the new text is
    /// still a standup; otherwise the old comment is kept. An edit of an
    /// unknown message is treated as a fresh submission.
    #[instrument(skip(self, message), fields(channel_id = %message.channel_id, ts = %message.ts))]
    pub async fn handle_edit(
        &self,
        message: &MessagePayload,
        now: DateTime<Utc>,
    ) -> ServiceResult<SubmissionOutcome> {
        let Some(mut standup) = self
            .ctx
            .standup_repo()
            .find_by_message_ts(&message.channel_id, &message.ts)
            .await?
        else {
            return self.handle_message(message, now).await;
        };

        if let Err(missing) = classify(&message.text) {
            self.reply(message, &self.localizer.t(missing.message_id()))
                .await;
            return Ok(SubmissionOutcome::MissingKeywords(missing));
        }

        standup.edit(self.comment(&message.text));
        self.ctx.standup_repo().update(&standup).await?;
        info!(standup_id = standup.id, "Standup edited");
        self.reply(message, &self.localizer.t("standup_edited"))
            .await;
        Ok(SubmissionOutcome::Updated)
    }

    /// Drop the standup a deleted message carried
    #[instrument(skip(self, payload), fields(channel_id = %payload.channel_id))]
    pub async fn handle_delete(&self, payload: &MessageDeletedPayload) -> ServiceResult<bool> {
        match self
            .ctx
            .standup_repo()
            .delete_by_message_ts(&payload.channel_id, &payload.deleted_ts)
            .await
        {
            Ok(()) => {
                info!(ts = %payload.deleted_ts, "Standup removed with its message");
                Ok(true)
            }
            Err(DomainError::StandupNotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn reply(&self, message: &MessagePayload, text: &str) {
        if let Err(e) = self
            .ctx
            .chat()
            .send_ephemeral(&message.channel_id, &message.user_id, text)
            .await
        {
            warn!(error = %e, "Failed to send ephemeral reply");
        }
    }
}
