//! Notifier service
//!
//! Runs once per scheduler minute. For every channel it decides whether the
//! minute is the warning minute or the deadline minute, tags the members who
//! have not reported yet and drives the repeat cycle through a persisted
//! [`NotificationThread`], so a restarted bot neither repeats nor skips
//! reminders.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Days, DurationRound, NaiveDate, TimeDelta, Utc};
use comedian_common::Localizer;
use comedian_core::entities::{BotSettings, Channel, NotificationThread};
use comedian_core::value_objects::TimeOfDay;
use futures::future::join_all;
use tracing::{debug, error, info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// What a tick did for one channel's cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelAction {
    Idle,
    /// Pre-deadline warning tagging this many members
    Warned(usize),
    /// Deadline tag; the repeat cycle starts
    Tagged(usize),
    Repeated(usize),
    /// Everybody reported; the thread is gone
    Resolved,
    /// Repeats used up; the thread waits for rollover
    Exhausted,
    /// A store error aborted this channel for the tick
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTick {
    pub channel_id: String,
    pub action: ChannelAction,
    /// Personal timetable reminders sent
    pub individual: usize,
}

/// Truncate to the scheduler minute
pub fn minute_of(now: DateTime<Utc>) -> DateTime<Utc> {
    now.duration_trunc(TimeDelta::minutes(1)).unwrap_or(now)
}

/// Notifier service
pub struct NotifierService<'a> {
    ctx: &'a ServiceContext,
    settings: &'a BotSettings,
    localizer: Localizer,
}

impl<'a> NotifierService<'a> {
    pub fn new(ctx: &'a ServiceContext, settings: &'a BotSettings) -> Self {
        Self {
            ctx,
            settings,
            localizer: ctx.localizer(settings),
        }
    }

    /// Process every channel of the workspace for the minute containing `now`
    #[instrument(skip(self), fields(team_id = %self.settings.team_id))]
    pub async fn tick(&self, now: DateTime<Utc>) -> ServiceResult<Vec<ChannelTick>> {
        let now = minute_of(now);
        let channels = self
            .ctx
            .channel_repo()
            .list_by_team(&self.settings.team_id)
            .await?;

        let ticks = join_all(channels.iter().map(|channel| async move {
            let (action, individual) = match self.process(channel, now).await {
                Ok(result) => result,
                Err(e) => {
                    error!(channel_id = %channel.channel_id, error = %e, "Notifier failed for channel");
                    (ChannelAction::Failed, 0)
                }
            };
            ChannelTick {
                channel_id: channel.channel_id.clone(),
                action,
                individual,
            }
        }))
        .await;

        Ok(ticks)
    }

    async fn process(
        &self,
        channel: &Channel,
        now: DateTime<Utc>,
    ) -> ServiceResult<(ChannelAction, usize)> {
        let today = channel.local_date(now);
        if !channel.submission_days.includes(today.weekday()) {
            return Ok((ChannelAction::Idle, 0));
        }

        let overrides = self.overrides(channel, today).await?;
        let individual = self.individual_reminders(channel, &overrides, today, now).await?;

        let Some(deadline) = channel.deadline_on(today) else {
            return Ok((ChannelAction::Idle, individual));
        };
        let action = self
            .channel_cycle(channel, &overrides, today, deadline, now)
            .await?;
        Ok((action, individual))
    }

    async fn channel_cycle(
        &self,
        channel: &Channel,
        overrides: &HashMap<String, TimeOfDay>,
        today: NaiveDate,
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ServiceResult<ChannelAction> {
        let channel_id = channel.channel_id.as_str();
        let threads = self.ctx.thread_repo();

        let interval = self.settings.reminder_interval();
        let mut thread = threads.find_by_channel(channel_id).await?;
        if let Some(stale) = thread.take_if(|t| t.cycle_date(channel.tz(), interval) < today) {
            debug!(channel_id, "Dropping reminder thread from a previous day");
            threads.delete(stale.id).await?;
        }

        let offset = self.settings.warning_offset();
        if offset > TimeDelta::zero() && now == deadline - offset {
            let late = self.non_reporters(channel, overrides, today).await?;
            if late.is_empty() {
                return Ok(ChannelAction::Idle);
            }
            let minutes = self.settings.reminder_offset.to_string();
            let text = self.localizer.t_plural(
                "notify_warning",
                late.len() as i64,
                &[("users", &tags(&late)), ("minutes", &minutes)],
            );
            self.send(channel_id, &text).await;
            info!(channel_id, count = late.len(), "Deadline warning sent");
            return Ok(ChannelAction::Warned(late.len()));
        }

        if now == deadline {
            if thread.is_some() {
                return Ok(ChannelAction::Idle);
            }
            let late = self.non_reporters(channel, overrides, today).await?;
            if late.is_empty() {
                return Ok(ChannelAction::Idle);
            }
            let text = self.localizer.t_plural(
                "notify_deadline",
                late.len() as i64,
                &[("users", &tags(&late))],
            );
            self.send(channel_id, &text).await;
            let count = late.len();
            threads
                .create(&NotificationThread::new(
                    channel_id.to_string(),
                    late,
                    deadline + interval,
                ))
                .await?;
            info!(channel_id, count, "Deadline missed, reminder cycle started");
            return Ok(ChannelAction::Tagged(count));
        }

        let Some(mut thread) = thread else {
            return Ok(ChannelAction::Idle);
        };
        if !thread.is_due(now) {
            return Ok(ChannelAction::Idle);
        }
        if thread.is_exhausted(self.settings.reminder_repeats_max) {
            return Ok(ChannelAction::Exhausted);
        }

        let late = self.non_reporters(channel, overrides, today).await?;
        if late.is_empty() {
            threads.delete(thread.id).await?;
            info!(channel_id, "Everybody reported, reminder cycle resolved");
            return Ok(ChannelAction::Resolved);
        }

        let text = self.localizer.t_plural(
            "notify_repeat",
            late.len() as i64,
            &[("users", &tags(&late))],
        );
        self.send(channel_id, &text).await;
        let count = late.len();
        thread.advance(interval, late);
        threads.update(&thread).await?;
        info!(channel_id, counter = thread.reminder_counter, "Repeat reminder sent");
        Ok(ChannelAction::Repeated(count))
    }

    /// Personal deadlines for today, keyed by user
    async fn overrides(
        &self,
        channel: &Channel,
        today: NaiveDate,
    ) -> ServiceResult<HashMap<String, TimeOfDay>> {
        let weekday = today.weekday();
        Ok(self
            .ctx
            .timetable_repo()
            .list_by_channel(&channel.channel_id)
            .await?
            .into_iter()
            .filter_map(|tt| tt.time_on(weekday).map(|time| (tt.user_id, time)))
            .collect())
    }

    /// Standupers without a standup today who follow the channel deadline
    async fn non_reporters(
        &self,
        channel: &Channel,
        overrides: &HashMap<String, TimeOfDay>,
        today: NaiveDate,
    ) -> ServiceResult<Vec<String>> {
        let reported = self.reported(channel, today).await?;
        Ok(self
            .ctx
            .standuper_repo()
            .list_by_channel(&channel.channel_id)
            .await?
            .into_iter()
            .filter(|s| !overrides.contains_key(&s.user_id) && !reported.contains(&s.user_id))
            .map(|s| s.user_id)
            .collect())
    }

    async fn reported(&self, channel: &Channel, today: NaiveDate) -> ServiceResult<HashSet<String>> {
        let from = channel.day_start(today);
        let to = today
            .checked_add_days(Days::new(1))
            .map_or(from + TimeDelta::days(1), |next| channel.day_start(next));
        Ok(self
            .ctx
            .standup_repo()
            .submitted_user_ids(&channel.channel_id, from, to)
            .await?
            .into_iter()
            .collect())
    }

    /// Warning and deadline tags for members on a personal timetable.
    ///
    /// There is no repeat cycle for these.
    async fn individual_reminders(
        &self,
        channel: &Channel,
        overrides: &HashMap<String, TimeOfDay>,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> ServiceResult<usize> {
        if overrides.is_empty() {
            return Ok(0);
        }

        let offset = self.settings.warning_offset();
        let mut due = Vec::new();
        for (user_id, time) in overrides {
            let Some(deadline) = time.on(today, channel.tz()).map(|dt| dt.with_timezone(&Utc))
            else {
                continue;
            };
            if now == deadline {
                due.push((user_id, "notify_individual_deadline"));
            } else if offset > TimeDelta::zero() && now == deadline - offset {
                due.push((user_id, "notify_individual_warning"));
            }
        }
        if due.is_empty() {
            return Ok(0);
        }

        let reported = self.reported(channel, today).await?;
        let mut members = HashSet::new();
        for standuper in self
            .ctx
            .standuper_repo()
            .list_by_channel(&channel.channel_id)
            .await?
        {
            members.insert(standuper.user_id);
        }

        let minutes = self.settings.reminder_offset.to_string();
        let mut sent = 0;
        for (user_id, message_id) in due {
            if reported.contains(user_id) || !members.contains(user_id) {
                continue;
            }
            let text = self.localizer.t_with(
                message_id,
                &[("user", &format!("<@{user_id}>")), ("minutes", &minutes)],
            );
            self.send(&channel.channel_id, &text).await;
            sent += 1;
        }
        Ok(sent)
    }

    async fn send(&self, channel_id: &str, text: &str) {
        if let Err(e) = self.ctx.chat().send_message(channel_id, text, &[]).await {
            warn!(channel_id, error = %e, "Failed to send reminder");
        }
    }
}

fn tags(user_ids: &[String]) -> String {
    user_ids
        .iter()
        .map(|id| format!("<@{id}>"))
        .collect::<Vec<_>>()
        .join(", ")
}
