//! Bot runtime
//!
//! One task per workspace drives the notifier and the user sync and applies
//! inbound chat events against the same settings snapshot. Report runs are
//! spawned off that loop so a slow Collector never holds up a minute.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use comedian_core::entities::BotSettings;
use comedian_core::ChatEvent;
use comedian_service::services::{
    minute_of, EventService, NotifierService, ReportingService, RosterService,
};
use comedian_service::ServiceContext;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

pub const USER_SYNC_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Admits each scheduler minute once, however often the ticker fires
#[derive(Debug, Default)]
pub struct MinuteGate {
    last: Option<DateTime<Utc>>,
}

impl MinuteGate {
    pub fn admit(&mut self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let minute = minute_of(now);
        if self.last == Some(minute) {
            return None;
        }
        self.last = Some(minute);
        Some(minute)
    }
}

/// Local date to report on when `minute` is the workspace report time
pub fn report_due(settings: &BotSettings, minute: DateTime<Utc>) -> Option<NaiveDate> {
    let local = minute.with_timezone(&settings.tz());
    let time = settings.report_time;
    (local.hour() == time.hour() && local.minute() == time.minute()).then(|| local.date_naive())
}

pub struct Bot {
    ctx: Arc<ServiceContext>,
    settings: BotSettings,
    report: Option<JoinHandle<()>>,
}

impl Bot {
    pub fn new(ctx: Arc<ServiceContext>, settings: BotSettings) -> Self {
        Self {
            ctx,
            settings,
            report: None,
        }
    }

    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    /// Run until shutdown is signalled or the event source goes away.
    ///
    /// Pending events are drained before shutdown is observed, and a report
    /// already in flight is allowed to finish.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<ChatEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let period = u64::try_from(self.settings.notifier_interval)
            .unwrap_or(1)
            .max(1);
        let mut ticker = interval(Duration::from_secs(period));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut sync = interval(USER_SYNC_INTERVAL);
        sync.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut gate = MinuteGate::default();

        info!(team_id = %self.settings.team_id, period, "Bot started");

        loop {
            tokio::select! {
                biased;
                event = events.recv() => match event {
                    Some(event) => self.handle_event(&event).await,
                    None => break,
                },
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {
                    if let Some(minute) = gate.admit(Utc::now()) {
                        self.on_minute(minute).await;
                    }
                }
                _ = sync.tick() => self.sync_users().await,
            }
        }

        self.finish_report().await;
        info!(team_id = %self.settings.team_id, "Bot stopped");
    }

    pub async fn handle_event(&self, event: &ChatEvent) {
        if let Err(e) = EventService::new(&self.ctx, &self.settings).handle(event).await {
            error!(
                team_id = %self.settings.team_id,
                channel_id = %event.channel_id(),
                error = %e,
                "Failed to handle chat event"
            );
        }
    }

    /// Notifier pass for one minute. A due report is started in the
    /// background.
    pub async fn on_minute(&mut self, minute: DateTime<Utc>) {
        self.refresh_settings().await;

        match NotifierService::new(&self.ctx, &self.settings).tick(minute).await {
            Ok(ticks) => debug!(channels = ticks.len(), "Notifier tick done"),
            Err(e) => error!(team_id = %self.settings.team_id, error = %e, "Notifier tick failed"),
        }

        if let Some(as_of) = report_due(&self.settings, minute) {
            self.spawn_report(as_of);
        }
    }

    fn spawn_report(&mut self, as_of: NaiveDate) {
        if self.report.as_ref().is_some_and(|r| !r.is_finished()) {
            warn!(team_id = %self.settings.team_id, %as_of, "Previous report still running, skipping");
            return;
        }
        let ctx = Arc::clone(&self.ctx);
        let settings = self.settings.clone();
        self.report = Some(tokio::spawn(async move {
            if let Err(e) = ReportingService::new(&ctx, &settings).run(as_of).await {
                error!(team_id = %settings.team_id, error = %e, "Reporting failed");
            }
        }));
    }

    /// Wait for the report started by the last report minute, if any
    pub async fn finish_report(&mut self) {
        if let Some(report) = self.report.take() {
            if let Err(e) = report.await {
                error!(team_id = %self.settings.team_id, error = %e, "Report task failed");
            }
        }
    }

    async fn refresh_settings(&mut self) {
        match self
            .ctx
            .bot_settings_repo()
            .find_by_team(&self.settings.team_id)
            .await
        {
            Ok(Some(settings)) => self.settings = settings,
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Keeping cached bot settings"),
        }
    }

    async fn sync_users(&self) {
        match RosterService::new(&self.ctx, &self.settings).sync_users().await {
            Ok(summary) => debug!(?summary, "User sync done"),
            Err(e) => warn!(team_id = %self.settings.team_id, error = %e, "User sync failed"),
        }
    }
}
