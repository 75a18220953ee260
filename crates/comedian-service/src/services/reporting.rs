//! Reporting service
//!
//! Scores every standuper of every active channel and posts the result as
//! colored attachments. The daily report covers the day before the report
//! date; the weekly report covers the seven days before it. Collector
//! requests for one channel go out together.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use comedian_common::Localizer;
use comedian_core::entities::{Attachment, AttachmentColor, BotSettings, Channel, Standuper};
use comedian_core::traits::{CollectorData, CollectorScope};
use futures::future::join_all;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

const HOUR: i64 = 3600;

/// Worklog thresholds in seconds: the point, then the overtime marker
const DAILY_WORKLOG: (i64, i64) = (7 * HOUR, 9 * HOUR);
const WEEKLY_WORKLOG: (i64, i64) = (31 * HOUR, 35 * HOUR);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Daily,
    Weekly,
}

/// Outcome of one scoring dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// Not expected for this period or member; counts as earned
    Waived,
    Met,
    Missed,
}

impl Mark {
    fn from_bool(met: bool) -> Self {
        if met {
            Self::Met
        } else {
            Self::Missed
        }
    }

    fn earned(self) -> bool {
        !matches!(self, Self::Missed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub user_id: String,
    /// `None` in weekly reports
    pub standup: Option<Mark>,
    pub commits: Mark,
    pub worklog: Mark,
    pub data: CollectorData,
    pub overtime: bool,
    pub points: u8,
    pub max_points: u8,
}

impl ReportEntry {
    pub fn color(&self) -> AttachmentColor {
        AttachmentColor::for_points(self.points, self.max_points)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelReport {
    pub channel_id: String,
    pub channel_name: String,
    /// Sorted by worklog, longest first
    pub entries: Vec<ReportEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: ReportKind,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub channels: Vec<ChannelReport>,
}

/// `7:30` style hours and minutes
pub fn format_worklog(seconds: i64) -> String {
    let minutes = seconds.max(0) / 60;
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// Stable descending sort on logged work
fn sort_entries(entries: &mut [ReportEntry]) {
    entries.sort_by(|a, b| b.data.worklogs.cmp(&a.data.worklogs));
}

/// Reporting service
pub struct ReportingService<'a> {
    ctx: &'a ServiceContext,
    settings: &'a BotSettings,
    localizer: Localizer,
}

impl<'a> ReportingService<'a> {
    pub fn new(ctx: &'a ServiceContext, settings: &'a BotSettings) -> Self {
        Self {
            ctx,
            settings,
            localizer: ctx.localizer(settings),
        }
    }

    /// Score the day before `as_of`
    #[instrument(skip(self), fields(team_id = %self.settings.team_id))]
    pub async fn build_daily_report(&self, as_of: NaiveDate) -> ServiceResult<Report> {
        let target = as_of.checked_sub_days(Days::new(1)).unwrap_or(as_of);
        // nobody logs work over the weekend, so Sunday and Monday reports
        // only look at standups
        let quiet = matches!(as_of.weekday(), Weekday::Sun | Weekday::Mon);

        let mut channels = Vec::new();
        for channel in self.active_channels().await? {
            let standupers = self.standupers(&channel).await?;
            if standupers.is_empty() {
                continue;
            }
            let expects_standup = channel.submission_days.includes(target.weekday());
            let from = channel.day_start(target);
            let to = channel.day_start(as_of);

            let fetched = join_all(
                standupers
                    .iter()
                    .map(|s| self.collector_data(&channel, s, target, target)),
            )
            .await;

            let mut entries = Vec::with_capacity(standupers.len());
            for (standuper, data) in standupers.iter().zip(fetched) {
                let standup = if expects_standup {
                    let found = self
                        .ctx
                        .standup_repo()
                        .find_submitted(&standuper.user_id, &channel.channel_id, from, to)
                        .await?;
                    Mark::from_bool(found.is_some())
                } else {
                    Mark::Waived
                };

                let (commits, worklog, overtime) = match data {
                    Some(data) if !quiet => score(standuper, data, DAILY_WORKLOG),
                    _ => (Mark::Waived, Mark::Waived, false),
                };
                entries.push(entry(standuper, Some(standup), commits, worklog, overtime, data));
            }
            sort_entries(&mut entries);
            channels.push(ChannelReport {
                channel_id: channel.channel_id,
                channel_name: channel.channel_name,
                entries,
            });
        }

        Ok(Report {
            kind: ReportKind::Daily,
            from: target,
            to: target,
            channels,
        })
    }

    /// Score the seven days before `as_of`
    #[instrument(skip(self), fields(team_id = %self.settings.team_id))]
    pub async fn build_weekly_report(&self, as_of: NaiveDate) -> ServiceResult<Report> {
        let from = as_of.checked_sub_days(Days::new(7)).unwrap_or(as_of);
        let to = as_of.checked_sub_days(Days::new(1)).unwrap_or(as_of);

        let mut channels = Vec::new();
        for channel in self.active_channels().await? {
            let standupers = self.standupers(&channel).await?;
            if standupers.is_empty() {
                continue;
            }
            let fetched = join_all(
                standupers
                    .iter()
                    .map(|s| self.collector_data(&channel, s, from, to)),
            )
            .await;

            let mut entries = Vec::with_capacity(standupers.len());
            for (standuper, data) in standupers.iter().zip(fetched) {
                let (commits, worklog, overtime) = match data {
                    Some(data) => score(standuper, data, WEEKLY_WORKLOG),
                    None => (Mark::Waived, Mark::Waived, false),
                };
                entries.push(entry(standuper, None, commits, worklog, overtime, data));
            }
            sort_entries(&mut entries);
            channels.push(ChannelReport {
                channel_id: channel.channel_id,
                channel_name: channel.channel_name,
                entries,
            });
        }

        Ok(Report {
            kind: ReportKind::Weekly,
            from,
            to,
            channels,
        })
    }

    /// Build and post the daily report, and the weekly one on Mondays
    pub async fn run(&self, as_of: NaiveDate) -> ServiceResult<()> {
        let daily = self.build_daily_report(as_of).await?;
        self.send(&daily).await;
        if BotSettings::is_weekly_report_day(as_of.weekday()) {
            let weekly = self.build_weekly_report(as_of).await?;
            self.send(&weekly).await;
        }
        Ok(())
    }

    /// Post a report.
    ///
    /// With individual reports on every channel gets its own message; the
    /// aggregate goes to the reporting channel when one is configured.
    #[instrument(skip(self, report), fields(kind = ?report.kind, from = %report.from))]
    pub async fn send(&self, report: &Report) {
        if self.settings.individual_reports_on {
            for channel in &report.channels {
                let attachments: Vec<Attachment> = channel
                    .entries
                    .iter()
                    .map(|e| self.attachment(e, None))
                    .collect();
                self.post(&channel.channel_id, &self.header(report), &attachments)
                    .await;
            }
        }

        let target = &self.settings.reporting_channel;
        if target.is_empty() {
            return;
        }
        let attachments: Vec<Attachment> = report
            .channels
            .iter()
            .flat_map(|c| {
                c.entries
                    .iter()
                    .map(|e| self.attachment(e, Some(&c.channel_name)))
            })
            .collect();
        let text = if attachments.is_empty() {
            self.localizer.t_with(
                "report_empty",
                &[("from", &report.from.to_string()), ("to", &report.to.to_string())],
            )
        } else {
            self.header(report)
        };
        self.post(target, &text, &attachments).await;
        info!(channels = report.channels.len(), "Report sent");
    }

    fn header(&self, report: &Report) -> String {
        let (from, to) = (report.from.to_string(), report.to.to_string());
        match report.kind {
            ReportKind::Daily => self.localizer.t_with("report_daily_header", &[("date", &from)]),
            ReportKind::Weekly => self
                .localizer
                .t_with("report_weekly_header", &[("from", &from), ("to", &to)]),
        }
    }

    /// One line per member, colored by points
    pub fn attachment(&self, entry: &ReportEntry, channel_name: Option<&str>) -> Attachment {
        let l = &self.localizer;
        let mut parts = Vec::with_capacity(4);
        if let Some(standup) = entry.standup {
            parts.push(match standup {
                Mark::Missed => l.t("report_standup_missing"),
                Mark::Met | Mark::Waived => l.t("report_standup_done"),
            });
        }
        if entry.commits != Mark::Waived {
            parts.push(l.t_plural("report_commits", entry.data.total_commits, &[]));
        }
        if entry.worklog != Mark::Waived {
            parts.push(l.t_with(
                "report_worklogs",
                &[("hours", &format_worklog(entry.data.worklogs))],
            ));
        }
        if entry.overtime {
            parts.push(l.t("report_overtime"));
        }

        let who = match channel_name {
            Some(name) => format!("<@{}> #{name}", entry.user_id),
            None => format!("<@{}>", entry.user_id),
        };
        Attachment::new(format!("{who}: {}", parts.join(", ")), entry.color())
    }

    async fn post(&self, channel_id: &str, text: &str, attachments: &[Attachment]) {
        if let Err(e) = self
            .ctx
            .chat()
            .send_message(channel_id, text, attachments)
            .await
        {
            warn!(channel_id, error = %e, "Failed to post report");
        }
    }

    async fn active_channels(&self) -> ServiceResult<Vec<Channel>> {
        Ok(self
            .ctx
            .channel_repo()
            .list_active(&self.settings.team_id)
            .await?)
    }

    async fn standupers(&self, channel: &Channel) -> ServiceResult<Vec<Standuper>> {
        Ok(self
            .ctx
            .standuper_repo()
            .list_by_channel(&channel.channel_id)
            .await?)
    }

    /// `None` without a Collector; zeroes when it fails
    async fn collector_data(
        &self,
        channel: &Channel,
        standuper: &Standuper,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Option<CollectorData> {
        let collector = self.ctx.collector()?;
        let scope = CollectorScope::UserInProject {
            user_id: standuper.user_id.clone(),
            project: channel.channel_name.clone(),
        };
        match collector
            .fetch(&self.settings.team_name, &scope, from, to)
            .await
        {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(scope = %scope.path(), error = %e, "Collector request failed");
                Some(CollectorData::default())
            }
        }
    }
}

/// Commit and worklog marks plus the overtime flag
fn score(standuper: &Standuper, data: CollectorData, worklog: (i64, i64)) -> (Mark, Mark, bool) {
    let commits = if standuper.role.exempt_from_commits() {
        Mark::Waived
    } else {
        Mark::from_bool(data.total_commits > 0)
    };
    let (enough, overtime) = worklog;
    (
        commits,
        Mark::from_bool(data.worklogs >= enough),
        data.worklogs >= overtime,
    )
}

fn entry(
    standuper: &Standuper,
    standup: Option<Mark>,
    commits: Mark,
    worklog: Mark,
    overtime: bool,
    data: Option<CollectorData>,
) -> ReportEntry {
    let marks = [standup, Some(commits), Some(worklog)];
    let max_points = marks.iter().flatten().count() as u8;
    let points = marks.iter().flatten().filter(|m| m.earned()).count() as u8;
    ReportEntry {
        user_id: standuper.user_id.clone(),
        standup,
        commits,
        worklog,
        data: data.unwrap_or_default(),
        overtime,
        points,
        max_points,
    }
}
