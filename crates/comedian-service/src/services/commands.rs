//! Command service
//!
//! Routes slash commands to their handlers. Every handler answers with one
//! user-facing string; bad arguments and access denials are answers too,
//! not errors. Errors are reserved for unknown workspaces, callers and
//! channels, unsupported slash commands and store failures.

use chrono::{Days, NaiveDate};
use comedian_common::Localizer;
use comedian_core::entities::{start_of_day, BotSettings, Channel, Standup, Standuper, TimeTable, User};
use comedian_core::traits::{CollectorScope, StandupQuery};
use comedian_core::value_objects::{AccessLevel, ChannelRole, SubmissionDays, TimeParseError};
use comedian_core::DomainError;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::parsing::{
    expect_args, parse_channel_tag, parse_date, parse_deadline, parse_members, parse_timetable,
    parse_user_list, parse_user_tag, ArgError,
};
use super::reporting::format_worklog;
use super::roster::RosterService;
use crate::dto::CommandRequest;

/// Umbrella slash command; its first word selects the subcommand
pub const UMBRELLA_COMMAND: &str = "comedian";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Show,
    Remove,
    AddDeadline,
    RemoveDeadline,
    ShowDeadline,
    AddTimetable,
    ShowTimetable,
    RemoveTimetable,
    ReportOnUser,
    ReportOnProject,
    ReportOnUserInProject,
    Help,
}

impl Command {
    pub fn parse(name: &str) -> Option<Self> {
        let command = match name.trim().to_lowercase().as_str() {
            "add" => Self::Add,
            "show" => Self::Show,
            "remove" => Self::Remove,
            "add_deadline" => Self::AddDeadline,
            "remove_deadline" => Self::RemoveDeadline,
            "show_deadline" => Self::ShowDeadline,
            "add_timetable" => Self::AddTimetable,
            "show_timetable" => Self::ShowTimetable,
            "remove_timetable" => Self::RemoveTimetable,
            "report_on_user" => Self::ReportOnUser,
            "report_on_project" => Self::ReportOnProject,
            "report_on_user_in_project" => Self::ReportOnUserInProject,
            "help" => Self::Help,
            _ => return None,
        };
        Some(command)
    }

    /// Least privileged level allowed to run the command
    pub fn required_level(self) -> AccessLevel {
        match self {
            Self::Show | Self::ShowDeadline | Self::ShowTimetable | Self::Help => AccessLevel::Other,
            _ => AccessLevel::Pm,
        }
    }

    fn usage(self) -> &'static str {
        match self {
            Self::Add => "add @user1 @user2 / developer|pm|designer",
            Self::Show => "show [role]",
            Self::Remove => "remove @user1 @user2 / role",
            Self::AddDeadline => "add_deadline 10:30 [mon tue wed]",
            Self::RemoveDeadline => "remove_deadline",
            Self::ShowDeadline => "show_deadline",
            Self::AddTimetable => "add_timetable @user1 on mon tue at 10:00",
            Self::ShowTimetable => "show_timetable @user1",
            Self::RemoveTimetable => "remove_timetable @user1",
            Self::ReportOnUser => "report_on_user @user 2024-01-01 2024-01-07",
            Self::ReportOnProject => "report_on_project #channel 2024-01-01 2024-01-07",
            Self::ReportOnUserInProject => {
                "report_on_user_in_project @user #channel 2024-01-01 2024-01-07"
            }
            Self::Help => "help",
        }
    }
}

/// Split a slash command into the subcommand and its parameters.
///
/// Under the umbrella command an unknown subcommand falls back to help;
/// a standalone slash command the bot does not know is unsupported.
pub fn route(command: &str, text: &str) -> ServiceResult<(Command, String)> {
    let name = command.trim().trim_start_matches('/');
    let text = text.trim();

    if name.eq_ignore_ascii_case(UMBRELLA_COMMAND) {
        let (sub, params) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
        let command = Command::parse(sub).unwrap_or(Command::Help);
        return Ok((command, params.trim().to_string()));
    }

    Command::parse(name)
        .map(|c| (c, text.to_string()))
        .ok_or_else(|| ServiceError::UnsupportedCommand(command.to_string()))
}

/// Everything a handler knows about the call
struct Invocation {
    settings: BotSettings,
    localizer: Localizer,
    channel: Channel,
    level: AccessLevel,
}

impl Invocation {
    fn team_id(&self) -> &str {
        &self.settings.team_id
    }
}

/// Command service
pub struct CommandService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommandService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Run a slash command and return the reply text
    #[instrument(skip(self, request), fields(command = %request.command, channel_id = %request.channel_id, user_id = %request.user_id))]
    pub async fn handle(&self, request: &CommandRequest) -> ServiceResult<String> {
        let (command, params) = route(&request.command, &request.text)?;

        let settings = self
            .ctx
            .bot_settings_repo()
            .find_by_team(&request.team_id)
            .await?
            .ok_or_else(|| DomainError::BotSettingsNotFound(request.team_id.clone()))?;
        let user = self
            .ctx
            .user_repo()
            .find(&request.team_id, &request.user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(request.user_id.clone()))?;
        let channel = RosterService::new(self.ctx, &settings)
            .ensure_channel(&request.channel_id)
            .await?;

        let level = self.access_level(&user, &channel).await?;
        let inv = Invocation {
            localizer: self.ctx.localizer(&settings),
            settings,
            channel,
            level,
        };

        if let Some(denial) = deny(&inv, command.required_level()) {
            info!(?command, level = %level, "Command denied");
            return Ok(denial);
        }

        match command {
            Command::Add => self.add(&inv, &params).await,
            Command::Show => self.show(&inv, &params).await,
            Command::Remove => self.remove(&inv, &params).await,
            Command::AddDeadline => self.add_deadline(&inv, &params).await,
            Command::RemoveDeadline => self.remove_deadline(&inv).await,
            Command::ShowDeadline => Ok(show_deadline(&inv)),
            Command::AddTimetable => self.add_timetable(&inv, &params).await,
            Command::ShowTimetable => self.show_timetable(&inv, &params).await,
            Command::RemoveTimetable => self.remove_timetable(&inv, &params).await,
            Command::ReportOnUser => self.report_on_user(&inv, &params).await,
            Command::ReportOnProject => self.report_on_project(&inv, &params).await,
            Command::ReportOnUserInProject => self.report_on_user_in_project(&inv, &params).await,
            Command::Help => Ok(inv.localizer.t("help")),
        }
    }

    /// Workspace admins are `Admin`, PMs of the channel are `Pm`
    pub async fn access_level(&self, user: &User, channel: &Channel) -> ServiceResult<AccessLevel> {
        if user.is_admin() {
            return Ok(AccessLevel::Admin);
        }
        let standuper = self
            .ctx
            .standuper_repo()
            .find(&user.user_id, &channel.channel_id)
            .await?;
        Ok(match standuper {
            Some(s) if s.role == ChannelRole::Pm => AccessLevel::Pm,
            _ => AccessLevel::Other,
        })
    }

    // === Roster ===

    async fn add(&self, inv: &Invocation, params: &str) -> ServiceResult<String> {
        let l = &inv.localizer;
        let (users, role) = match parse_members(params) {
            Ok(parsed) => parsed,
            Err(e) => return Ok(arg_error(l, Command::Add, &e)),
        };
        let role = role.unwrap_or(ChannelRole::Developer);
        if role == ChannelRole::Pm {
            if let Some(denial) = deny(inv, AccessLevel::Admin) {
                return Ok(denial);
            }
        }

        let mut lines = Vec::with_capacity(users.len());
        for user_id in users {
            let standuper = Standuper::new(
                inv.team_id().to_string(),
                user_id.clone(),
                inv.channel.channel_id.clone(),
                role,
            );
            let user = mention(&user_id);
            let role_label = role_name(l, role);
            let data = [("user", user.as_str()), ("role", role_label.as_str())];
            match self.ctx.standuper_repo().create(&standuper).await {
                Ok(_) => lines.push(l.t_with("member_added", &data)),
                Err(DomainError::StanduperAlreadyExists { .. }) => {
                    lines.push(l.t_with("member_already_added", &data));
                }
                Err(e) => return Err(e.into()),
            }
        }
        info!(channel_id = %inv.channel.channel_id, role = %role, "Standupers added");
        Ok(lines.join("\n"))
    }

    async fn show(&self, inv: &Invocation, params: &str) -> ServiceResult<String> {
        let l = &inv.localizer;
        let filter = if params.is_empty() {
            None
        } else {
            match params.parse::<ChannelRole>() {
                Ok(role) if role != ChannelRole::Unassigned => Some(role),
                _ => return Ok(l.t_with("invalid_role", &[("role", params)])),
            }
        };

        let standupers = self
            .ctx
            .standuper_repo()
            .list_by_channel(&inv.channel.channel_id)
            .await?;

        let mut lines = Vec::new();
        for role in [
            ChannelRole::Developer,
            ChannelRole::Pm,
            ChannelRole::Designer,
            ChannelRole::Unassigned,
        ] {
            if filter.is_some_and(|f| f != role) {
                continue;
            }
            let members: Vec<String> = standupers
                .iter()
                .filter(|s| s.role == role)
                .map(Standuper::mention)
                .collect();
            if members.is_empty() {
                continue;
            }
            lines.push(l.t_plural(
                "show_members",
                members.len() as i64,
                &[("role", &role_name(l, role)), ("users", &members.join(", "))],
            ));
        }

        if lines.is_empty() {
            return Ok(l.t("no_standupers"));
        }
        Ok(lines.join("\n"))
    }

    async fn remove(&self, inv: &Invocation, params: &str) -> ServiceResult<String> {
        let l = &inv.localizer;
        let (users, role) = match parse_members(params) {
            Ok(parsed) => parsed,
            Err(e) => return Ok(arg_error(l, Command::Remove, &e)),
        };

        let mut targets = Vec::with_capacity(users.len());
        for user_id in users {
            let standuper = self
                .ctx
                .standuper_repo()
                .find(&user_id, &inv.channel.channel_id)
                .await?
                .filter(|s| role.is_none_or(|r| r == s.role));
            targets.push((user_id, standuper));
        }

        let removes_pm = role == Some(ChannelRole::Pm)
            || targets
                .iter()
                .any(|(_, s)| s.as_ref().is_some_and(|s| s.role == ChannelRole::Pm));
        if removes_pm {
            if let Some(denial) = deny(inv, AccessLevel::Admin) {
                return Ok(denial);
            }
        }

        let mut lines = Vec::with_capacity(targets.len());
        for (user_id, standuper) in targets {
            let user = mention(&user_id);
            match standuper {
                Some(standuper) => {
                    self.ctx.standuper_repo().delete(standuper.id).await?;
                    lines.push(l.t_with("member_removed", &[("user", &user)]));
                }
                None => lines.push(l.t_with("member_not_found", &[("user", &user)])),
            }
        }
        Ok(lines.join("\n"))
    }

    // === Deadlines ===

    async fn add_deadline(&self, inv: &Invocation, params: &str) -> ServiceResult<String> {
        let l = &inv.localizer;
        let (deadline, days) = match parse_deadline(params) {
            Ok(parsed) => parsed,
            Err(e) => return Ok(arg_error(l, Command::AddDeadline, &e)),
        };
        if days.is_some_and(|d| d.is_empty()) {
            return Ok(arg_error(l, Command::AddDeadline, &ArgError::Format));
        }

        let mut channel = inv.channel.clone();
        channel.standup_deadline = Some(deadline);
        if let Some(days) = days {
            channel.submission_days = days;
        }
        self.ctx.channel_repo().update(&channel).await?;
        self.ctx
            .thread_repo()
            .delete_by_channel(&channel.channel_id)
            .await?;

        info!(channel_id = %channel.channel_id, %deadline, "Deadline set");
        Ok(l.t_with(
            "deadline_set",
            &[
                ("deadline", &deadline.to_string()),
                ("days", &day_names(l, channel.submission_days)),
            ],
        ))
    }

    async fn remove_deadline(&self, inv: &Invocation) -> ServiceResult<String> {
        let l = &inv.localizer;
        let mut channel = inv.channel.clone();
        channel.standup_deadline = None;
        self.ctx.channel_repo().update(&channel).await?;
        self.ctx
            .thread_repo()
            .delete_by_channel(&channel.channel_id)
            .await?;

        let remaining = self
            .ctx
            .standuper_repo()
            .list_by_channel(&channel.channel_id)
            .await?
            .len();
        info!(channel_id = %channel.channel_id, remaining, "Deadline removed");

        if remaining == 0 {
            Ok(l.t("deadline_removed"))
        } else {
            Ok(l.t_plural("deadline_removed_with_members", remaining as i64, &[]))
        }
    }

    // === Timetables ===

    async fn add_timetable(&self, inv: &Invocation, params: &str) -> ServiceResult<String> {
        let l = &inv.localizer;
        let (users, days, time) = match parse_timetable(params) {
            Ok(parsed) => parsed,
            Err(e) => return Ok(arg_error(l, Command::AddTimetable, &e)),
        };

        let mut lines = Vec::with_capacity(users.len());
        for user_id in users {
            let user = mention(&user_id);
            let Some(standuper) = self
                .ctx
                .standuper_repo()
                .find(&user_id, &inv.channel.channel_id)
                .await?
            else {
                lines.push(l.t_with("member_not_found", &[("user", &user)]));
                continue;
            };

            let mut timetable = self
                .ctx
                .timetable_repo()
                .find_by_standuper(standuper.id)
                .await?
                .unwrap_or_else(|| {
                    TimeTable::new(standuper.id, standuper.channel_id.clone(), user_id.clone())
                });
            for day in days.weekdays() {
                timetable.set(day, Some(time));
            }
            let saved = self.ctx.timetable_repo().save(&timetable).await?;
            lines.push(l.t_with(
                "timetable_saved",
                &[("user", &user), ("timetable", &render_timetable(l, &saved))],
            ));
        }
        Ok(lines.join("\n"))
    }

    async fn show_timetable(&self, inv: &Invocation, params: &str) -> ServiceResult<String> {
        let l = &inv.localizer;
        let users = match parse_user_list(params) {
            Ok(users) => users,
            Err(e) => return Ok(arg_error(l, Command::ShowTimetable, &e)),
        };

        let mut lines = Vec::with_capacity(users.len());
        for user_id in users {
            let user = mention(&user_id);
            let Some(standuper) = self
                .ctx
                .standuper_repo()
                .find(&user_id, &inv.channel.channel_id)
                .await?
            else {
                lines.push(l.t_with("member_not_found", &[("user", &user)]));
                continue;
            };
            match self.ctx.timetable_repo().find_by_standuper(standuper.id).await? {
                Some(tt) if !tt.is_empty() => lines.push(l.t_with(
                    "show_timetable",
                    &[("user", &user), ("timetable", &render_timetable(l, &tt))],
                )),
                _ => lines.push(l.t_with("no_timetable", &[("user", &user)])),
            }
        }
        Ok(lines.join("\n"))
    }

    async fn remove_timetable(&self, inv: &Invocation, params: &str) -> ServiceResult<String> {
        let l = &inv.localizer;
        let users = match parse_user_list(params) {
            Ok(users) => users,
            Err(e) => return Ok(arg_error(l, Command::RemoveTimetable, &e)),
        };

        let mut lines = Vec::with_capacity(users.len());
        for user_id in users {
            let user = mention(&user_id);
            let Some(standuper) = self
                .ctx
                .standuper_repo()
                .find(&user_id, &inv.channel.channel_id)
                .await?
            else {
                lines.push(l.t_with("member_not_found", &[("user", &user)]));
                continue;
            };
            match self.ctx.timetable_repo().delete_by_standuper(standuper.id).await {
                Ok(()) => lines.push(l.t_with("timetable_removed", &[("user", &user)])),
                Err(DomainError::TimeTableNotFound(_)) => {
                    lines.push(l.t_with("no_timetable", &[("user", &user)]));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(lines.join("\n"))
    }

    // === Reports ===

    async fn report_on_user(&self, inv: &Invocation, params: &str) -> ServiceResult<String> {
        let l = &inv.localizer;
        let parsed = expect_args(params, 3).and_then(|args| {
            let user_id = parse_user_tag(args[0])?;
            let range = parse_range(args[1], args[2])?;
            Ok((user_id, range))
        });
        let (user_id, range) = match parsed {
            Ok(parsed) => parsed,
            Err(e) => return Ok(arg_error(l, Command::ReportOnUser, &e)),
        };
        let Some((from, to)) = range else {
            return Ok(l.t("wrong_date_order"));
        };

        let query = self.range_query(inv, from, to).user(user_id.as_str());
        let subject = mention(&user_id);
        self.render_report(inv, &query, &subject, CollectorScope::User(user_id), from, to)
            .await
    }

    async fn report_on_project(&self, inv: &Invocation, params: &str) -> ServiceResult<String> {
        let l = &inv.localizer;
        let parsed = expect_args(params, 3).and_then(|args| {
            let (channel_id, _) = parse_channel_tag(args[0])?;
            let range = parse_range(args[1], args[2])?;
            Ok((channel_id, range))
        });
        let (channel_id, range) = match parsed {
            Ok(parsed) => parsed,
            Err(e) => return Ok(arg_error(l, Command::ReportOnProject, &e)),
        };
        let Some((from, to)) = range else {
            return Ok(l.t("wrong_date_order"));
        };

        let project = self.project(&channel_id).await?;
        let query = self.range_query(inv, from, to).channel(channel_id.as_str());
        let subject = format!("<#{channel_id}>");
        self.render_report(
            inv,
            &query,
            &subject,
            CollectorScope::Project(project.channel_name),
            from,
            to,
        )
        .await
    }

    async fn report_on_user_in_project(&self, inv: &Invocation, params: &str) -> ServiceResult<String> {
        let l = &inv.localizer;
        let parsed = expect_args(params, 4).and_then(|args| {
            let user_id = parse_user_tag(args[0])?;
            let (channel_id, _) = parse_channel_tag(args[1])?;
            let range = parse_range(args[2], args[3])?;
            Ok((user_id, channel_id, range))
        });
        let (user_id, channel_id, range) = match parsed {
            Ok(parsed) => parsed,
            Err(e) => return Ok(arg_error(l, Command::ReportOnUserInProject, &e)),
        };
        let Some((from, to)) = range else {
            return Ok(l.t("wrong_date_order"));
        };

        let project = self.project(&channel_id).await?;
        let query = self
            .range_query(inv, from, to)
            .user(user_id.as_str())
            .channel(channel_id.as_str());
        let subject = format!("{} <#{channel_id}>", mention(&user_id));
        let scope = CollectorScope::UserInProject {
            user_id,
            project: project.channel_name,
        };
        self.render_report(inv, &query, &subject, scope, from, to).await
    }

    async fn project(&self, channel_id: &str) -> ServiceResult<Channel> {
        self.ctx
            .channel_repo()
            .find_by_channel_id(channel_id)
            .await?
            .ok_or_else(|| DomainError::ChannelNotFound(channel_id.to_string()).into())
    }

    /// Inclusive local date range in the workspace timezone
    fn range_query(&self, inv: &Invocation, from: NaiveDate, to: NaiveDate) -> StandupQuery {
        let tz = inv.settings.tz();
        let end = to.checked_add_days(Days::new(1)).unwrap_or(to);
        StandupQuery::between(start_of_day(from, tz), start_of_day(end, tz)).team(inv.team_id())
    }

    async fn render_report(
        &self,
        inv: &Invocation,
        query: &StandupQuery,
        subject: &str,
        scope: CollectorScope,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ServiceResult<String> {
        let l = &inv.localizer;
        let standups = self.ctx.standup_repo().list(query).await?;
        let (from_s, to_s) = (from.to_string(), to.to_string());

        let mut lines = vec![l.t_with(
            "report_header",
            &[("subject", subject), ("from", &from_s), ("to", &to_s)],
        )];
        if standups.is_empty() {
            lines.push(l.t("report_no_standups"));
        }
        let tz = inv.settings.tz();
        lines.extend(standups.iter().map(|s| standup_line(l, s, tz)));

        if let Some(collector) = self.ctx.collector() {
            match collector
                .fetch(&inv.settings.team_name, &scope, from, to)
                .await
            {
                Ok(data) => lines.push(l.t_with(
                    "report_collector_totals",
                    &[
                        ("commits", &data.total_commits.to_string()),
                        ("worklogs", &format_worklog(data.worklogs)),
                    ],
                )),
                Err(e) => warn!(scope = %scope.path(), error = %e, "Collector data unavailable"),
            }
        }
        Ok(lines.join("\n"))
    }
}

/// Denial text when the caller's level does not satisfy `required`
fn deny(inv: &Invocation, required: AccessLevel) -> Option<String> {
    if inv.level.permits(required) {
        return None;
    }
    let id = match required {
        AccessLevel::Admin => "access_denied_admin",
        _ => "access_denied_pm",
    };
    Some(inv.localizer.t(id))
}

/// `Ok(None)` when the range is reversed
fn parse_range(from: &str, to: &str) -> Result<Option<(NaiveDate, NaiveDate)>, ArgError> {
    let (from, to) = (parse_date(from)?, parse_date(to)?);
    Ok((from <= to).then_some((from, to)))
}

fn arg_error(l: &Localizer, command: Command, error: &ArgError) -> String {
    match error {
        ArgError::UserTag(tag) => l.t_with("wrong_user_tag", &[("tag", tag)]),
        ArgError::ChannelTag(tag) => l.t_with("wrong_channel_tag", &[("tag", tag)]),
        ArgError::Role(role) => l.t_with("invalid_role", &[("role", role)]),
        ArgError::Time(TimeParseError::Midnight) => l.t("deadline_midnight"),
        ArgError::Time(TimeParseError::Malformed(time) | TimeParseError::OutOfRange(time)) => {
            l.t_with("invalid_time", &[("time", time)])
        }
        ArgError::Time(TimeParseError::Empty) | ArgError::Format => {
            l.t_with("wrong_format", &[("usage", command.usage())])
        }
        ArgError::Weekday(day) => l.t_with("invalid_weekday", &[("day", day)]),
        ArgError::Date(date) => l.t_with("wrong_date_format", &[("date", date)]),
        ArgError::Count(n) => l.t_plural(
            "wrong_arguments_count",
            *n as i64,
            &[("usage", command.usage())],
        ),
    }
}

fn show_deadline(inv: &Invocation) -> String {
    let l = &inv.localizer;
    let channel = &inv.channel;
    match channel.standup_deadline {
        None => l.t("no_deadline"),
        Some(deadline) => l.t_with(
            "show_deadline",
            &[
                ("deadline", &deadline.to_string()),
                ("timezone", &channel.timezone),
                ("days", &day_names(l, channel.submission_days)),
            ],
        ),
    }
}

fn mention(user_id: &str) -> String {
    format!("<@{user_id}>")
}

fn role_name(l: &Localizer, role: ChannelRole) -> String {
    match role {
        ChannelRole::Unassigned => l.t("role_unassigned"),
        role => l.t(&format!("role_{}", role.as_str())),
    }
}

fn weekday_name(l: &Localizer, day: chrono::Weekday) -> String {
    let days = SubmissionDays::from_weekday(day);
    let name = days.names().first().copied().unwrap_or_default();
    l.t(&format!("weekday_{name}"))
}

fn day_names(l: &Localizer, days: SubmissionDays) -> String {
    days.weekdays()
        .into_iter()
        .map(|d| weekday_name(l, d))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_timetable(l: &Localizer, timetable: &TimeTable) -> String {
    timetable
        .entries()
        .into_iter()
        .map(|(day, time)| format!("{} {time}", weekday_name(l, day)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn standup_line(l: &Localizer, standup: &Standup, tz: chrono_tz::Tz) -> String {
    let date = standup.created_at.with_timezone(&tz).date_naive().to_string();
    l.t_with(
        "report_standup_line",
        &[
            ("date", &date),
            ("user", &mention(&standup.user_id)),
            ("channel", &format!("<#{}>", standup.channel_id)),
            ("comment", &standup.comment),
        ],
    )
}
