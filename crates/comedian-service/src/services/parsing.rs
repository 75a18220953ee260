//! Slash command argument parsing
//!
//! Slack escapes mentions in command text as `<@U123|name>` and channel
//! references as `<#C123|name>`.

use chrono::NaiveDate;
use comedian_core::value_objects::{ChannelRole, SubmissionDays, TimeOfDay, TimeParseError};

/// Why command arguments were rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    /// No user tag where one was expected, or a malformed one
    UserTag(String),
    ChannelTag(String),
    Role(String),
    Time(TimeParseError),
    Weekday(String),
    Date(String),
    /// Wrong number of arguments; carries the expected count
    Count(usize),
    Format,
}

/// `U123` from `<@U123|name>` or `<@U123>`
pub fn parse_user_tag(token: &str) -> Result<String, ArgError> {
    parse_tag(token, "<@").ok_or_else(|| ArgError::UserTag(token.to_string()))
}

/// `(C123, name)` from `<#C123|name>`; the name may be missing
pub fn parse_channel_tag(token: &str) -> Result<(String, Option<String>), ArgError> {
    let inner = token
        .strip_prefix("<#")
        .and_then(|rest| rest.strip_suffix('>'))
        .ok_or_else(|| ArgError::ChannelTag(token.to_string()))?;
    let (id, name) = match inner.split_once('|') {
        Some((id, name)) => (id, (!name.is_empty()).then(|| name.to_string())),
        None => (inner, None),
    };
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ArgError::ChannelTag(token.to_string()));
    }
    Ok((id.to_string(), name))
}

fn parse_tag(token: &str, prefix: &str) -> Option<String> {
    let inner = token.strip_prefix(prefix)?.strip_suffix('>')?;
    let id = inner.split('|').next().unwrap_or_default();
    (!id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())).then(|| id.to_string())
}

/// Every token must be a user tag; duplicates are dropped
pub fn parse_user_list(text: &str) -> Result<Vec<String>, ArgError> {
    let mut users: Vec<String> = Vec::new();
    for token in text.split_whitespace() {
        let user = parse_user_tag(token)?;
        if !users.contains(&user) {
            users.push(user);
        }
    }
    if users.is_empty() {
        return Err(ArgError::UserTag(text.trim().to_string()));
    }
    Ok(users)
}

/// `@u1 @u2 [/ role]`
pub fn parse_members(text: &str) -> Result<(Vec<String>, Option<ChannelRole>), ArgError> {
    let (users, role) = match text.split_once('/') {
        Some((users, role)) => {
            let role = role
                .trim()
                .parse::<ChannelRole>()
                .ok()
                .filter(|r| *r != ChannelRole::Unassigned)
                .ok_or_else(|| ArgError::Role(role.trim().to_string()))?;
            (users, Some(role))
        }
        None => (text, None),
    };
    Ok((parse_user_list(users)?, role))
}

/// `<time> [days…]`, e.g. `10:30`, `1:15 pm mon wed`, `at 9am monday`
pub fn parse_deadline(text: &str) -> Result<(TimeOfDay, Option<SubmissionDays>), ArgError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(ArgError::Format);
    }

    let mut first_error = None;
    // longest time prefix first so "1:15 pm" is not read as "1:15" + day "pm"
    for take in (1..=tokens.len().min(3)).rev() {
        match TimeOfDay::parse(&tokens[..take].join(" ")) {
            Ok(time) => {
                let rest = tokens[take..].join(" ");
                if rest.is_empty() {
                    return Ok((time, None));
                }
                return SubmissionDays::parse(&rest)
                    .map(|days| (time, Some(days)))
                    .map_err(ArgError::Weekday);
            }
            Err(e) => first_error = Some(e),
        }
    }
    Err(ArgError::Time(first_error.unwrap_or(TimeParseError::Empty)))
}

/// `@u… on <days…> at <time>`
pub fn parse_timetable(text: &str) -> Result<(Vec<String>, SubmissionDays, TimeOfDay), ArgError> {
    let (users, schedule) = split_keyword(text, &["on", "по"]).ok_or(ArgError::Format)?;
    let (days, time) = split_keyword(schedule, &["at", "в"]).ok_or(ArgError::Format)?;

    let users = parse_user_list(users)?;
    let days = SubmissionDays::parse(days).map_err(ArgError::Weekday)?;
    if days.is_empty() {
        return Err(ArgError::Format);
    }
    let time = TimeOfDay::parse(time).map_err(ArgError::Time)?;
    Ok((users, days, time))
}

fn split_keyword<'t>(text: &'t str, keywords: &[&str]) -> Option<(&'t str, &'t str)> {
    keywords.iter().find_map(|keyword| {
        let needle = format!(" {keyword} ");
        text.find(&needle)
            .map(|at| (&text[..at], &text[at + needle.len()..]))
    })
}

/// `YYYY-MM-DD`
pub fn parse_date(token: &str) -> Result<NaiveDate, ArgError> {
    NaiveDate::parse_from_str(token, "%Y-%m-%d").map_err(|_| ArgError::Date(token.to_string()))
}

/// Exactly `n` whitespace separated arguments
pub fn expect_args(text: &str, n: usize) -> Result<Vec<&str>, ArgError> {
    let args: Vec<&str> = text.split_whitespace().collect();
    if args.len() == n {
        Ok(args)
    } else {
        Err(ArgError::Count(n))
    }
}
