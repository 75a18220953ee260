//! Standup classifier
//!
//! A message counts as a standup when it mentions yesterday's work, today's
//! plan and problems. Matching is a case-insensitive substring test against
//! English and Russian keyword stems. Categories are checked in a fixed order
//! and only the first missing one is reported.

use comedian_common::Localizer;

const YESTERDAY_KEYS: &[&str] = &[
    "yesterday",
    "friday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "saturday",
    "sunday",
    "completed",
    "вчера",
    "пятниц",
    "делал",
    "сделано",
    "понедельник",
    "вторник",
    "сред",
    "четверг",
    "суббот",
    "воскресенье",
];

const TODAY_KEYS: &[&str] = &["today", "going", "plan", "сегодня", "собираюсь", "план"];

const PROBLEM_KEYS: &[&str] = &[
    "problem",
    "difficult",
    "stuck",
    "question",
    "issue",
    "block",
    "проблем",
    "трудност",
    "затруднени",
    "вопрос",
    "блок",
];

/// Keyword category a standup has to cover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordCategory {
    Yesterday,
    Today,
    Problem,
}

impl KeywordCategory {
    const ORDERED: [Self; 3] = [Self::Yesterday, Self::Today, Self::Problem];

    fn keys(self) -> &'static [&'static str] {
        match self {
            Self::Yesterday => YESTERDAY_KEYS,
            Self::Today => TODAY_KEYS,
            Self::Problem => PROBLEM_KEYS,
        }
    }

    /// Message id explaining what is missing
    pub fn message_id(self) -> &'static str {
        match self {
            Self::Yesterday => "no_yesterday_keywords",
            Self::Today => "no_today_keywords",
            Self::Problem => "no_problem_keywords",
        }
    }
}

/// `Err` carries the first category the text does not mention
pub fn classify(text: &str) -> Result<(), KeywordCategory> {
    let text = text.to_lowercase();
    match KeywordCategory::ORDERED
        .into_iter()
        .find(|category| !category.keys().iter().any(|key| text.contains(key)))
    {
        Some(missing) => Err(missing),
        None => Ok(()),
    }
}

/// `(is_standup, message)` where the message names the missing category
pub fn check_standup(text: &str, localizer: &Localizer) -> (bool, String) {
    match classify(text) {
        Ok(()) => (true, String::new()),
        Err(missing) => (false, localizer.t(missing.message_id())),
    }
}
