//! Value objects - immutable types that represent domain concepts

mod access_level;
mod role;
mod time_of_day;
mod weekdays;

pub use access_level::AccessLevel;
pub use role::ChannelRole;
pub use time_of_day::{TimeOfDay, TimeParseError};
pub use weekdays::{parse_weekday, SubmissionDays};
