//! Channel entity <-> model mapper

use comedian_core::entities::Channel;
use comedian_core::value_objects::{SubmissionDays, TimeOfDay};

use crate::models::ChannelModel;

/// Encode an optional time of day, 0 meaning unset
pub fn time_to_column(time: Option<TimeOfDay>) -> i32 {
    time.map_or(0, |t| t.seconds() as i32)
}

impl From<ChannelModel> for Channel {
    fn from(model: ChannelModel) -> Self {
        Channel {
            id: model.id,
            team_id: model.team_id,
            channel_id: model.channel_id,
            channel_name: model.channel_name,
            standup_deadline: TimeOfDay::from_seconds(i64::from(model.standup_deadline)),
            submission_days: SubmissionDays::from_i16(model.submission_days),
            timezone: model.timezone,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_zero_deadline_is_inactive() {
        let model = ChannelModel {
            id: 1,
            team_id: "T1".to_string(),
            channel_id: "C1".to_string(),
            channel_name: "general".to_string(),
            standup_deadline: 0,
            submission_days: 31,
            timezone: "UTC".to_string(),
            created_at: Utc::now(),
        };
        let channel = Channel::from(model);
        assert!(!channel.is_active());
        assert_eq!(channel.submission_days, SubmissionDays::WORKDAYS);
    }

    #[test]
    fn test_deadline_column_round_trip() {
        let deadline = TimeOfDay::from_hm(10, 30);
        assert_eq!(time_to_column(deadline), 37_800);
        assert_eq!(time_to_column(None), 0);
        assert_eq!(TimeOfDay::from_seconds(37_800), deadline);
    }
}
