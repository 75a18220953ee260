//! BotSettings entity <-> model mapper

use comedian_core::entities::BotSettings;
use comedian_core::value_objects::TimeOfDay;

use crate::models::BotSettingsModel;

impl From<BotSettingsModel> for BotSettings {
    fn from(model: BotSettingsModel) -> Self {
        let report_time =
            TimeOfDay::from_seconds(i64::from(model.report_time)).unwrap_or(TimeOfDay::NINE_AM);
        BotSettings {
            id: model.id,
            team_id: model.team_id,
            team_name: model.team_name,
            bot_user_id: model.bot_user_id,
            bot_access_token: model.bot_access_token,
            language: model.language,
            notifier_interval: model.notifier_interval,
            reminder_repeats_max: model.reminder_repeats_max,
            reminder_time: model.reminder_time,
            reminder_offset: model.reminder_offset,
            reporting_channel: model.reporting_channel,
            report_time,
            individual_reports_on: model.individual_reports_on,
            timezone: model.timezone,
        }
    }
}
