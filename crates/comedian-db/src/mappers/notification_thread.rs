//! NotificationThread entity <-> model mapper

use comedian_core::entities::NotificationThread;

use crate::models::NotificationThreadModel;

impl From<NotificationThreadModel> for NotificationThread {
    fn from(model: NotificationThreadModel) -> Self {
        NotificationThread {
            id: model.id,
            channel_id: model.channel_id,
            user_ids: NotificationThread::split_user_ids(&model.user_ids),
            notification_time: model.notification_time,
            reminder_counter: model.reminder_counter,
        }
    }
}
