//! Shared fixtures for service tests

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use comedian_common::Translator;
use comedian_core::entities::{BotSettings, Channel, Standup, Standuper, User, UserRole};
use comedian_core::mocks::{InMemoryStore, MockChatGateway, MockCollector};
use comedian_core::traits::Collector;
use comedian_core::traits::{ChannelRepository, StandupRepository, StanduperRepository, UserRepository};
use comedian_core::value_objects::{ChannelRole, TimeOfDay};

use super::context::{ServiceContext, ServiceContextBuilder};

pub(crate) const TEAM: &str = "T1";
pub(crate) const BOT: &str = "UBOT";

pub(crate) struct Harness {
    pub ctx: ServiceContext,
    pub store: Arc<InMemoryStore>,
    pub chat: Arc<MockChatGateway>,
    pub collector: Arc<MockCollector>,
    pub settings: BotSettings,
}

fn build(with_collector: bool) -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let chat = Arc::new(MockChatGateway::new());
    let collector = Arc::new(MockCollector::new());
    let ctx = ServiceContextBuilder::new()
        .store(store.clone())
        .chat(chat.clone())
        .collector(with_collector.then(|| collector.clone() as Arc<dyn Collector>))
        .translator(Arc::new(Translator::new().unwrap()))
        .build()
        .unwrap();
    Harness {
        ctx,
        store,
        chat,
        collector,
        settings: settings(),
    }
}

pub(crate) fn harness() -> Harness {
    build(true)
}

pub(crate) fn harness_without_collector() -> Harness {
    build(false)
}

pub(crate) fn settings() -> BotSettings {
    BotSettings {
        id: 1,
        team_id: TEAM.to_string(),
        team_name: "acme".to_string(),
        bot_user_id: BOT.to_string(),
        bot_access_token: "xoxb-test".to_string(),
        language: "en".to_string(),
        notifier_interval: 60,
        reminder_repeats_max: 3,
        reminder_time: 15,
        reminder_offset: 10,
        reporting_channel: "CREPORT".to_string(),
        report_time: TimeOfDay::NINE_AM,
        individual_reports_on: false,
        timezone: "UTC".to_string(),
    }
}

/// UTC instant on a fixed week: 2024-03-04 is a Monday
pub(crate) fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
}

impl Harness {
    pub async fn channel(&self, channel_id: &str, deadline: Option<&str>) -> Channel {
        let mut channel = Channel::new(
            TEAM.to_string(),
            channel_id.to_string(),
            channel_id.to_lowercase(),
            "UTC".to_string(),
        );
        channel.standup_deadline = deadline.map(|d| TimeOfDay::parse(d).unwrap());
        ChannelRepository::create(self.store.as_ref(), &channel)
            .await
            .unwrap()
    }

    pub async fn standuper(&self, user_id: &str, channel_id: &str, role: ChannelRole) -> Standuper {
        StanduperRepository::create(
            self.store.as_ref(),
            &Standuper::new(
                TEAM.to_string(),
                user_id.to_string(),
                channel_id.to_string(),
                role,
            ),
        )
        .await
        .unwrap()
    }

    pub async fn user(&self, user_id: &str, admin: bool) -> User {
        let user = User {
            id: 0,
            team_id: TEAM.to_string(),
            user_id: user_id.to_string(),
            user_name: user_id.to_lowercase(),
            real_name: user_id.to_string(),
            role: if admin { UserRole::Admin } else { UserRole::Member },
            tz: String::new(),
        };
        UserRepository::upsert(self.store.as_ref(), &user).await.unwrap()
    }

    pub async fn standup_at(&self, user_id: &str, channel_id: &str, created_at: DateTime<Utc>) {
        let mut standup = Standup::new(
            TEAM.to_string(),
            channel_id.to_string(),
            user_id.to_string(),
            "yesterday, today, no problems".to_string(),
            format!("{}.{}", created_at.timestamp(), user_id),
        );
        standup.created_at = created_at;
        standup.modified_at = created_at;
        StandupRepository::create(self.store.as_ref(), &standup)
            .await
            .unwrap();
    }
}
