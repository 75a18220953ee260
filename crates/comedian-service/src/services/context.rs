//! Service context - dependency container for services
//!
//! Holds the repositories, the chat gateway, the optional Collector client
//! and the translator shared by all services.

use std::sync::Arc;

use comedian_common::{Locale, Localizer, Translator};
use comedian_core::entities::BotSettings;
use comedian_core::traits::{
    BotSettingsRepository, ChannelRepository, ChatGateway, Collector,
    NotificationThreadRepository, StandupRepository, StanduperRepository, TimeTableRepository,
    UserRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    bot_settings_repo: Arc<dyn BotSettingsRepository>,
    channel_repo: Arc<dyn ChannelRepository>,
    standuper_repo: Arc<dyn StanduperRepository>,
    user_repo: Arc<dyn UserRepository>,
    standup_repo: Arc<dyn StandupRepository>,
    timetable_repo: Arc<dyn TimeTableRepository>,
    thread_repo: Arc<dyn NotificationThreadRepository>,

    // Outbound ports
    chat: Arc<dyn ChatGateway>,
    collector: Option<Arc<dyn Collector>>,

    translator: Arc<Translator>,
}

impl ServiceContext {
    // === Repositories ===

    pub fn bot_settings_repo(&self) -> &dyn BotSettingsRepository {
        self.bot_settings_repo.as_ref()
    }

    pub fn channel_repo(&self) -> &dyn ChannelRepository {
        self.channel_repo.as_ref()
    }

    pub fn standuper_repo(&self) -> &dyn StanduperRepository {
        self.standuper_repo.as_ref()
    }

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn standup_repo(&self) -> &dyn StandupRepository {
        self.standup_repo.as_ref()
    }

    pub fn timetable_repo(&self) -> &dyn TimeTableRepository {
        self.timetable_repo.as_ref()
    }

    pub fn thread_repo(&self) -> &dyn NotificationThreadRepository {
        self.thread_repo.as_ref()
    }

    // === Outbound ports ===

    pub fn chat(&self) -> &dyn ChatGateway {
        self.chat.as_ref()
    }

    /// `None` when no Collector is configured
    pub fn collector(&self) -> Option<&dyn Collector> {
        self.collector.as_deref()
    }

    // === Translation ===

    pub fn translator(&self) -> &Arc<Translator> {
        &self.translator
    }

    /// Localizer for the language configured for a workspace
    pub fn localizer(&self, settings: &BotSettings) -> Localizer {
        let locale = settings.language.parse().unwrap_or(Locale::En);
        self.translator.localizer(locale)
    }

    /// Same context talking to another workspace
    pub fn with_chat(&self, chat: Arc<dyn ChatGateway>) -> Self {
        Self {
            chat,
            ..self.clone()
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("collector", &self.collector.is_some())
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    bot_settings_repo: Option<Arc<dyn BotSettingsRepository>>,
    channel_repo: Option<Arc<dyn ChannelRepository>>,
    standuper_repo: Option<Arc<dyn StanduperRepository>>,
    user_repo: Option<Arc<dyn UserRepository>>,
    standup_repo: Option<Arc<dyn StandupRepository>>,
    timetable_repo: Option<Arc<dyn TimeTableRepository>>,
    thread_repo: Option<Arc<dyn NotificationThreadRepository>>,
    chat: Option<Arc<dyn ChatGateway>>,
    collector: Option<Arc<dyn Collector>>,
    translator: Option<Arc<Translator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use one store for every repository
    pub fn store<S>(self, store: Arc<S>) -> Self
    where
        S: BotSettingsRepository
            + ChannelRepository
            + StanduperRepository
            + UserRepository
            + StandupRepository
            + TimeTableRepository
            + NotificationThreadRepository
            + 'static,
    {
        self.bot_settings_repo(store.clone())
            .channel_repo(store.clone())
            .standuper_repo(store.clone())
            .user_repo(store.clone())
            .standup_repo(store.clone())
            .timetable_repo(store.clone())
            .thread_repo(store)
    }

    pub fn bot_settings_repo(mut self, repo: Arc<dyn BotSettingsRepository>) -> Self {
        self.bot_settings_repo = Some(repo);
        self
    }

    pub fn channel_repo(mut self, repo: Arc<dyn ChannelRepository>) -> Self {
        self.channel_repo = Some(repo);
        self
    }

    pub fn standuper_repo(mut self, repo: Arc<dyn StanduperRepository>) -> Self {
        self.standuper_repo = Some(repo);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn standup_repo(mut self, repo: Arc<dyn StandupRepository>) -> Self {
        self.standup_repo = Some(repo);
        self
    }

    pub fn timetable_repo(mut self, repo: Arc<dyn TimeTableRepository>) -> Self {
        self.timetable_repo = Some(repo);
        self
    }

    pub fn thread_repo(mut self, repo: Arc<dyn NotificationThreadRepository>) -> Self {
        self.thread_repo = Some(repo);
        self
    }

    pub fn chat(mut self, chat: Arc<dyn ChatGateway>) -> Self {
        self.chat = Some(chat);
        self
    }

    pub fn collector(mut self, collector: Option<Arc<dyn Collector>>) -> Self {
        self.collector = collector;
        self
    }

    pub fn translator(mut self, translator: Arc<Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            bot_settings_repo: required(self.bot_settings_repo, "bot_settings_repo")?,
            channel_repo: required(self.channel_repo, "channel_repo")?,
            standuper_repo: required(self.standuper_repo, "standuper_repo")?,
            user_repo: required(self.user_repo, "user_repo")?,
            standup_repo: required(self.standup_repo, "standup_repo")?,
            timetable_repo: required(self.timetable_repo, "timetable_repo")?,
            thread_repo: required(self.thread_repo, "thread_repo")?,
            chat: required(self.chat, "chat")?,
            collector: self.collector,
            translator: required(self.translator, "translator")?,
        })
    }
}
