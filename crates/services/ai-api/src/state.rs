//! Application state for dependency injection.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;

use storage::{
    AccountRepository, AccountStore, ChatRepository, ChatStore, FamilyRepository, FamilyStore,
    NotificationRepository, NotificationStore, StatusRepository, StatusStore, ToolRepository,
    ToolStore,
};

use crate::cache::CacheStore;
use crate::clients::{DisasterSource, LanguageModel, SpeechSynthesizer, WeatherSource};
use crate::config::AiApiConfig;
use crate::service::{
    ChatManager, ChatService, DisasterManager, DisasterService, MentalManager, MentalService,
    WeatherManager, WeatherService,
};

/// Every repository the AI API reads or writes.
#[derive(Clone)]
pub struct Repositories {
    pub accounts: Arc<dyn AccountRepository>,
    pub families: Arc<dyn FamilyRepository>,
    pub status: Arc<dyn StatusRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub tools: Arc<dyn ToolRepository>,
    pub chats: Arc<dyn ChatRepository>,
}

impl Repositories {
    /// sea-orm backed repositories sharing one connection pool.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self {
            accounts: Arc::new(AccountStore::new(db.clone())),
            families: Arc::new(FamilyStore::new(db.clone())),
            status: Arc::new(StatusStore::new(db.clone())),
            notifications: Arc::new(NotificationStore::new(db.clone())),
            tools: Arc::new(ToolStore::new(db.clone())),
            chats: Arc::new(ChatStore::new(db)),
        }
    }
}

/// Outbound collaborators.
#[derive(Clone)]
pub struct Clients {
    pub llm: Arc<dyn LanguageModel>,
    pub tts: Arc<dyn SpeechSynthesizer>,
    pub weather: Arc<dyn WeatherSource>,
    pub disaster: Arc<dyn DisasterSource>,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<dyn ChatService>,
    pub mental_service: Arc<dyn MentalService>,
    pub weather_service: Arc<dyn WeatherService>,
    pub disaster_service: Arc<dyn DisasterService>,
    /// Pinged by the health check when present
    pub database: Option<DatabaseConnection>,
    pub config: AiApiConfig,
}

impl AppState {
    /// Wire services on top of the given repositories and clients.
    pub fn new(
        repos: Repositories,
        clients: Clients,
        cache: Arc<dyn CacheStore>,
        config: AiApiConfig,
    ) -> Self {
        Self {
            chat_service: Arc::new(ChatManager::new(
                repos.chats.clone(),
                clients.llm.clone(),
                clients.tts,
                config.openai.chat_model.clone(),
                config.openai.report_model.clone(),
            )),
            mental_service: Arc::new(MentalManager::new(
                repos.families.clone(),
                repos.chats,
                repos.status,
                clients.llm,
                config.openai.report_model.clone(),
            )),
            weather_service: Arc::new(WeatherManager::new(
                repos.accounts.clone(),
                repos.tools,
                clients.weather,
                cache.clone(),
                Duration::from_secs(config.weather_cache_seconds),
            )),
            disaster_service: Arc::new(DisasterManager::new(
                repos.accounts,
                repos.families,
                repos.notifications,
                clients.disaster,
                cache,
                Duration::from_secs(config.disaster_cache_seconds),
            )),
            database: None,
            config,
        }
    }

    /// Attach the connection used by the health check.
    pub fn with_database(mut self, db: DatabaseConnection) -> Self {
        self.database = Some(db);
        self
    }
}
