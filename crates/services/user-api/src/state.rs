//! Application state for dependency injection.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use storage::{
    AccountRepository, AccountStore, FamilyRepository, FamilyStore, MemberRepository,
    MemberStore, MessageRepository, MessageStore, NotificationRepository, NotificationStore,
    SessionRepository, SessionStore, StatusRepository, StatusStore, ToolRepository, ToolStore,
};

use crate::clients::MentalAnalysis;
use crate::config::UserApiConfig;
use crate::service::{
    AccessPolicy, AccountManager, AccountService, AuthManager, AuthService, FamilyManager,
    FamilyService, MemberManager, MemberService, MessageManager, MessageService,
    NotificationManager, NotificationService, StatusManager, StatusService, ToolManager,
    ToolService,
};

/// Every repository the user API reads or writes.
#[derive(Clone)]
pub struct Repositories {
    pub accounts: Arc<dyn AccountRepository>,
    pub families: Arc<dyn FamilyRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub status: Arc<dyn StatusRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub tools: Arc<dyn ToolRepository>,
}

impl Repositories {
    /// sea-orm backed repositories sharing one connection pool.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self {
            accounts: Arc::new(AccountStore::new(db.clone())),
            families: Arc::new(FamilyStore::new(db.clone())),
            members: Arc::new(MemberStore::new(db.clone())),
            sessions: Arc::new(SessionStore::new(db.clone())),
            status: Arc::new(StatusStore::new(db.clone())),
            notifications: Arc::new(NotificationStore::new(db.clone())),
            messages: Arc::new(MessageStore::new(db.clone())),
            tools: Arc::new(ToolStore::new(db)),
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountService>,
    pub family_service: Arc<dyn FamilyService>,
    pub member_service: Arc<dyn MemberService>,
    pub auth_service: Arc<dyn AuthService>,
    pub status_service: Arc<dyn StatusService>,
    pub notification_service: Arc<dyn NotificationService>,
    pub message_service: Arc<dyn MessageService>,
    pub tool_service: Arc<dyn ToolService>,
    /// Pinged by the health check when present
    pub database: Option<DatabaseConnection>,
    pub config: UserApiConfig,
}

impl AppState {
    /// Wire services on top of the given repositories.
    pub fn new(repos: Repositories, ai: Arc<dyn MentalAnalysis>, config: UserApiConfig) -> Self {
        let access = AccessPolicy::new(repos.families.clone());

        Self {
            account_service: Arc::new(AccountManager::new(repos.accounts.clone())),
            family_service: Arc::new(FamilyManager::new(
                repos.families.clone(),
                repos.accounts.clone(),
            )),
            member_service: Arc::new(MemberManager::new(
                repos.members.clone(),
                repos.families.clone(),
                repos.accounts.clone(),
            )),
            auth_service: Arc::new(AuthManager::new(
                repos.accounts.clone(),
                repos.sessions.clone(),
                config.session_expire_seconds,
            )),
            status_service: Arc::new(StatusManager::new(repos.status, access.clone(), ai)),
            notification_service: Arc::new(NotificationManager::new(
                repos.notifications,
                access,
            )),
            message_service: Arc::new(MessageManager::new(repos.messages)),
            tool_service: Arc::new(ToolManager::new(repos.tools)),
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
