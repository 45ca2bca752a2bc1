//! Repository layer - data access abstractions
//!
//! Each repository is a trait (mocked with mockall in tests) plus a
//! sea-orm backed `*Store` implementation.

pub mod account_repository;
pub mod chat_repository;
pub mod family_repository;
pub mod member_repository;
pub mod message_repository;
pub mod notification_repository;
pub mod session_repository;
pub mod status_repository;
pub mod tool_repository;

pub use account_repository::{AccountRepository, AccountStore};
pub use chat_repository::{ChatRepository, ChatStore};
pub use family_repository::{FamilyRepository, FamilyStore};
pub use member_repository::{MemberRepository, MemberStore};
pub use message_repository::{MessageRepository, MessageStore};
pub use notification_repository::{NotificationRepository, NotificationStore};
pub use session_repository::{SessionRepository, SessionStore};
pub use status_repository::{
    NewActiveStatus, NewHealthStatus, NewHomeStatus, NewMentalReport, NewMentalStatus,
    StatusRepository, StatusStore, TimeRange,
};
pub use tool_repository::{ToolRepository, ToolStore};

#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use chat_repository::MockChatRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use family_repository::MockFamilyRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use member_repository::MockMemberRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use message_repository::MockMessageRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_repository::MockNotificationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use session_repository::MockSessionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use status_repository::MockStatusRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use tool_repository::MockToolRepository;
