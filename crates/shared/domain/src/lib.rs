//! Domain layer for the care-bot services.
//!
//! Pure types and rules shared by the user, AI and voice services. Nothing
//! in here touches the network or the database.

pub mod access;
pub mod account;
pub mod chat;
pub mod constants;
pub mod disaster;
pub mod error;
pub mod family;
pub mod ids;
pub mod member;
pub mod message;
pub mod news;
pub mod notification;
pub mod password;
pub mod region;
pub mod session;
pub mod status;
pub mod voice;
pub mod weather;

pub use access::FamilyAccess;
pub use account::{Account, AccountChanges, AccountResponse, BirthDate, Gender, Role};
pub use chat::{ChatSession, ChatTurn, EmotionalReport, PromptMessage};
pub use disaster::DisasterMessage;
pub use error::{DomainError, DomainResult};
pub use family::Family;
pub use ids::{generate_id, is_valid_id, IdKind};
pub use member::{Member, MemberFilter};
pub use message::{Message, NewMessage, Receiver};
pub use news::{NewNewsArticle, NewsArticle};
pub use notification::{NewNotification, Notification, NotificationGrade, SortOrder};
pub use password::Password;
pub use region::{GridPoint, MasterRegion, SubRegion};
pub use session::LoginSession;
pub use status::{
    ActiveStatus, HealthStatus, HomeStatus, MentalAggregate, MentalAssessment, MentalReport,
    MentalStatus, StatusKind,
};
pub use weather::{Weather, WeatherCodes, WeatherDisplay};
