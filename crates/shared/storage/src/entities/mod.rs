//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod account;
pub mod active_status;
pub mod chat_history;
pub mod chat_session;
pub mod emotion_report;
pub mod family;
pub mod health_status;
pub mod home_status;
pub mod location_map;
pub mod login_session;
pub mod master_region;
pub mod member_relation;
pub mod mental_report;
pub mod mental_status;
pub mod message;
pub mod news;
pub mod notification;
pub mod sub_region;
