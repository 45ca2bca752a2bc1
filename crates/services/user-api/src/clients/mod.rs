//! Clients for sibling services.

pub mod ai_client;

pub use ai_client::{AiClient, MentalAnalysis};
