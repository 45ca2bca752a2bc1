//! Service layer of the voice API.

pub mod stt_service;
pub mod voice_chat_service;

pub use stt_service::{SttManager, SttService};
pub use voice_chat_service::{VoiceChatManager, VoiceChatService};
