//! Application state for dependency injection.

use std::sync::Arc;

use crate::clients::{SpeechRecognizer, VoiceRelay};
use crate::config::VoiceApiConfig;
use crate::service::{SttManager, SttService, VoiceChatManager, VoiceChatService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub stt_service: Arc<dyn SttService>,
    pub voice_chat_service: Arc<dyn VoiceChatService>,
    pub config: VoiceApiConfig,
}

impl AppState {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        relay: Arc<dyn VoiceRelay>,
        config: VoiceApiConfig,
    ) -> Self {
        Self {
            stt_service: Arc::new(SttManager::new(
                recognizer,
                config.timeouts.keyword(),
                config.timeouts.speech(),
            )),
            voice_chat_service: Arc::new(VoiceChatManager::new(relay)),
            config,
        }
    }
}
