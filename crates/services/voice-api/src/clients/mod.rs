//! Outbound HTTP clients.

pub mod recognizer;
pub mod relay;

pub use recognizer::{GoogleSpeechClient, SpeechRecognizer};
pub use relay::{HttpRelay, Transcription, VoiceRelay};
