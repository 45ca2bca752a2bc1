//! Outbound clients of the AI API.

pub mod disaster;
pub mod news;
pub mod openai;
pub mod tts;
pub mod weather;

pub use disaster::{DisasterSource, SafetyDataClient};
pub use news::{NewsDataClient, NewsSource};
pub use openai::{CompletionRequest, LanguageModel, OpenAiClient};
pub use tts::{GoogleTts, SpeechSynthesizer};
pub use weather::{KmaClient, WeatherSource};
