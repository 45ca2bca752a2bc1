//! AI API configuration.

use common::config::{env_opt, env_or};
use common::{CacheConfig, DatabaseConfig, RetryPolicy, ServiceConfig};

/// AI API configuration.
#[derive(Debug, Clone)]
pub struct AiApiConfig {
    /// Host and port to bind
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub openai: OpenAiConfig,
    pub weather: ExternalApiConfig,
    pub disaster: ExternalApiConfig,
    pub news: ExternalApiConfig,
    /// Seconds a cached forecast is served without refreshing
    pub weather_cache_seconds: u64,
    /// Seconds cached disaster messages are served without refreshing
    pub disaster_cache_seconds: u64,
    /// Seconds between news collection runs
    pub news_refresh_seconds: u64,
    pub tts: TtsConfig,
}

/// Chat-completion endpoint and models.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Model answering companion chat
    pub chat_model: String,
    /// Model writing reports, keywords and mental assessments
    pub report_model: String,
    pub timeout_seconds: u64,
    pub retry: RetryPolicy,
}

/// A keyed government or news API.
#[derive(Debug, Clone)]
pub struct ExternalApiConfig {
    pub api_key: Option<String>,
    pub url: String,
    pub timeout_seconds: u64,
}

/// Text-to-speech output.
#[derive(Debug, Clone)]
pub struct TtsConfig {
    pub url: String,
    /// Directory served under `/tts_output`
    pub output_dir: String,
    pub timeout_seconds: u64,
}

impl AiApiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            service: ServiceConfig::from_env("ai-api", "AI_API", defaults.service.port),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            openai: OpenAiConfig {
                api_key: env_opt("OPENAI_API_KEY"),
                base_url: env_or("OPENAI_BASE_URL", defaults.openai.base_url),
                chat_model: env_or("CHAT_MODEL", defaults.openai.chat_model),
                report_model: env_or("REPORT_MODEL", defaults.openai.report_model),
                ..defaults.openai
            },
            weather: ExternalApiConfig {
                api_key: env_opt("WEATHER_API_KEY"),
                url: env_or("WEATHER_API_URL", defaults.weather.url),
                ..defaults.weather
            },
            disaster: ExternalApiConfig {
                api_key: env_opt("DISASTER_API_KEY"),
                url: env_or("DISASTER_API_URL", defaults.disaster.url),
                ..defaults.disaster
            },
            news: ExternalApiConfig {
                api_key: env_opt("NEWS_API_KEY"),
                url: env_or("NEWS_API_URL", defaults.news.url),
                ..defaults.news
            },
            weather_cache_seconds: env_or("WEATHER_CACHE_DURATION", defaults.weather_cache_seconds),
            disaster_cache_seconds: env_or(
                "DISASTER_CACHE_DURATION",
                defaults.disaster_cache_seconds,
            ),
            news_refresh_seconds: env_or("NEWS_REFRESH_INTERVAL", defaults.news_refresh_seconds),
            tts: TtsConfig {
                url: env_or("TTS_URL", defaults.tts.url),
                output_dir: env_or("TTS_OUTPUT_DIR", defaults.tts.output_dir),
                ..defaults.tts
            },
        }
    }
}

impl Default for AiApiConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: "ai-api".to_string(),
                host: "0.0.0.0".to_string(),
                port: 8001,
            },
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            openai: OpenAiConfig {
                api_key: None,
                base_url: "https://api.openai.com/v1".to_string(),
                chat_model: "gpt-3.5-turbo".to_string(),
                report_model: "gpt-4".to_string(),
                timeout_seconds: 30,
                retry: RetryPolicy::default(),
            },
            weather: ExternalApiConfig {
                api_key: None,
                url: "http://apis.data.go.kr/1360000/VilageFcstInfoService_2.0/getUltraSrtFcst"
                    .to_string(),
                timeout_seconds: 10,
            },
            disaster: ExternalApiConfig {
                api_key: None,
                url: "https://www.safetydata.go.kr/V2/api/DSSP-IF-00247".to_string(),
                timeout_seconds: 10,
            },
            news: ExternalApiConfig {
                api_key: None,
                url: "https://newsdata.io/api/1/latest".to_string(),
                timeout_seconds: 30,
            },
            weather_cache_seconds: 3600,
            disaster_cache_seconds: 300,
            news_refresh_seconds: 86400,
            tts: TtsConfig {
                url: "https://translate.google.com/translate_tts".to_string(),
                output_dir: "tts_output".to_string(),
                timeout_seconds: 30,
            },
        }
    }
}
