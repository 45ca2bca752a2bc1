//! Router tests with mocked repositories, plus the outbound clients against
//! a mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, Utc};
use mockito::Matcher;
use serde_json::{json, Value};
use tower::ServiceExt;

use ai_api_lib::cache::MemoryCache;
use ai_api_lib::clients::{
    CompletionRequest, DisasterSource, GoogleTts, KmaClient, LanguageModel, NewsDataClient,
    NewsSource, OpenAiClient, SafetyDataClient, SpeechSynthesizer, WeatherSource,
};
use ai_api_lib::config::AiApiConfig;
use ai_api_lib::routes::create_router;
use ai_api_lib::state::{AppState, Clients, Repositories};
use common::{AppError, AppResult, RetryPolicy};
use domain::{
    Account, ChatSession, DisasterMessage, Gender, GridPoint, PromptMessage, Role, WeatherCodes,
};
use storage::{
    MockAccountRepository, MockChatRepository, MockFamilyRepository, MockNotificationRepository,
    MockStatusRepository, MockToolRepository,
};

// =============================================================================
// Test Helpers
// =============================================================================

struct EchoLlm;

#[async_trait]
impl LanguageModel for EchoLlm {
    async fn complete(&self, request: CompletionRequest) -> AppResult<String> {
        let last = request.messages.last().map(|m| m.content.clone());
        Ok(format!("{}요?", last.unwrap_or_default()))
    }
}

struct SilentTts;

#[async_trait]
impl SpeechSynthesizer for SilentTts {
    async fn synthesize(&self, _text: &str) -> AppResult<String> {
        Err(AppError::upstream("TTS request failed"))
    }
}

struct OfflineWeather;

#[async_trait]
impl WeatherSource for OfflineWeather {
    async fn forecast(&self, _grid: GridPoint) -> AppResult<WeatherCodes> {
        Err(AppError::upstream("Weather API request failed"))
    }
}

struct OfflineDisaster;

#[async_trait]
impl DisasterSource for OfflineDisaster {
    async fn messages(&self, _region: &str, _date: NaiveDate) -> AppResult<Vec<Value>> {
        Err(AppError::upstream("Disaster API request failed"))
    }
}

fn app(accounts: MockAccountRepository, chats: MockChatRepository) -> Router {
    let repos = Repositories {
        accounts: Arc::new(accounts),
        families: Arc::new(MockFamilyRepository::new()),
        status: Arc::new(MockStatusRepository::new()),
        notifications: Arc::new(MockNotificationRepository::new()),
        tools: Arc::new(MockToolRepository::new()),
        chats: Arc::new(chats),
    };
    let clients = Clients {
        llm: Arc::new(EchoLlm),
        tts: Arc::new(SilentTts),
        weather: Arc::new(OfflineWeather),
        disaster: Arc::new(OfflineDisaster),
    };
    create_router(AppState::new(
        repos,
        clients,
        Arc::new(MemoryCache::new()),
        AiApiConfig::default(),
    ))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn account_without_address(id: &str) -> Account {
    Account::new(
        id.to_string(),
        "main@example.com".to_string(),
        "hash".to_string(),
        Role::Main,
        None,
        None,
        Gender::Other,
        None,
    )
}

// =============================================================================
// Router
// =============================================================================

#[tokio::test]
async fn test_root_message() {
    let app = app(MockAccountRepository::new(), MockChatRepository::new());
    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await["message"],
        "AI 감정 분석 서버 작동 중"
    );
}

#[tokio::test]
async fn test_health_without_database() {
    let app = app(MockAccountRepository::new(), MockChatRepository::new());
    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "ai-api");
    assert_eq!(body["database"], "unknown");
    assert_eq!(body["llm_configured"], false);
}

#[tokio::test]
async fn test_chat_requires_message() {
    let app = app(MockAccountRepository::new(), MockChatRepository::new());
    let response = app
        .oneshot(post_json("/chat", json!({"user_message": ""})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    assert_eq!(body["detail"]["message"], "User message is required");
    assert_eq!(body["detail"]["loc"], json!(["body", "user_message"]));
}

#[tokio::test]
async fn test_chat_returns_plain_reply() {
    let mut chats = MockChatRepository::new();
    chats.expect_find_session().returning(|_| Ok(None));
    chats.expect_create_session().returning(|uid, user_id| {
        Ok(ChatSession {
            uid: uid.to_string(),
            user_id,
            created_at: Utc::now(),
            last_active: Utc::now(),
        })
    });
    chats.expect_recent_turns().returning(|_, _| Ok(Vec::new()));
    chats.expect_save_turn().returning(|_| Ok(()));

    let app = app(MockAccountRepository::new(), chats);
    let response = app
        .oneshot(post_json(
            "/chat",
            json!({"user_id": "U1", "user_message": "밥 먹었어"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["bot_message"], "밥 먹었어요?");
    assert!(body["session_id"].is_string());
    assert!(body["tts_path"].is_null());
}

#[tokio::test]
async fn test_generate_keyword_requires_user_id() {
    let app = app(MockAccountRepository::new(), MockChatRepository::new());
    let response = app.oneshot(get("/generate-keyword")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_check_disaster_without_address_is_empty() {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_id()
        .returning(|id| Ok(Some(account_without_address(id))));

    let app = app(accounts, MockChatRepository::new());
    let response = app.oneshot(get("/check-disaster/U1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"messages": []}));
}

#[tokio::test]
async fn test_weather_of_unknown_account() {
    let mut accounts = MockAccountRepository::new();
    accounts.expect_find_by_id().returning(|_| Ok(None));

    let app = app(accounts, MockChatRepository::new());
    let response = app.oneshot(get("/weather/U404")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        read_json(response).await["detail"]["message"],
        "주소 정보가 없습니다."
    );
}

// =============================================================================
// OpenAI client
// =============================================================================

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(1))
}

#[tokio::test]
async fn test_openai_client_returns_first_choice() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 120
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices": [{"message": {"role": "assistant", "content": "  안녕하세요, 어르신.\n"}}]}"#,
        )
        .create_async()
        .await;

    let client =
        OpenAiClient::new(server.url(), "sk-test", Duration::from_secs(5), fast_retry()).unwrap();
    let request = CompletionRequest::new("gpt-3.5-turbo", vec![PromptMessage::user("안녕")])
        .max_tokens(120);
    let answer = client.complete(request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(answer, "안녕하세요, 어르신.");
}

#[tokio::test]
async fn test_openai_client_does_not_retry_rejections() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(400)
        .with_body(r#"{"error": {"message": "bad request"}}"#)
        .expect(1)
        .create_async()
        .await;

    let client =
        OpenAiClient::new(server.url(), "sk-test", Duration::from_secs(5), fast_retry()).unwrap();
    let err = client
        .complete(CompletionRequest::new("gpt-4", vec![PromptMessage::user("x")]))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, AppError::Upstream(_)));
}

// =============================================================================
// Public data clients
// =============================================================================

#[tokio::test]
async fn test_kma_client_reads_forecast() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/forecast")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("serviceKey".into(), "kma-key".into()),
            Matcher::UrlEncoded("dataType".into(), "JSON".into()),
            Matcher::UrlEncoded("nx".into(), "60".into()),
            Matcher::UrlEncoded("ny".into(), "127".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"response": {"body": {"items": {"item": [
                {"category": "T1H", "fcstValue": "5"},
                {"category": "SKY", "fcstValue": "3"},
                {"category": "PTY", "fcstValue": "0"},
                {"category": "REH", "fcstValue": "55"}
            ]}}}})
            .to_string(),
        )
        .create_async()
        .await;

    let client = KmaClient::new(
        format!("{}/forecast", server.url()),
        "kma-key",
        Duration::from_secs(5),
    )
    .unwrap();
    let codes = client.forecast(GridPoint { x: 60, y: 127 }).await.unwrap();

    mock.assert_async().await;
    assert_eq!(codes.temperature, "5");
    assert_eq!(codes.sky, "3");
    assert_eq!(codes.humidity, "55");
}

#[tokio::test]
async fn test_safety_data_client_filters_by_region_and_day() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/disaster")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("rgnNm".into(), "서울특별시 종로구".into()),
            Matcher::UrlEncoded("crtDt".into(), "20250210".into()),
            Matcher::UrlEncoded("returnType".into(), "json".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"body": [{
                "SN": "215443",
                "MSG_CN": "한파경보 발령, 외출을 자제하세요",
                "EMRG_STEP_NM": "안전안내",
                "DST_SE_NM": "한파",
                "RCPTN_RGN_NM": "서울특별시 종로구",
                "CRT_DT": "2025/02/10 07:12:00"
            }]})
            .to_string(),
        )
        .create_async()
        .await;

    let client = SafetyDataClient::new(
        format!("{}/disaster", server.url()),
        "safety-key",
        Duration::from_secs(5),
    )
    .unwrap();
    let messages = client
        .messages(
            "서울특별시 종로구",
            NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["SN"], "215443");
    assert_eq!(messages[0]["CRT_DT"], "2025/02/10 07:12:00");

    let parsed: DisasterMessage = serde_json::from_value(messages[0].clone()).unwrap();
    assert_eq!(parsed.serial, 215443);
    assert_eq!(parsed.describe(), "[한파] 한파경보 발령, 외출을 자제하세요");
}

#[tokio::test]
async fn test_safety_data_client_server_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/disaster")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let client = SafetyDataClient::new(
        format!("{}/disaster", server.url()),
        "safety-key",
        Duration::from_secs(5),
    )
    .unwrap();
    let err = client
        .messages("부산광역시", NaiveDate::from_ymd_opt(2025, 2, 10).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Upstream(_)));
}

#[tokio::test]
async fn test_news_client_files_articles_under_category() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/latest")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apikey".into(), "news-key".into()),
            Matcher::UrlEncoded("category".into(), "health".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"status": "success", "results": [
                {"title": "겨울철 건강 관리", "link": "https://news.example/1",
                 "image_url": null, "pubDate": "2025-02-01 08:30:00"},
                {"title": null, "link": "https://news.example/2"}
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let client = NewsDataClient::new(
        format!("{}/latest", server.url()),
        "news-key",
        Duration::from_secs(5),
    )
    .unwrap();
    let articles = client.latest("health").await.unwrap();

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].category, "health");
    assert_eq!(
        articles[0].pub_date,
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
    );
}

// =============================================================================
// Speech synthesis
// =============================================================================

#[tokio::test]
async fn test_google_tts_writes_mp3() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/translate_tts")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("tl".into(), "ko".into()),
            Matcher::UrlEncoded("q".into(), "안녕하세요".into()),
            Matcher::UrlEncoded("total".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "audio/mpeg")
        .with_body(b"ID3audio".to_vec())
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let tts = GoogleTts::new(
        format!("{}/translate_tts", server.url()),
        dir.path(),
        Duration::from_secs(5),
    )
    .unwrap();
    let path = tts.synthesize("안녕하세요").await.unwrap();

    mock.assert_async().await;
    assert!(path.ends_with(".mp3"));
    assert_eq!(std::fs::read(&path).unwrap(), b"ID3audio");
}

#[tokio::test]
async fn test_google_tts_gives_each_reply_its_own_file() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/translate_tts")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(b"ID3audio".to_vec())
        .expect(2)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let tts = GoogleTts::new(
        format!("{}/translate_tts", server.url()),
        dir.path(),
        Duration::from_secs(5),
    )
    .unwrap();
    let first = tts.synthesize("첫 번째 답변").await.unwrap();
    let second = tts.synthesize("두 번째 답변").await.unwrap();

    mock.assert_async().await;
    assert_ne!(first, second);
    assert!(std::path::Path::new(&first).exists());
    assert!(std::path::Path::new(&second).exists());
}

#[tokio::test]
async fn test_google_tts_rejects_empty_text() {
    let dir = tempfile::tempdir().unwrap();
    let tts = GoogleTts::new("http://127.0.0.1:9", dir.path(), Duration::from_secs(1)).unwrap();

    let err = tts.synthesize("   ").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidValue(_)));
}
