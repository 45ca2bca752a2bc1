//! Service tests against mocked repositories and scripted clients.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use mockall::predicate::eq;
use serde_json::{json, Value};

use ai_api_lib::cache::{CacheStore, CachedEntry, MemoryCache};
use ai_api_lib::clients::{
    CompletionRequest, DisasterSource, LanguageModel, SpeechSynthesizer, WeatherSource,
};
use ai_api_lib::service::{
    ChatManager, ChatService, DisasterManager, DisasterService, MentalManager, MentalService,
    WeatherManager, WeatherService,
};
use common::{AppError, AppResult};
use domain::{
    Account, ChatSession, ChatTurn, Family, Gender, GridPoint, MentalReport,
    MentalStatus, Notification, NotificationGrade, Role, WeatherCodes,
};
use storage::{
    MockAccountRepository, MockChatRepository, MockFamilyRepository, MockNotificationRepository,
    MockStatusRepository, MockToolRepository,
};

// =============================================================================
// Test Helpers
// =============================================================================

/// Answers every request with the same text, or fails.
struct ScriptedLlm {
    answer: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlm {
    fn answering(text: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn last_request(&self) -> CompletionRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl LanguageModel for ScriptedLlm {
    async fn complete(&self, request: CompletionRequest) -> AppResult<String> {
        self.requests.lock().unwrap().push(request);
        self.answer
            .clone()
            .ok_or_else(|| AppError::upstream("OpenAI request failed: timeout"))
    }
}

struct BrokenTts;

#[async_trait]
impl SpeechSynthesizer for BrokenTts {
    async fn synthesize(&self, _text: &str) -> AppResult<String> {
        Err(AppError::upstream("TTS request failed"))
    }
}

struct FixedTts;

#[async_trait]
impl SpeechSynthesizer for FixedTts {
    async fn synthesize(&self, _text: &str) -> AppResult<String> {
        Ok("tts_output/tts_1700000000.mp3".to_string())
    }
}

struct CountingWeather {
    codes: Option<WeatherCodes>,
    calls: AtomicU32,
}

impl CountingWeather {
    fn new(codes: Option<WeatherCodes>) -> Arc<Self> {
        Arc::new(Self {
            codes,
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl WeatherSource for CountingWeather {
    async fn forecast(&self, _grid: GridPoint) -> AppResult<WeatherCodes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.codes
            .clone()
            .ok_or_else(|| AppError::upstream("Weather API request failed"))
    }
}

struct FixedDisaster {
    messages: Option<Vec<Value>>,
}

#[async_trait]
impl DisasterSource for FixedDisaster {
    async fn messages(&self, _region: &str, _date: NaiveDate) -> AppResult<Vec<Value>> {
        self.messages
            .clone()
            .ok_or_else(|| AppError::upstream("Disaster API request failed"))
    }
}

/// Cache whose entries were all stored two hours ago.
struct AgedCache {
    entries: HashMap<String, Value>,
}

#[async_trait]
impl CacheStore for AgedCache {
    async fn get(&self, key: &str) -> AppResult<Option<CachedEntry>> {
        Ok(self.entries.get(key).map(|value| CachedEntry {
            value: value.clone(),
            stored_at: Utc::now() - chrono::Duration::hours(2),
        }))
    }

    async fn put(&self, _key: &str, _value: Value, _retain: Duration) -> AppResult<()> {
        Ok(())
    }
}

fn account(id: &str, role: Role, address: Option<&str>) -> Account {
    Account::new(
        id.to_string(),
        format!("{}@example.com", id.to_lowercase()),
        "hash".to_string(),
        role,
        None,
        None,
        Gender::Other,
        address.map(str::to_string),
    )
}

fn codes() -> WeatherCodes {
    WeatherCodes {
        temperature: "4".into(),
        sky: "1".into(),
        precipitation: "0".into(),
        humidity: "40".into(),
    }
}

fn disaster(serial: i64, step: &str) -> Value {
    json!({
        "SN": serial,
        "MSG_CN": format!("message {}", serial),
        "EMRG_STEP_NM": step,
        "DST_SE_NM": "호우",
    })
}

fn session(uid: &str) -> ChatSession {
    ChatSession {
        uid: uid.to_string(),
        user_id: Some("U1".to_string()),
        created_at: Utc::now(),
        last_active: Utc::now(),
    }
}

fn turn(user: &str, bot: &str) -> ChatTurn {
    ChatTurn {
        session_id: "S1".into(),
        user_id: Some("U1".into()),
        user_message: user.into(),
        bot_message: bot.into(),
        created_at: Utc::now(),
    }
}

fn mental(score: i32, is_critical: bool) -> MentalStatus {
    MentalStatus {
        index: score,
        family_id: "F1".into(),
        reported_at: Utc::now(),
        score,
        is_critical,
        description: "평온".into(),
    }
}

fn chat_manager(
    repo: MockChatRepository,
    llm: Arc<ScriptedLlm>,
    tts: Arc<dyn SpeechSynthesizer>,
) -> ChatManager {
    ChatManager::new(Arc::new(repo), llm, tts, "gpt-3.5-turbo", "gpt-4")
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn test_chat_unknown_session_opens_new_one() {
    let mut repo = MockChatRepository::new();
    repo.expect_find_session().returning(|_| Ok(None));
    repo.expect_touch_session().never();
    repo.expect_create_session()
        .times(1)
        .returning(|uid, user_id| {
            Ok(ChatSession {
                uid: uid.to_string(),
                user_id,
                created_at: Utc::now(),
                last_active: Utc::now(),
            })
        });
    repo.expect_recent_turns().returning(|_, _| Ok(Vec::new()));
    repo.expect_save_turn()
        .times(1)
        .withf(|t| t.user_message == "안녕" && t.bot_message == "안녕하세요, 어르신.")
        .returning(|_| Ok(()));

    let llm = ScriptedLlm::answering("안녕하세요, 어르신.");
    let service = chat_manager(repo, llm.clone(), Arc::new(BrokenTts));
    let reply = service
        .chat(Some("gone".into()), None, "안녕".into())
        .await
        .unwrap();

    assert_ne!(reply.session_id, "gone");
    assert_eq!(reply.session_id.len(), 36);
    assert_eq!(reply.bot_message, "안녕하세요, 어르신.");
    // speech failure only drops the audio path
    assert!(reply.tts_path.is_none());

    let request = llm.last_request();
    assert_eq!(request.model, "gpt-3.5-turbo");
    assert_eq!(request.max_tokens, Some(120));
    assert_eq!(request.temperature, Some(0.7));
    assert_eq!(request.timeout, Some(Duration::from_secs(10)));
    assert_eq!(request.messages.len(), 2);
}

#[tokio::test]
async fn test_chat_known_session_includes_recent_history() {
    let mut repo = MockChatRepository::new();
    repo.expect_find_session()
        .with(eq("S1"))
        .returning(|uid| Ok(Some(session(uid))));
    repo.expect_touch_session().times(1).returning(|_, _| Ok(()));
    repo.expect_create_session().never();
    repo.expect_recent_turns()
        .with(eq("S1"), eq(5u64))
        .returning(|_, _| {
            Ok(vec![
                turn("u1", "b1"),
                turn("u2", "b2"),
                turn("u3", "b3"),
            ])
        });
    repo.expect_save_turn()
        .withf(|t| t.user_id.as_deref() == Some("U1"))
        .returning(|_| Ok(()));

    let llm = ScriptedLlm::answering("네");
    let service = chat_manager(repo, llm.clone(), Arc::new(FixedTts));
    let reply = service.chat(Some("S1".into()), None, "u4".into()).await.unwrap();

    assert_eq!(reply.session_id, "S1");
    assert_eq!(reply.tts_path.as_deref(), Some("tts_output/tts_1700000000.mp3"));

    // system + five most recent messages + the new one
    let request = llm.last_request();
    assert_eq!(request.messages.len(), 7);
    assert_eq!(request.messages[1].content, "b1");
    assert_eq!(request.messages[6].content, "u4");
}

#[tokio::test]
async fn test_chat_completion_failure_is_500_and_nothing_saved() {
    let mut repo = MockChatRepository::new();
    repo.expect_find_session().returning(|_| Ok(None));
    repo.expect_create_session()
        .returning(|uid, _| Ok(session(uid)));
    repo.expect_recent_turns().returning(|_, _| Ok(Vec::new()));
    repo.expect_save_turn().never();

    let service = chat_manager(repo, ScriptedLlm::failing(), Arc::new(FixedTts));
    let err = service.chat(None, None, "안녕".into()).await.unwrap_err();

    assert!(matches!(err, AppError::Server(_)));
    assert_eq!(err.detail().message, "챗봇 응답 생성 중 오류가 발생했습니다.");
}

#[tokio::test]
async fn test_emotional_report_without_conversations_is_not_found() {
    let mut repo = MockChatRepository::new();
    repo.expect_turns_between().returning(|_, _, _| Ok(Vec::new()));

    let llm = ScriptedLlm::answering("unused");
    let service = chat_manager(repo, llm.clone(), Arc::new(FixedTts));
    let err = service
        .emotional_report("U1", NaiveDate::from_ymd_opt(2025, 2, 10).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert!(llm.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_keywords_use_report_model() {
    let mut repo = MockChatRepository::new();
    repo.expect_turns_between()
        .returning(|_, _, _| Ok(vec![turn("손주가 왔어", "좋으셨겠어요")]));

    let llm = ScriptedLlm::answering("가족, 손주, 방문, 음식, 건강");
    let service = chat_manager(repo, llm.clone(), Arc::new(FixedTts));
    let keywords = service
        .keywords("U1", NaiveDate::from_ymd_opt(2025, 2, 10).unwrap())
        .await
        .unwrap();

    assert_eq!(keywords, vec!["가족", "손주", "방문", "음식", "건강"]);
    assert_eq!(llm.last_request().model, "gpt-4");
}

#[tokio::test]
async fn test_save_emotion_report_stores_json() {
    let mut repo = MockChatRepository::new();
    repo.expect_save_emotion_report()
        .withf(|user_id, content| user_id == "U1" && content.contains("\"mood\": \"좋음\""))
        .times(1)
        .returning(|_, _| Ok(()));

    let service = chat_manager(repo, ScriptedLlm::answering(""), Arc::new(FixedTts));
    service
        .save_emotion_report("U1", serde_json::json!({"mood": "좋음"}))
        .await
        .unwrap();
}

// =============================================================================
// Mental status and reports
// =============================================================================

fn mental_manager(
    families: MockFamilyRepository,
    chats: MockChatRepository,
    status: MockStatusRepository,
    llm: Arc<ScriptedLlm>,
) -> MentalManager {
    MentalManager::new(
        Arc::new(families),
        Arc::new(chats),
        Arc::new(status),
        llm,
        "gpt-4",
    )
}

fn family_f1() -> MockFamilyRepository {
    let mut families = MockFamilyRepository::new();
    families.expect_find_by_id().with(eq("F1")).returning(|id| {
        Ok(Some(Family {
            id: id.to_string(),
            main_user: "U1".to_string(),
            family_name: None,
        }))
    });
    families
}

#[tokio::test]
async fn test_mental_status_of_missing_family() {
    let mut families = MockFamilyRepository::new();
    families.expect_find_by_id().returning(|_| Ok(None));

    let service = mental_manager(
        families,
        MockChatRepository::new(),
        MockStatusRepository::new(),
        ScriptedLlm::answering("{}"),
    );
    let err = service.generate_status("F404").await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.detail().message, "Family not found");
}

#[tokio::test]
async fn test_mental_status_stores_assessment() {
    let mut chats = MockChatRepository::new();
    chats
        .expect_turns_between()
        .withf(|user_id, _, _| user_id == "U1")
        .returning(|_, _, _| Ok(vec![turn("잠을 못 잤어", "걱정되네요")]));

    let mut status = MockStatusRepository::new();
    status
        .expect_create_mental()
        .withf(|input| input.family_id == "F1" && input.score == 42 && input.is_critical)
        .times(1)
        .returning(|input| {
            Ok(MentalStatus {
                index: 1,
                family_id: input.family_id,
                reported_at: Utc::now(),
                score: input.score,
                is_critical: input.is_critical,
                description: input.description,
            })
        });

    let llm = ScriptedLlm::answering(
        r#"{"score": 42, "is_critical": true, "description": "수면 부족을 호소하셨습니다."}"#,
    );
    let service = mental_manager(family_f1(), chats, status, llm);
    let stored = service.generate_status("F1").await.unwrap();

    assert_eq!(stored.score, 42);
    assert_eq!(stored.description, "수면 부족을 호소하셨습니다.");
}

#[tokio::test]
async fn test_mental_report_without_status_rows() {
    let mut status = MockStatusRepository::new();
    status.expect_list_mental().returning(|_, _| Ok(Vec::new()));
    status.expect_create_mental_report().never();

    let service = mental_manager(
        family_f1(),
        MockChatRepository::new(),
        status,
        ScriptedLlm::answering("unused"),
    );
    let err = service.generate_report("F1").await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.detail().message, "No mental status found");
}

#[tokio::test]
async fn test_mental_report_aggregates_week() {
    let mut status = MockStatusRepository::new();
    status
        .expect_list_mental()
        .withf(|family_id, range| {
            let span = range.end.unwrap() - range.start.unwrap();
            family_id == "F1" && span == chrono::Duration::days(7)
        })
        .returning(|_, _| Ok(vec![mental(80, false), mental(60, true)]));
    status
        .expect_create_mental_report()
        .times(1)
        .returning(|input| {
            Ok(MentalReport {
                index: 1,
                family_id: input.family_id,
                reported_at: Utc::now(),
                start_time: input.start_time,
                end_time: input.end_time,
                average_score: input.average_score,
                critical_days: input.critical_days,
                best_day: input.best_day,
                worst_day: input.worst_day,
                improvement_needed: input.improvement_needed,
                summary: input.summary,
            })
        });

    let service = mental_manager(
        family_f1(),
        MockChatRepository::new(),
        status,
        ScriptedLlm::answering("대체로 안정적이나 하루 위험 신호가 있었습니다."),
    );
    let report = service.generate_report("F1").await.unwrap();

    assert_eq!(report.average_score, 70.0);
    assert_eq!(report.critical_days, 1);
    assert!(report.improvement_needed);
    assert_eq!(report.summary, "대체로 안정적이나 하루 위험 신호가 있었습니다.");
}

// =============================================================================
// Weather
// =============================================================================

fn weather_manager(
    accounts: MockAccountRepository,
    tools: MockToolRepository,
    source: Arc<CountingWeather>,
    cache: Arc<dyn CacheStore>,
) -> WeatherManager {
    WeatherManager::new(
        Arc::new(accounts),
        Arc::new(tools),
        source,
        cache,
        Duration::from_secs(3600),
    )
}

fn accounts_with(address: Option<&'static str>) -> MockAccountRepository {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_id()
        .returning(move |id| Ok(Some(account(id, Role::Main, address))));
    accounts
}

fn tools_with_grid() -> MockToolRepository {
    let mut tools = MockToolRepository::new();
    tools
        .expect_grid_of()
        .returning(|_| Ok(Some(GridPoint { x: 60, y: 127 })));
    tools
}

#[tokio::test]
async fn test_weather_without_address() {
    let service = weather_manager(
        accounts_with(None),
        MockToolRepository::new(),
        CountingWeather::new(Some(codes())),
        Arc::new(MemoryCache::new()),
    );
    let err = service.weather("U1").await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.detail().message, "주소 정보가 없습니다.");
}

#[tokio::test]
async fn test_weather_without_grid() {
    let mut tools = MockToolRepository::new();
    tools.expect_grid_of().returning(|_| Ok(None));

    let service = weather_manager(
        accounts_with(Some("어딘가")),
        tools,
        CountingWeather::new(Some(codes())),
        Arc::new(MemoryCache::new()),
    );
    let err = service.weather("U1").await.unwrap_err();

    assert_eq!(err.detail().message, "위치 정보를 찾을 수 없습니다.");
}

#[tokio::test]
async fn test_weather_source_failure_is_500() {
    let service = weather_manager(
        accounts_with(Some("서울특별시 종로구 청운효자동")),
        tools_with_grid(),
        CountingWeather::new(None),
        Arc::new(MemoryCache::new()),
    );
    let err = service.weather("U1").await.unwrap_err();

    assert!(matches!(err, AppError::Server(_)));
    assert_eq!(err.detail().message, "날씨 정보 조회에 실패했습니다.");
}

#[tokio::test]
async fn test_weather_is_served_from_cache() {
    let source = CountingWeather::new(Some(codes()));
    let service = weather_manager(
        accounts_with(Some("서울특별시 종로구 청운효자동")),
        tools_with_grid(),
        source.clone(),
        Arc::new(MemoryCache::new()),
    );

    let first = service.weather("U1").await.unwrap();
    let second = service.weather("U1").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.address, "서울특별시 종로구 청운효자동");
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_weather_info_falls_back_to_stale_cache() {
    let stale = serde_json::json!({
        "address": "서울특별시 종로구 청운효자동",
        "weather": {"temperature": "1", "sky": "4", "precipitation": "3", "humidity": "90"}
    });
    let cache = AgedCache {
        entries: HashMap::from([("weather:U1".to_string(), stale)]),
    };

    let service = weather_manager(
        accounts_with(Some("서울특별시 종로구 청운효자동")),
        tools_with_grid(),
        CountingWeather::new(None),
        Arc::new(cache),
    );
    let display = service.weather_info("U1").await.unwrap();

    assert_eq!(display.temperature, "1°C");
    assert_eq!(display.sky, "흐림");
    assert_eq!(display.precipitation, "눈");
}

#[tokio::test]
async fn test_refresh_all_counts_accounts_that_refreshed() {
    let mut accounts = MockAccountRepository::new();
    accounts.expect_list_with_address().returning(|| {
        Ok(vec![
            account("U1", Role::Main, Some("서울특별시 종로구 청운효자동")),
            account("U2", Role::Main, Some("지도에 없는 주소")),
            account("U3", Role::Main, Some("서울특별시 종로구 사직동")),
        ])
    });
    let mut tools = MockToolRepository::new();
    tools.expect_grid_of().returning(|address| {
        Ok((address != "지도에 없는 주소").then_some(GridPoint { x: 60, y: 127 }))
    });
    let source = CountingWeather::new(Some(codes()));
    let cache = Arc::new(MemoryCache::new());

    let service = weather_manager(accounts, tools, source.clone(), cache.clone());
    let refreshed = service.refresh_all().await.unwrap();

    assert_eq!(refreshed, 2);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    assert!(cache.get("weather:U1").await.unwrap().is_some());
    assert!(cache.get("weather:U2").await.unwrap().is_none());
}

// =============================================================================
// Disaster messages
// =============================================================================

fn disaster_manager(
    accounts: MockAccountRepository,
    families: MockFamilyRepository,
    notifications: MockNotificationRepository,
    messages: Option<Vec<Value>>,
) -> DisasterManager {
    DisasterManager::new(
        Arc::new(accounts),
        Arc::new(families),
        Arc::new(notifications),
        Arc::new(FixedDisaster { messages }),
        Arc::new(MemoryCache::new()),
        Duration::from_secs(300),
    )
}

#[tokio::test]
async fn test_check_without_address_is_empty() {
    let service = disaster_manager(
        accounts_with(None),
        MockFamilyRepository::new(),
        MockNotificationRepository::new(),
        Some(vec![disaster(1, "안전안내")]),
    );
    assert!(service.check("U1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_check_returns_portal_items_verbatim() {
    let mut item = disaster(5, "안전안내");
    item["REG_YMD"] = json!("2025-02-10");

    let service = disaster_manager(
        accounts_with(Some("서울특별시")),
        MockFamilyRepository::new(),
        MockNotificationRepository::new(),
        Some(vec![item.clone()]),
    );
    let messages = service.check("U1").await.unwrap();

    assert_eq!(messages, vec![item]);
    assert_eq!(messages[0]["REG_YMD"], "2025-02-10");
}

#[tokio::test]
async fn test_check_swallows_portal_failure() {
    let service = disaster_manager(
        accounts_with(Some("서울특별시")),
        MockFamilyRepository::new(),
        MockNotificationRepository::new(),
        None,
    );
    assert!(service.check("U1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_poll_notifies_main_user_family_once_per_serial() {
    let mut accounts = MockAccountRepository::new();
    accounts.expect_list_with_address().returning(|| {
        Ok(vec![
            account("U_MAIN", Role::Main, Some("서울특별시")),
            account("U_SUB", Role::Sub, Some("서울특별시")),
        ])
    });

    let mut families = MockFamilyRepository::new();
    families
        .expect_find_by_main_user()
        .with(eq("U_MAIN"))
        .times(1)
        .returning(|main_user| {
            Ok(Some(Family {
                id: "F1".to_string(),
                main_user: main_user.to_string(),
                family_name: None,
            }))
        });

    // serial 1 was already delivered in an earlier round
    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_create_if_new()
        .times(2)
        .returning(|input| {
            if input.message_sn == Some(1) {
                return Ok(None);
            }
            Ok(Some(Notification {
                index: 7,
                family_id: input.family_id,
                created_at: Utc::now(),
                notification_grade: input.notification_grade,
                description: input.description,
                is_read: false,
                message_sn: input.message_sn,
            }))
        });

    let service = disaster_manager(
        accounts,
        families,
        notifications,
        Some(vec![disaster(1, "안전안내"), disaster(2, "위급재난")]),
    );
    let summary = service.poll().await.unwrap();

    assert_eq!(summary.accounts, 2);
    assert_eq!(summary.messages, 4);
    assert_eq!(summary.notifications, 1);
}

#[tokio::test]
async fn test_poll_grades_notifications() {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_list_with_address()
        .returning(|| Ok(vec![account("U_MAIN", Role::Main, Some("부산광역시"))]));

    let mut families = MockFamilyRepository::new();
    families.expect_find_by_main_user().returning(|_| {
        Ok(Some(Family {
            id: "F1".to_string(),
            main_user: "U_MAIN".to_string(),
            family_name: None,
        }))
    });

    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_create_if_new()
        .withf(|input| {
            input.notification_grade == NotificationGrade::Crit
                && input.description == "[호우] message 9"
        })
        .times(1)
        .returning(|_| Ok(None));

    let service = disaster_manager(
        accounts,
        families,
        notifications,
        Some(vec![disaster(9, "위급재난")]),
    );
    service.poll().await.unwrap();
}

#[tokio::test]
async fn test_poll_skips_items_without_serial() {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_list_with_address()
        .returning(|| Ok(vec![account("U_MAIN", Role::Main, Some("부산광역시"))]));

    let mut families = MockFamilyRepository::new();
    families.expect_find_by_main_user().returning(|_| {
        Ok(Some(Family {
            id: "F1".to_string(),
            main_user: "U_MAIN".to_string(),
            family_name: None,
        }))
    });

    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_create_if_new()
        .withf(|input| input.message_sn == Some(4))
        .times(1)
        .returning(|_| Ok(None));

    let unnumbered = json!({"MSG_CN": "번호 없는 문자", "EMRG_STEP_NM": "긴급재난"});
    let service = disaster_manager(
        accounts,
        families,
        notifications,
        Some(vec![unnumbered, disaster(4, "긴급재난")]),
    );
    let summary = service.poll().await.unwrap();

    assert_eq!(summary.messages, 2);
}
