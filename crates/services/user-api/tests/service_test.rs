//! Service unit tests against mocked repositories.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use mockall::predicate::eq;

use common::AppError;
use domain::{
    Account, Family, FamilyAccess, Gender, LoginSession, MasterRegion, Message, NewNotification,
    Notification, NotificationGrade, Password, Receiver, Role, SortOrder, StatusKind,
};
use storage::{
    MockAccountRepository, MockFamilyRepository, MockMemberRepository, MockMessageRepository,
    MockNotificationRepository, MockSessionRepository, MockStatusRepository, MockToolRepository,
    TimeRange,
};
use user_api_lib::clients::MentalAnalysis;
use user_api_lib::middleware::CurrentUser;
use user_api_lib::service::{
    AccessPolicy, AccountManager, AccountService, AuthManager, AuthService, FamilyManager,
    FamilyService, MemberManager, MemberService, MessageManager, MessageService, NewAccount,
    NotificationManager, NotificationService, StatusManager, StatusService, ToolManager,
    ToolService,
};

fn account(id: &str, role: Role, password: &str) -> Account {
    let hash = Password::new(password).expect("hashing should succeed");
    Account::new(
        id.to_string(),
        format!("{}@example.com", id.to_lowercase()),
        hash.into_string(),
        role,
        Some("Kim".to_string()),
        None,
        Gender::Other,
        None,
    )
}

fn user(id: &str, role: Role) -> CurrentUser {
    CurrentUser {
        id: id.to_string(),
        role,
        session_id: format!("session-{}", id),
    }
}

fn new_account(email: &str) -> NewAccount {
    NewAccount {
        email: email.to_string(),
        password: "secret".to_string(),
        role: Role::Main,
        user_name: None,
        birth_date: None,
        gender: Gender::Other,
        address: None,
    }
}

struct NoAi;

#[async_trait::async_trait]
impl MentalAnalysis for NoAi {
    async fn mental_status(&self, _family_id: &str) -> common::AppResult<serde_json::Value> {
        Err(AppError::server("Failed to request mental status from AI server"))
    }

    async fn mental_report(&self, _family_id: &str) -> common::AppResult<serde_json::Value> {
        Err(AppError::server("Failed to request mental report from AI server"))
    }
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn test_create_account_rejects_duplicate_email_without_insert() {
    let mut repo = MockAccountRepository::new();
    repo.expect_email_exists()
        .with(eq("taken@example.com"))
        .returning(|_| Ok(true));
    repo.expect_create().never();

    let service = AccountManager::new(Arc::new(repo));
    let result = service.create_account(new_account("taken@example.com")).await;

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(err.detail().message, "Email is already in use");
}

#[tokio::test]
async fn test_create_account_assigns_fresh_id() {
    let mut repo = MockAccountRepository::new();
    repo.expect_email_exists().returning(|_| Ok(false));
    repo.expect_id_exists().returning(|_| Ok(false));
    repo.expect_create().times(1).returning(Ok);

    let service = AccountManager::new(Arc::new(repo));
    let id = service
        .create_account(new_account("fresh@example.com"))
        .await
        .unwrap();

    assert!(domain::is_valid_id(&id));
}

#[tokio::test]
async fn test_get_account_of_someone_else_is_forbidden() {
    let repo = MockAccountRepository::new();
    let service = AccountManager::new(Arc::new(repo));

    let err = service
        .get_account(&user("U_SUB", Role::Sub), "U_OTHER")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_delete_account_with_wrong_password() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(account(id, Role::Sub, "right"))));
    repo.expect_delete().never();

    let service = AccountManager::new(Arc::new(repo));
    let err = service.delete_account("U1", "wrong").await.unwrap_err();

    assert!(matches!(err, AppError::Unauthorized(_)));
    assert_eq!(err.detail().input.unwrap()["password"], "<PASSWORD>");
}

#[tokio::test]
async fn test_delete_account_without_password() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(account(id, Role::Sub, "right"))));

    let service = AccountManager::new(Arc::new(repo));
    let err = service.delete_account("U1", "").await.unwrap_err();

    assert!(matches!(err, AppError::NoData(_)));
}

// =============================================================================
// Families and members
// =============================================================================

#[tokio::test]
async fn test_second_family_for_main_user_conflicts() {
    let mut families = MockFamilyRepository::new();
    families
        .expect_find_by_main_user()
        .returning(|main| Ok(Some(Family::new("F1".into(), main.to_string(), None))));
    families.expect_create().never();

    let service = FamilyManager::new(Arc::new(families), Arc::new(MockAccountRepository::new()));
    let err = service.create_family("U_MAIN", None).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(err.detail().message, "Main user already has a family");
}

#[tokio::test]
async fn test_family_requires_main_user() {
    let mut families = MockFamilyRepository::new();
    families.expect_find_by_main_user().returning(|_| Ok(None));
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_id()
        .returning(|id| Ok(Some(account(id, Role::Sub, "pw"))));

    let service = FamilyManager::new(Arc::new(families), Arc::new(accounts));
    let err = service.create_family("U_SUB", None).await.unwrap_err();

    assert!(matches!(err, AppError::InvalidValue(_)));
    assert_eq!(err.detail().message, "Does not exist or is not a main user");
}

#[tokio::test]
async fn test_member_must_be_sub_user() {
    let mut families = MockFamilyRepository::new();
    families.expect_id_exists().returning(|_| Ok(true));
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_id()
        .returning(|id| Ok(Some(account(id, Role::Main, "pw"))));
    let mut members = MockMemberRepository::new();
    members.expect_create().never();

    let service = MemberManager::new(Arc::new(members), Arc::new(families), Arc::new(accounts));
    let err = service
        .create_member("F1", "U_MAIN", None)
        .await
        .unwrap_err();

    assert_eq!(err.detail().message, "User not found or is not a sub user");
}

#[tokio::test]
async fn test_duplicate_member_conflicts() {
    let mut families = MockFamilyRepository::new();
    families.expect_id_exists().returning(|_| Ok(true));
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_id()
        .returning(|id| Ok(Some(account(id, Role::Sub, "pw"))));
    let mut members = MockMemberRepository::new();
    members.expect_exists().returning(|_, _| Ok(true));

    let service = MemberManager::new(Arc::new(members), Arc::new(families), Arc::new(accounts));
    let err = service.create_member("F1", "U_SUB", None).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

// =============================================================================
// Sessions
// =============================================================================

fn session(user_id: &str, is_main_user: bool, idle_seconds: i64) -> LoginSession {
    let mut session = LoginSession::new("xid".into(), user_id.into(), is_main_user, Utc::now());
    session.last_active = Utc::now() - Duration::seconds(idle_seconds);
    session
}

#[tokio::test]
async fn test_expired_sub_session_is_deleted() {
    let mut sessions = MockSessionRepository::new();
    sessions
        .expect_find()
        .returning(|_| Ok(Some(session("U_SUB", false, 1801))));
    sessions
        .expect_delete()
        .with(eq("xid"))
        .times(1)
        .returning(|_| Ok(true));
    sessions.expect_touch().never();

    let auth = AuthManager::new(Arc::new(MockAccountRepository::new()), Arc::new(sessions), 1800);
    let err = auth.authenticate("xid").await.unwrap_err();

    assert!(matches!(err, AppError::Unauthorized(_)));
    assert_eq!(
        err.detail().message,
        "Session ID is expired. Please login again with your account."
    );
}

#[tokio::test]
async fn test_main_session_survives_long_idle() {
    let mut sessions = MockSessionRepository::new();
    sessions
        .expect_find()
        .returning(|_| Ok(Some(session("U_MAIN", true, 60 * 60 * 24 * 30))));
    sessions.expect_touch().times(1).returning(|_, _| Ok(()));
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_id()
        .returning(|id| Ok(Some(account(id, Role::Main, "pw"))));

    let auth = AuthManager::new(Arc::new(accounts), Arc::new(sessions), 1800);
    let current = auth.authenticate("xid").await.unwrap();

    assert_eq!(current.id, "U_MAIN");
    assert_eq!(current.role, Role::Main);
}

#[tokio::test]
async fn test_unknown_session_is_invalid() {
    let mut sessions = MockSessionRepository::new();
    sessions.expect_find().returning(|_| Ok(None));

    let auth = AuthManager::new(Arc::new(MockAccountRepository::new()), Arc::new(sessions), 1800);
    let err = auth.authenticate("nope").await.unwrap_err();

    assert_eq!(err.detail().message, "Session ID is invalid.");
}

#[tokio::test]
async fn test_login_marks_main_user_sessions() {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_email()
        .returning(|_| Ok(Some(account("U_MAIN", Role::Main, "pw"))));
    let mut sessions = MockSessionRepository::new();
    sessions.expect_create().returning(Ok);

    let auth = AuthManager::new(Arc::new(accounts), Arc::new(sessions), 1800);
    let session = auth.login("u_main@example.com", "pw").await.unwrap();

    assert!(session.is_main_user);
    assert_eq!(session.user_id, "U_MAIN");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_email()
        .returning(|_| Ok(Some(account("U1", Role::Sub, "pw"))));
    let mut sessions = MockSessionRepository::new();
    sessions.expect_create().never();

    let auth = AuthManager::new(Arc::new(accounts), Arc::new(sessions), 1800);
    let err = auth.login("u1@example.com", "nope").await.unwrap_err();

    assert_eq!(err.detail().message, "Invalid email or password");
}

#[tokio::test]
async fn test_change_password_drops_other_sessions() {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_id()
        .returning(|id| Ok(Some(account(id, Role::Sub, "old"))));
    accounts
        .expect_update_password()
        .times(1)
        .returning(|_, _| Ok(()));
    let mut sessions = MockSessionRepository::new();
    sessions
        .expect_delete_others()
        .with(eq("U1"), eq("session-U1"))
        .times(1)
        .returning(|_, _| Ok(2));

    let auth = AuthManager::new(Arc::new(accounts), Arc::new(sessions), 1800);
    auth.change_password(&user("U1", Role::Sub), "U1", "old", "new")
        .await
        .unwrap();
}

// =============================================================================
// Family-scoped status
// =============================================================================

fn family_access() -> MockFamilyRepository {
    let mut families = MockFamilyRepository::new();
    families
        .expect_access()
        .with(eq("F1"))
        .returning(|_| Ok(Some(FamilyAccess::new("U_MAIN", vec!["U_SUB".into()]))));
    families
}

#[tokio::test]
async fn test_sub_user_of_other_family_gets_403_on_status() {
    let status = MockStatusRepository::new();
    let service = StatusManager::new(
        Arc::new(status),
        AccessPolicy::new(Arc::new(family_access())),
        Arc::new(NoAi),
    );

    let err = service
        .list(
            &user("U_STRANGER", Role::Sub),
            StatusKind::Home,
            "F1",
            TimeRange::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_system_reads_any_family() {
    let mut status = MockStatusRepository::new();
    status.expect_list_home().returning(|_, _| Ok(vec![]));
    let service = StatusManager::new(
        Arc::new(status),
        AccessPolicy::new(Arc::new(family_access())),
        Arc::new(NoAi),
    );

    let records = service
        .list(
            &user("U_ADMIN", Role::System),
            StatusKind::Home,
            "F1",
            TimeRange::default(),
        )
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_latest_missing_is_404() {
    let mut status = MockStatusRepository::new();
    status.expect_latest_health().returning(|_| Ok(None));
    let service = StatusManager::new(
        Arc::new(status),
        AccessPolicy::new(Arc::new(family_access())),
        Arc::new(NoAi),
    );

    let err = service
        .latest(&user("U_MAIN", Role::Main), StatusKind::Health, "F1")
        .await
        .unwrap_err();
    assert_eq!(err.detail().message, "Health status not found");
}

#[tokio::test]
async fn test_unreachable_ai_server_is_500() {
    let service = StatusManager::new(
        Arc::new(MockStatusRepository::new()),
        AccessPolicy::new(Arc::new(family_access())),
        Arc::new(NoAi),
    );

    let err = service
        .generate_mental_status(&user("U_SUB", Role::Sub), "F1")
        .await
        .unwrap_err();
    assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Notifications
// =============================================================================

fn notification(index: i32, family_id: &str) -> Notification {
    Notification {
        index,
        family_id: family_id.to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 2, 10, 3, 0, 0).unwrap(),
        notification_grade: NotificationGrade::Warn,
        description: "약 드실 시간입니다".to_string(),
        is_read: false,
        message_sn: None,
    }
}

fn notification_manager(repo: MockNotificationRepository) -> NotificationManager {
    NotificationManager::new(Arc::new(repo), AccessPolicy::new(Arc::new(family_access())))
}

#[tokio::test]
async fn test_create_notification_for_own_family() {
    let mut repo = MockNotificationRepository::new();
    repo.expect_create()
        .withf(|input: &NewNotification| {
            input.family_id == "F1" && input.notification_grade == NotificationGrade::Crit
        })
        .times(1)
        .returning(|input| {
            Ok(Notification {
                notification_grade: input.notification_grade,
                ..notification(1, &input.family_id)
            })
        });

    let created = notification_manager(repo)
        .create(
            &user("U_SUB", Role::Sub),
            NewNotification {
                family_id: "F1".into(),
                notification_grade: NotificationGrade::Crit,
                description: "넘어짐 감지".into(),
                message_sn: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(created.notification_grade, NotificationGrade::Crit);
}

#[tokio::test]
async fn test_create_notification_for_other_family_is_forbidden() {
    let mut repo = MockNotificationRepository::new();
    repo.expect_create().never();

    let err = notification_manager(repo)
        .create(
            &user("U_STRANGER", Role::Sub),
            NewNotification {
                family_id: "F1".into(),
                notification_grade: NotificationGrade::None,
                description: "안내".into(),
                message_sn: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_unread_listing_passes_filter_and_order() {
    let mut repo = MockNotificationRepository::new();
    repo.expect_list()
        .withf(|family_id: &str, unread_only: &bool, order: &SortOrder| {
            family_id == "F1" && *unread_only && *order == SortOrder::Desc
        })
        .times(1)
        .returning(|_, _, _| Ok(vec![notification(2, "F1"), notification(1, "F1")]));

    let listed = notification_manager(repo)
        .list(&user("U_MAIN", Role::Main), "F1", true, SortOrder::Desc)
        .await
        .unwrap();

    assert_eq!(listed.iter().map(|n| n.index).collect::<Vec<_>>(), vec![2, 1]);
}

#[tokio::test]
async fn test_full_listing_in_ascending_order() {
    let mut repo = MockNotificationRepository::new();
    repo.expect_list()
        .withf(|_: &str, unread_only: &bool, order: &SortOrder| {
            !*unread_only && *order == SortOrder::Asc
        })
        .times(1)
        .returning(|_, _, _| Ok(vec![notification(1, "F1")]));

    let listed = notification_manager(repo)
        .list(&user("U_MAIN", Role::Main), "F1", false, SortOrder::Asc)
        .await
        .unwrap();

    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_mark_read_checks_family_of_notification() {
    let mut repo = MockNotificationRepository::new();
    repo.expect_find_by_id()
        .with(eq(7))
        .returning(|index| Ok(Some(notification(index, "F1"))));
    repo.expect_mark_read().never();

    let err = notification_manager(repo)
        .mark_read(&user("U_STRANGER", Role::Sub), 7)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_mark_read_by_family_member() {
    let mut repo = MockNotificationRepository::new();
    repo.expect_find_by_id()
        .returning(|index| Ok(Some(notification(index, "F1"))));
    repo.expect_mark_read().with(eq(7)).times(1).returning(|index| {
        Ok(Notification {
            is_read: true,
            ..notification(index, "F1")
        })
    });

    let updated = notification_manager(repo)
        .mark_read(&user("U_SUB", Role::Sub), 7)
        .await
        .unwrap();

    assert!(updated.is_read);
}

#[tokio::test]
async fn test_delete_unknown_notification_is_404() {
    let mut repo = MockNotificationRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));
    repo.expect_delete().never();

    let err = notification_manager(repo)
        .delete(&user("U_MAIN", Role::Main), 99)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.detail().message, "Notification not found");
}

#[tokio::test]
async fn test_delete_by_other_family_is_forbidden() {
    let mut repo = MockNotificationRepository::new();
    repo.expect_find_by_id()
        .returning(|index| Ok(Some(notification(index, "F1"))));
    repo.expect_delete().never();

    let err = notification_manager(repo)
        .delete(&user("U_STRANGER", Role::Sub), 7)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
}

// =============================================================================
// Messages
// =============================================================================

fn message(index: i32, from_id: &str, to_id: &str) -> Message {
    Message {
        index,
        from_id: from_id.to_string(),
        to_id: to_id.to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 2, 10, 3, 0, 0).unwrap(),
        content: "식사 하셨어요?".to_string(),
        image_url: None,
        is_read: false,
    }
}

fn receivers_of_sub() -> MockMessageRepository {
    let mut repo = MockMessageRepository::new();
    repo.expect_receivers().with(eq("U_SUB")).returning(|_| {
        Ok(vec![Receiver {
            user_id: "U_MAIN".into(),
            user_name: Some("Kim".into()),
            nickname: None,
        }])
    });
    repo
}

#[tokio::test]
async fn test_send_to_non_receivable_account_is_forbidden() {
    let mut repo = receivers_of_sub();
    repo.expect_create().never();

    let err = MessageManager::new(Arc::new(repo))
        .send(&user("U_SUB", Role::Sub), "U_STRANGER", "안녕하세요".into(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(err.detail().message, "You can not send a message to this user");
}

#[tokio::test]
async fn test_send_to_family_member() {
    let mut repo = receivers_of_sub();
    repo.expect_create()
        .withf(|input| input.from_id == "U_SUB" && input.to_id == "U_MAIN")
        .times(1)
        .returning(|input| Ok(message(1, &input.from_id, &input.to_id)));

    let sent = MessageManager::new(Arc::new(repo))
        .send(&user("U_SUB", Role::Sub), "U_MAIN", "안녕하세요".into(), None)
        .await
        .unwrap();

    assert_eq!(sent.to_id, "U_MAIN");
}

#[tokio::test]
async fn test_only_receiver_marks_message_read() {
    let mut repo = MockMessageRepository::new();
    repo.expect_find_by_id()
        .returning(|index| Ok(Some(message(index, "U_SUB", "U_MAIN"))));
    repo.expect_mark_read().never();

    let err = MessageManager::new(Arc::new(repo))
        .mark_read(&user("U_SUB", Role::Sub), 4)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_receiver_marks_message_read() {
    let mut repo = MockMessageRepository::new();
    repo.expect_find_by_id()
        .returning(|index| Ok(Some(message(index, "U_SUB", "U_MAIN"))));
    repo.expect_mark_read().with(eq(4)).times(1).returning(|index| {
        Ok(Message {
            is_read: true,
            ..message(index, "U_SUB", "U_MAIN")
        })
    });

    let read = MessageManager::new(Arc::new(repo))
        .mark_read(&user("U_MAIN", Role::Main), 4)
        .await
        .unwrap();

    assert!(read.is_read);
}

#[tokio::test]
async fn test_delete_message_by_outsider_is_forbidden() {
    let mut repo = MockMessageRepository::new();
    repo.expect_find_by_id()
        .returning(|index| Ok(Some(message(index, "U_SUB", "U_MAIN"))));
    repo.expect_delete().never();

    let err = MessageManager::new(Arc::new(repo))
        .delete(&user("U_STRANGER", Role::Sub), 4)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_sender_deletes_message() {
    let mut repo = MockMessageRepository::new();
    repo.expect_find_by_id()
        .returning(|index| Ok(Some(message(index, "U_SUB", "U_MAIN"))));
    repo.expect_delete().with(eq(4)).times(1).returning(|_| Ok(true));

    MessageManager::new(Arc::new(repo))
        .delete(&user("U_SUB", Role::Sub), 4)
        .await
        .unwrap();
}

// =============================================================================
// Tools
// =============================================================================

#[tokio::test]
async fn test_empty_master_regions_is_404() {
    let mut repo = MockToolRepository::new();
    repo.expect_master_regions().returning(|| Ok(vec![]));

    let err = ToolManager::new(Arc::new(repo)).master_regions().await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.detail().message, "Failed to retrieve master region data");
}

#[tokio::test]
async fn test_empty_sub_regions_is_404() {
    let mut repo = MockToolRepository::new();
    repo.expect_sub_regions()
        .with(eq(Some("없는도".to_string())))
        .returning(|_| Ok(vec![]));

    let err = ToolManager::new(Arc::new(repo))
        .sub_regions(Some("없는도".to_string()))
        .await
        .unwrap_err();

    assert_eq!(err.detail().message, "Failed to retrieve sub region data");
}

#[tokio::test]
async fn test_master_regions_listed() {
    let mut repo = MockToolRepository::new();
    repo.expect_master_regions().returning(|| {
        Ok(vec![MasterRegion {
            region_name: "서울특별시".into(),
            region_type: "특별시".into(),
        }])
    });

    let regions = ToolManager::new(Arc::new(repo)).master_regions().await.unwrap();

    assert_eq!(regions[0].region_name, "서울특별시");
}
