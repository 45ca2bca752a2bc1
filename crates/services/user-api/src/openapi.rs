//! OpenAPI documentation.

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::account_handler::{
    CreateAccountRequest, EmailCheckRequest, PasswordCheck, UpdateAccountRequest,
};
use crate::handlers::auth_handler::{ChangePasswordRequest, LoginRequest, LoginResult};
use crate::handlers::family_handler::{
    CreateFamilyRequest, FamilyCheckRequest, FamilyIdResult, UpdateFamilyRequest,
};
use crate::handlers::member_handler::{CreateMemberRequest, UpdateMemberRequest};
use crate::handlers::message_handler::SendMessageRequest;
use crate::handlers::notification_handler::CreateNotificationRequest;
use crate::handlers::status_handler::{
    ActiveStatusRequest, HealthStatusRequest, HomeStatusRequest,
};
use crate::handlers::CreatedId;
use domain::{
    AccountResponse, ActiveStatus, Family, HealthStatus, HomeStatus, LoginSession, MasterRegion,
    Member, MentalReport, MentalStatus, Message, NewsArticle, Notification, NotificationGrade,
    Receiver, SortOrder, SubRegion,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::account_handler::check_email,
        crate::handlers::account_handler::create_account,
        crate::handlers::account_handler::list_accounts,
        crate::handlers::account_handler::get_account,
        crate::handlers::account_handler::update_account,
        crate::handlers::account_handler::delete_account,
        crate::handlers::auth_handler::login,
        crate::handlers::auth_handler::logout,
        crate::handlers::auth_handler::me,
        crate::handlers::auth_handler::change_password,
        crate::handlers::auth_handler::sessions,
        crate::handlers::family_handler::check_exist,
        crate::handlers::family_handler::create_family,
        crate::handlers::family_handler::list_families,
        crate::handlers::family_handler::get_family,
        crate::handlers::family_handler::update_family,
        crate::handlers::family_handler::delete_family,
        crate::handlers::member_handler::create_member,
        crate::handlers::member_handler::list_members,
        crate::handlers::member_handler::get_member,
        crate::handlers::member_handler::update_member,
        crate::handlers::member_handler::delete_member,
        crate::handlers::status_handler::record_home,
        crate::handlers::status_handler::record_health,
        crate::handlers::status_handler::record_active,
        crate::handlers::status_handler::generate_mental_status,
        crate::handlers::status_handler::generate_mental_report,
        crate::handlers::notification_handler::create_notification,
        crate::handlers::notification_handler::list_unread,
        crate::handlers::notification_handler::list_all,
        crate::handlers::notification_handler::mark_read,
        crate::handlers::notification_handler::delete_notification,
        crate::handlers::message_handler::receivable,
        crate::handlers::message_handler::send_message,
        crate::handlers::message_handler::list_new,
        crate::handlers::message_handler::list_all,
        crate::handlers::message_handler::list_sent,
        crate::handlers::message_handler::mark_read,
        crate::handlers::message_handler::delete_message,
        crate::handlers::tool_handler::master_regions,
        crate::handlers::tool_handler::all_sub_regions,
        crate::handlers::tool_handler::sub_regions_of,
        crate::handlers::tool_handler::news,
    ),
    components(
        schemas(
            EmailCheckRequest,
            CreateAccountRequest,
            UpdateAccountRequest,
            PasswordCheck,
            LoginRequest,
            LoginResult,
            ChangePasswordRequest,
            FamilyCheckRequest,
            FamilyIdResult,
            CreateFamilyRequest,
            UpdateFamilyRequest,
            CreateMemberRequest,
            UpdateMemberRequest,
            HomeStatusRequest,
            HealthStatusRequest,
            ActiveStatusRequest,
            CreateNotificationRequest,
            SendMessageRequest,
            CreatedId,
            AccountResponse,
            LoginSession,
            Family,
            Member,
            HomeStatus,
            HealthStatus,
            ActiveStatus,
            MentalStatus,
            MentalReport,
            Notification,
            NotificationGrade,
            SortOrder,
            Message,
            Receiver,
            MasterRegion,
            SubRegion,
            NewsArticle,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Accounts", description = "Account management"),
        (name = "Auth", description = "Login sessions"),
        (name = "Families", description = "Families of a main user"),
        (name = "Members", description = "Sub users of a family"),
        (name = "Status", description = "Home, health, activity and mental status"),
        (name = "Notifications", description = "Family notifications"),
        (name = "Messages", description = "Direct messages inside a family"),
        (name = "Tools", description = "Regions and news"),
    )
)]
pub struct ApiDoc;

/// Session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session_id"))),
            );
        }
    }
}
