//! Account domain entity and related types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{
    clip, ADDRESS_MAX_CHARS, BIRTH_YEAR_MAX, BIRTH_YEAR_MIN, USER_NAME_MAX_CHARS,
};
use crate::error::{DomainError, DomainResult};

/// Account roles.
///
/// Stored uppercase (`MAIN`), rendered lowercase in JSON (`main`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Test,
    System,
    Main,
    Sub,
}

impl Role {
    /// Parse a role name, ignoring case.
    pub fn parse(value: &str) -> DomainResult<Self> {
        match value.to_ascii_uppercase().as_str() {
            "TEST" => Ok(Role::Test),
            "SYSTEM" => Ok(Role::System),
            "MAIN" => Ok(Role::Main),
            "SUB" => Ok(Role::Sub),
            _ => Err(DomainError::invalid(
                "Invalid value provided for account details (role)",
            )),
        }
    }

    /// Column representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Role::Test => "TEST",
            Role::System => "SYSTEM",
            Role::Main => "MAIN",
            Role::Sub => "SUB",
        }
    }

    /// Administrative bypass of family checks
    pub fn is_system(&self) -> bool {
        matches!(self, Role::System)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

/// Account gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    /// Parse a gender name, ignoring case.
    pub fn parse(value: &str) -> DomainResult<Self> {
        match value.to_ascii_uppercase().as_str() {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            "OTHER" => Ok(Gender::Other),
            _ => Err(DomainError::invalid(
                "Invalid value provided for account details (gender)",
            )),
        }
    }

    pub fn as_db_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }
}

/// Birth date as submitted by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BirthDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl BirthDate {
    /// Convert to a calendar date.
    ///
    /// The year must fall in 1900..=2022 and the triple must name a real day.
    pub fn to_date(&self) -> DomainResult<NaiveDate> {
        let in_range = (BIRTH_YEAR_MIN..=BIRTH_YEAR_MAX).contains(&self.year)
            && (1..=12).contains(&self.month)
            && (1..=31).contains(&self.day);

        in_range
            .then(|| NaiveDate::from_ymd_opt(self.year, self.month, self.day))
            .flatten()
            .ok_or_else(|| {
                DomainError::invalid("Invalid value provided for account details (birth date)")
            })
    }
}

/// Account domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub user_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
}

impl Account {
    /// Build a new account, clipping free text fields to their stored width.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        email: String,
        password_hash: String,
        role: Role,
        user_name: Option<String>,
        birth_date: Option<NaiveDate>,
        gender: Gender,
        address: Option<String>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            role,
            user_name: clip(user_name, USER_NAME_MAX_CHARS),
            birth_date,
            gender: Some(gender),
            address: clip(address, ADDRESS_MAX_CHARS),
        }
    }

    pub fn is_main(&self) -> bool {
        matches!(self.role, Role::Main)
    }

    pub fn is_sub(&self) -> bool {
        matches!(self.role, Role::Sub)
    }

    /// Apply a partial update. `None` keeps the previous value.
    pub fn apply(&mut self, changes: AccountChanges) {
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(role) = changes.role {
            self.role = role;
        }
        if let Some(name) = clip(changes.user_name, USER_NAME_MAX_CHARS) {
            self.user_name = Some(name);
        }
        if let Some(date) = changes.birth_date {
            self.birth_date = Some(date);
        }
        if let Some(gender) = changes.gender {
            self.gender = Some(gender);
        }
        if let Some(address) = clip(changes.address, ADDRESS_MAX_CHARS) {
            self.address = Some(address);
        }
    }
}

/// Validated partial update of an account.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub user_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
}

/// Public view of an account (no password)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub user_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            role: account.role,
            user_name: account.user_name,
            birth_date: account.birth_date,
            gender: account.gender,
            address: account.address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Account {
        Account::new(
            "U000000000000001".into(),
            "grandma@example.com".into(),
            "hash".into(),
            Role::Main,
            Some("Kim".into()),
            None,
            Gender::Female,
            Some("서울특별시 종로구".into()),
        )
    }

    #[test]
    fn test_role_parse_ignores_case() {
        assert_eq!(Role::parse("main").unwrap(), Role::Main);
        assert_eq!(Role::parse("SuB").unwrap(), Role::Sub);
        assert_eq!(Role::parse("SYSTEM").unwrap(), Role::System);
        assert!(Role::parse("admin").is_err());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Main).unwrap(), "\"main\"");
        assert_eq!(Role::Main.as_db_str(), "MAIN");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Role::default(), Role::Test);
        assert_eq!(Gender::default(), Gender::Other);
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse("male").unwrap(), Gender::Male);
        assert!(Gender::parse("unknown").is_err());
    }

    #[test]
    fn test_birth_date_bounds() {
        let ok = BirthDate { year: 1950, month: 2, day: 28 };
        assert!(ok.to_date().is_ok());

        for bad in [
            BirthDate { year: 1899, month: 1, day: 1 },
            BirthDate { year: 2023, month: 1, day: 1 },
            BirthDate { year: 1950, month: 13, day: 1 },
            BirthDate { year: 1950, month: 1, day: 0 },
            BirthDate { year: 1950, month: 2, day: 30 },
        ] {
            assert!(bad.to_date().is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_new_account_clips_text_fields() {
        let account = Account::new(
            "U000000000000001".into(),
            "a@b.c".into(),
            "hash".into(),
            Role::Sub,
            Some("x".repeat(40)),
            None,
            Gender::Other,
            Some("y".repeat(200)),
        );
        assert_eq!(account.user_name.unwrap().len(), USER_NAME_MAX_CHARS);
        assert_eq!(account.address.unwrap().len(), ADDRESS_MAX_CHARS);
    }

    #[test]
    fn test_apply_keeps_unspecified_fields() {
        let mut account = sample();
        account.apply(AccountChanges {
            user_name: Some("Lee".into()),
            ..Default::default()
        });

        assert_eq!(account.user_name.as_deref(), Some("Lee"));
        assert_eq!(account.email, "grandma@example.com");
        assert_eq!(account.role, Role::Main);
        assert_eq!(account.address.as_deref(), Some("서울특별시 종로구"));
    }

    #[test]
    fn test_response_omits_password() {
        let json = serde_json::to_value(AccountResponse::from(sample())).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "main");
    }
}
