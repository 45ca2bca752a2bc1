//! Account service - registration, lookup, update and removal of accounts.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use common::{AppError, AppResult, OptionExt};
use domain::{Account, AccountChanges, BirthDate, Gender, IdKind, Password, Role};
use storage::AccountRepository;

use super::{ensure_password_given, unique_id};
use crate::middleware::{require_self_or_system, CurrentUser};

/// Input of a new account. The password is still plain text.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub user_name: Option<String>,
    pub birth_date: Option<BirthDate>,
    pub gender: Gender,
    pub address: Option<String>,
}

/// Partial update of an account as requested.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub user_name: Option<String>,
    pub birth_date: Option<BirthDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
}

#[async_trait]
pub trait AccountService: Send + Sync {
    /// Ok when no account uses the email yet
    async fn check_email(&self, email: &str) -> AppResult<()>;

    /// Create an account and return its id
    async fn create_account(&self, input: NewAccount) -> AppResult<String>;

    async fn list_accounts(&self) -> AppResult<Vec<Account>>;

    /// Read an account as `requester` (itself or SYSTEM)
    async fn get_account(&self, requester: &CurrentUser, id: &str) -> AppResult<Account>;

    async fn update_account(&self, id: &str, patch: AccountPatch) -> AppResult<Account>;

    /// Delete after checking the account's own password
    async fn delete_account(&self, id: &str, password: &str) -> AppResult<()>;
}

pub struct AccountManager {
    repo: Arc<dyn AccountRepository>,
}

impl AccountManager {
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }

    async fn ensure_email_free(&self, email: &str) -> AppResult<()> {
        if self.repo.email_exists(email).await? {
            return Err(AppError::conflict("Email is already in use").with_input(json!({
                "email": email,
            })));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn check_email(&self, email: &str) -> AppResult<()> {
        self.ensure_email_free(email).await
    }

    async fn create_account(&self, input: NewAccount) -> AppResult<String> {
        self.ensure_email_free(&input.email).await?;

        let birth_date = input.birth_date.map(|b| b.to_date()).transpose()?;
        let password = Password::new(&input.password)?;

        let repo = self.repo.clone();
        let id = unique_id(IdKind::User, |candidate| {
            let repo = repo.clone();
            async move { repo.id_exists(&candidate).await }
        })
        .await?;

        let account = Account::new(
            id,
            input.email,
            password.into_string(),
            input.role,
            input.user_name,
            birth_date,
            input.gender,
            input.address,
        );
        let created = self.repo.create(account).await?;

        tracing::info!(account_id = %created.id, role = %created.role, "Account created");
        Ok(created.id)
    }

    async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        self.repo.list().await
    }

    async fn get_account(&self, requester: &CurrentUser, id: &str) -> AppResult<Account> {
        require_self_or_system(requester, id)?;

        self.repo
            .find_by_id(id)
            .await?
            .ok_or_not_found("Account not found")
    }

    async fn update_account(&self, id: &str, patch: AccountPatch) -> AppResult<Account> {
        let mut account = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_not_found("Account not found")?;

        if let Some(email) = patch.email.as_deref() {
            if email != account.email {
                self.ensure_email_free(email).await?;
            }
        }
        let birth_date = patch.birth_date.map(|b| b.to_date()).transpose()?;

        account.apply(AccountChanges {
            email: patch.email,
            role: patch.role,
            user_name: patch.user_name,
            birth_date,
            gender: patch.gender,
            address: patch.address,
        });

        self.repo.update(account).await
    }

    async fn delete_account(&self, id: &str, password: &str) -> AppResult<()> {
        let account = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_not_found("Account not found")?;
        ensure_password_given(id, password)?;

        if !Password::from_hash(account.password_hash).verify(password) {
            return Err(AppError::unauthorized("Invalid password")
                .with_input(json!({"user_id": id, "password": password})));
        }

        self.repo.delete(id).await?;
        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }
}
