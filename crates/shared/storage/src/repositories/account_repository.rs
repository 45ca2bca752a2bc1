//! Account repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::account::{self, ActiveModel, Entity as AccountEntity};
use common::{AppError, AppResult};
use domain::Account;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Account>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    async fn email_exists(&self, email: &str) -> AppResult<bool>;

    async fn id_exists(&self, id: &str) -> AppResult<bool>;

    async fn list(&self) -> AppResult<Vec<Account>>;

    /// Accounts with a non-empty address (weather and disaster polling)
    async fn list_with_address(&self) -> AppResult<Vec<Account>>;

    async fn create(&self, account: Account) -> AppResult<Account>;

    /// Overwrite every column except the password.
    async fn update(&self, account: Account) -> AppResult<Account>;

    async fn update_password(&self, id: &str, password_hash: String) -> AppResult<()>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: &str) -> AppResult<bool>;
}

/// Concrete implementation of AccountRepository
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_active(account: Account) -> ActiveModel {
    ActiveModel {
        id: Set(account.id),
        email: Set(account.email),
        password: Set(account.password_hash),
        role: Set(account.role.as_db_str().to_string()),
        user_name: Set(account.user_name),
        birth_date: Set(account.birth_date),
        gender: Set(account.gender.map(|g| g.as_db_str().to_string())),
        address: Set(account.address),
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let count = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn id_exists(&self, id: &str) -> AppResult<bool> {
        let count = AccountEntity::find()
            .filter(account::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn list(&self) -> AppResult<Vec<Account>> {
        let models = AccountEntity::find()
            .order_by_asc(account::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Account::from).collect())
    }

    async fn list_with_address(&self) -> AppResult<Vec<Account>> {
        let models = AccountEntity::find()
            .filter(account::Column::Address.is_not_null())
            .filter(account::Column::Address.ne(""))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Account::from).collect())
    }

    async fn create(&self, account: Account) -> AppResult<Account> {
        let model = to_active(account)
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(Account::from(model))
    }

    async fn update(&self, account: Account) -> AppResult<Account> {
        let mut active = to_active(account);
        active.password = sea_orm::ActiveValue::NotSet;

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Account::from(model))
    }

    async fn update_password(&self, id: &str, password_hash: String) -> AppResult<()> {
        let active = ActiveModel {
            id: Set(id.to_string()),
            password: Set(password_hash),
            ..Default::default()
        };
        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = AccountEntity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}
