//! Family service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use common::{AppError, AppResult, OptionExt};
use domain::{Family, IdKind, Password};
use storage::{AccountRepository, FamilyRepository};

use super::{ensure_password_given, unique_id};

#[async_trait]
pub trait FamilyService: Send + Sync {
    /// Id of the family whose main user is `main_user`
    async fn family_of_main_user(&self, main_user: &str) -> AppResult<String>;

    async fn create_family(&self, main_user: &str, family_name: Option<String>)
        -> AppResult<String>;

    async fn list_families(&self) -> AppResult<Vec<Family>>;

    async fn get_family(&self, id: &str) -> AppResult<Family>;

    async fn update_family(&self, id: &str, family_name: Option<String>) -> AppResult<Family>;

    /// Delete after checking the main user's password
    async fn delete_family(&self, id: &str, password: &str) -> AppResult<()>;
}

pub struct FamilyManager {
    families: Arc<dyn FamilyRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl FamilyManager {
    pub fn new(families: Arc<dyn FamilyRepository>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { families, accounts }
    }
}

#[async_trait]
impl FamilyService for FamilyManager {
    async fn family_of_main_user(&self, main_user: &str) -> AppResult<String> {
        let family = self
            .families
            .find_by_main_user(main_user)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Main ID does not have a family")
                    .with_input(json!({"id": main_user}))
            })?;
        Ok(family.id)
    }

    async fn create_family(
        &self,
        main_user: &str,
        family_name: Option<String>,
    ) -> AppResult<String> {
        let input = json!({"main_user": main_user, "family_name": family_name});

        if self.families.find_by_main_user(main_user).await?.is_some() {
            return Err(AppError::conflict("Main user already has a family").with_input(input));
        }

        let is_main = self
            .accounts
            .find_by_id(main_user)
            .await?
            .map(|account| account.is_main())
            .unwrap_or(false);
        if !is_main {
            return Err(
                AppError::invalid_value("Does not exist or is not a main user").with_input(input)
            );
        }

        let repo = self.families.clone();
        let id = unique_id(IdKind::Family, |candidate| {
            let repo = repo.clone();
            async move { repo.id_exists(&candidate).await }
        })
        .await?;

        let family = self
            .families
            .create(Family::new(id, main_user.to_string(), family_name))
            .await?;

        tracing::info!(family_id = %family.id, main_user = %main_user, "Family created");
        Ok(family.id)
    }

    async fn list_families(&self) -> AppResult<Vec<Family>> {
        self.families.list().await
    }

    async fn get_family(&self, id: &str) -> AppResult<Family> {
        self.families
            .find_by_id(id)
            .await?
            .ok_or_not_found("Family not found")
    }

    async fn update_family(&self, id: &str, family_name: Option<String>) -> AppResult<Family> {
        let mut family = self.get_family(id).await?;
        family.rename(family_name);
        self.families.update(family).await
    }

    async fn delete_family(&self, id: &str, password: &str) -> AppResult<()> {
        let family = self.get_family(id).await?;
        ensure_password_given(id, password)?;

        let hash = self
            .accounts
            .find_by_id(&family.main_user)
            .await?
            .map(|account| account.password_hash)
            .unwrap_or_default();

        if !Password::from_hash(hash).verify(password) {
            return Err(AppError::unauthorized("Invalid password")
                .with_input(json!({"family_id": id, "password": password})));
        }

        self.families.delete(id).await?;
        tracing::info!(family_id = %id, "Family deleted");
        Ok(())
    }
}
