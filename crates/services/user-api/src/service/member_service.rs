//! Member service - sub users attached to a family.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use common::{AppError, AppResult, OptionExt};
use domain::{IdKind, Member, MemberFilter, Password};
use storage::{AccountRepository, FamilyRepository, MemberRepository};

use super::{ensure_password_given, unique_id};

#[async_trait]
pub trait MemberService: Send + Sync {
    async fn create_member(
        &self,
        family_id: &str,
        user_id: &str,
        nickname: Option<String>,
    ) -> AppResult<String>;

    async fn list_members(&self, filter: MemberFilter) -> AppResult<Vec<Member>>;

    async fn get_member(&self, id: &str) -> AppResult<Member>;

    async fn update_member(&self, id: &str, nickname: Option<String>) -> AppResult<Member>;

    /// Delete after checking the member user's password
    async fn delete_member(&self, id: &str, password: &str) -> AppResult<()>;
}

pub struct MemberManager {
    members: Arc<dyn MemberRepository>,
    families: Arc<dyn FamilyRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl MemberManager {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        families: Arc<dyn FamilyRepository>,
        accounts: Arc<dyn AccountRepository>,
    ) -> Self {
        Self {
            members,
            families,
            accounts,
        }
    }
}

#[async_trait]
impl MemberService for MemberManager {
    async fn create_member(
        &self,
        family_id: &str,
        user_id: &str,
        nickname: Option<String>,
    ) -> AppResult<String> {
        let input = json!({"family_id": family_id, "user_id": user_id, "nickname": nickname});

        if !self.families.id_exists(family_id).await? {
            return Err(AppError::not_found("Family not found").with_input(input));
        }

        let is_sub = self
            .accounts
            .find_by_id(user_id)
            .await?
            .map(|account| account.is_sub())
            .unwrap_or(false);
        if !is_sub {
            return Err(
                AppError::invalid_value("User not found or is not a sub user").with_input(input)
            );
        }

        if self.members.exists(family_id, user_id).await? {
            return Err(AppError::conflict("Member already exists in family").with_input(input));
        }

        let repo = self.members.clone();
        let id = unique_id(IdKind::Member, |candidate| {
            let repo = repo.clone();
            async move { repo.id_exists(&candidate).await }
        })
        .await?;

        let member = self
            .members
            .create(Member::new(
                id,
                family_id.to_string(),
                user_id.to_string(),
                nickname,
            ))
            .await?;

        tracing::info!(member_id = %member.id, family_id = %family_id, "Member created");
        Ok(member.id)
    }

    async fn list_members(&self, filter: MemberFilter) -> AppResult<Vec<Member>> {
        self.members.list(filter).await
    }

    async fn get_member(&self, id: &str) -> AppResult<Member> {
        self.members
            .find_by_id(id)
            .await?
            .ok_or_not_found("Member not found")
    }

    async fn update_member(&self, id: &str, nickname: Option<String>) -> AppResult<Member> {
        let mut member = self.get_member(id).await?;
        member.rename(nickname);
        self.members.update(member).await
    }

    async fn delete_member(&self, id: &str, password: &str) -> AppResult<()> {
        let member = self.get_member(id).await?;
        ensure_password_given(id, password)?;

        let hash = self
            .accounts
            .find_by_id(&member.user_id)
            .await?
            .map(|account| account.password_hash)
            .unwrap_or_default();

        if !Password::from_hash(hash).verify(password) {
            return Err(AppError::unauthorized("Invalid password")
                .with_input(json!({"member_id": id, "password": password})));
        }

        self.members.delete(id).await?;
        tracing::info!(member_id = %id, "Member deleted");
        Ok(())
    }
}
