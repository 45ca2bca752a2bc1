//! Member relation repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::member_relation::{self, ActiveModel, Entity as MemberEntity};
use common::{AppError, AppResult};
use domain::{Member, MemberFilter};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Member>>;

    async fn id_exists(&self, id: &str) -> AppResult<bool>;

    /// Whether the user is already a member of the family
    async fn exists(&self, family_id: &str, user_id: &str) -> AppResult<bool>;

    async fn list(&self, filter: MemberFilter) -> AppResult<Vec<Member>>;

    async fn create(&self, member: Member) -> AppResult<Member>;

    async fn update(&self, member: Member) -> AppResult<Member>;

    async fn delete(&self, id: &str) -> AppResult<bool>;
}

pub struct MemberStore {
    db: DatabaseConnection,
}

impl MemberStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_active(member: Member) -> ActiveModel {
    ActiveModel {
        id: Set(member.id),
        family_id: Set(member.family_id),
        user_id: Set(member.user_id),
        nickname: Set(member.nickname),
    }
}

#[async_trait]
impl MemberRepository for MemberStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Member>> {
        let result = MemberEntity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.map(Member::from))
    }

    async fn id_exists(&self, id: &str) -> AppResult<bool> {
        let count = MemberEntity::find()
            .filter(member_relation::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn exists(&self, family_id: &str, user_id: &str) -> AppResult<bool> {
        let count = MemberEntity::find()
            .filter(member_relation::Column::FamilyId.eq(family_id))
            .filter(member_relation::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn list(&self, filter: MemberFilter) -> AppResult<Vec<Member>> {
        let mut query = MemberEntity::find();
        if let Some(family_id) = filter.family_id {
            query = query.filter(member_relation::Column::FamilyId.eq(family_id));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(member_relation::Column::UserId.eq(user_id));
        }

        let models = query
            .order_by_asc(member_relation::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(Member::from).collect())
    }

    async fn create(&self, member: Member) -> AppResult<Member> {
        let model = to_active(member)
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(Member::from(model))
    }

    async fn update(&self, member: Member) -> AppResult<Member> {
        let model = to_active(member)
            .update(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(Member::from(model))
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = MemberEntity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected > 0)
    }
}
