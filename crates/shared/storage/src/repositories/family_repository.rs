//! Family repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::family::{self, ActiveModel, Entity as FamilyEntity};
use crate::entities::member_relation::{self, Entity as MemberEntity};
use common::{AppError, AppResult};
use domain::{Family, FamilyAccess};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FamilyRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Family>>;

    async fn find_by_main_user(&self, main_user: &str) -> AppResult<Option<Family>>;

    async fn id_exists(&self, id: &str) -> AppResult<bool>;

    async fn list(&self) -> AppResult<Vec<Family>>;

    async fn create(&self, family: Family) -> AppResult<Family>;

    async fn update(&self, family: Family) -> AppResult<Family>;

    async fn delete(&self, id: &str) -> AppResult<bool>;

    /// Main user and member user ids of a family, `None` if it doesn't exist
    async fn access(&self, family_id: &str) -> AppResult<Option<FamilyAccess>>;

    /// Families a user belongs to, as main user or member
    async fn families_of(&self, user_id: &str) -> AppResult<Vec<Family>>;
}

pub struct FamilyStore {
    db: DatabaseConnection,
}

impl FamilyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FamilyRepository for FamilyStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Family>> {
        let result = FamilyEntity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.map(Family::from))
    }

    async fn find_by_main_user(&self, main_user: &str) -> AppResult<Option<Family>> {
        let result = FamilyEntity::find()
            .filter(family::Column::MainUser.eq(main_user))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.map(Family::from))
    }

    async fn id_exists(&self, id: &str) -> AppResult<bool> {
        let count = FamilyEntity::find()
            .filter(family::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn list(&self) -> AppResult<Vec<Family>> {
        let models = FamilyEntity::find()
            .order_by_asc(family::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(Family::from).collect())
    }

    async fn create(&self, family: Family) -> AppResult<Family> {
        let active = ActiveModel {
            id: Set(family.id),
            main_user: Set(family.main_user),
            family_name: Set(family.family_name),
        };
        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Family::from(model))
    }

    async fn update(&self, family: Family) -> AppResult<Family> {
        let active = ActiveModel {
            id: Set(family.id),
            main_user: Set(family.main_user),
            family_name: Set(family.family_name),
        };
        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Family::from(model))
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = FamilyEntity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected > 0)
    }

    async fn access(&self, family_id: &str) -> AppResult<Option<FamilyAccess>> {
        let Some(family) = FamilyEntity::find_by_id(family_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let member_user_ids: Vec<String> = MemberEntity::find()
            .select_only()
            .column(member_relation::Column::UserId)
            .filter(member_relation::Column::FamilyId.eq(family_id))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(Some(FamilyAccess::new(family.main_user, member_user_ids)))
    }

    async fn families_of(&self, user_id: &str) -> AppResult<Vec<Family>> {
        let member_family_ids: Vec<String> = MemberEntity::find()
            .select_only()
            .column(member_relation::Column::FamilyId)
            .filter(member_relation::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await?;

        let models = FamilyEntity::find()
            .filter(
                Condition::any()
                    .add(family::Column::MainUser.eq(user_id))
                    .add(family::Column::Id.is_in(member_family_ids)),
            )
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Family::from).collect())
    }
}
