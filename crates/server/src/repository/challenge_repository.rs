use crate::entity::{challenge, submission};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use flagforge_core::domain::{
    Category, ChallengeId, ChallengeTitle, Difficulty, Flag, Points, UserEmail,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ChallengeRecord {
    pub id: ChallengeId,
    pub title: String,
    pub description: String,
    pub flag: Flag,
    pub flag_format: String,
    pub difficulty: Difficulty,
    pub category: Category,
    pub points: Points,
    pub is_active: bool,
    pub created_by: UserEmail,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewChallenge {
    pub title: ChallengeTitle,
    pub description: String,
    pub flag: Flag,
    pub flag_format: String,
    pub difficulty: Difficulty,
    pub category: Category,
    pub points: Points,
    pub is_active: bool,
    pub created_by: UserEmail,
    pub created_at: DateTime<Utc>,
}

/// Partial patch; `None` leaves the stored value untouched.
#[derive(Debug, Clone)]
pub struct ChallengeUpdate {
    pub title: Option<ChallengeTitle>,
    pub description: Option<String>,
    pub flag: Option<Flag>,
    pub flag_format: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<Category>,
    pub points: Option<Points>,
    pub is_active: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait ChallengeRepository: Send + Sync {
    async fn create(&self, new_challenge: NewChallenge) -> Result<ChallengeRecord>;
    async fn find_by_id(&self, challenge_id: ChallengeId) -> Result<Option<ChallengeRecord>>;
    async fn list(&self, active_only: bool) -> Result<Vec<ChallengeRecord>>;
    async fn update(
        &self,
        challenge_id: ChallengeId,
        update: ChallengeUpdate,
    ) -> Result<Option<ChallengeRecord>>;
    /// Removes the challenge and its ledger entries as one unit.
    ///
    /// Returns how many submissions went with it, or `None` when no such
    /// challenge exists (nothing is removed then).
    async fn delete(&self, challenge_id: ChallengeId) -> Result<Option<u64>>;
    async fn count_active(&self) -> Result<u64>;
}

#[derive(Clone)]
pub struct SeaOrmChallengeRepository {
    db: DatabaseConnection,
}

impl SeaOrmChallengeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_difficulty(code: i16) -> Result<Difficulty> {
        match code {
            0 => Ok(Difficulty::Easy),
            1 => Ok(Difficulty::Medium),
            2 => Ok(Difficulty::Hard),
            _ => Err(anyhow!("invalid challenge.difficulty code from database: {code}")),
        }
    }

    fn map_difficulty_code(difficulty: Difficulty) -> i16 {
        match difficulty {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    fn map_category(code: i16) -> Result<Category> {
        match code {
            0 => Ok(Category::Web),
            1 => Ok(Category::Crypto),
            2 => Ok(Category::Forensics),
            3 => Ok(Category::Osint),
            4 => Ok(Category::Reverse),
            5 => Ok(Category::Misc),
            _ => Err(anyhow!("invalid challenge.category code from database: {code}")),
        }
    }

    fn map_category_code(category: Category) -> i16 {
        match category {
            Category::Web => 0,
            Category::Crypto => 1,
            Category::Forensics => 2,
            Category::Osint => 3,
            Category::Reverse => 4,
            Category::Misc => 5,
        }
    }

    fn map_points_column(points: Points) -> Result<i32> {
        i32::try_from(points.value())
            .map_err(|_| anyhow!("challenge.points {} does not fit the column", points.value()))
    }

    fn map_model(model: challenge::Model) -> Result<ChallengeRecord> {
        let id = ChallengeId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid challenge.id '{}' from database: {e}", model.id))?;
        let flag = Flag::new(model.flag)
            .map_err(|e| anyhow!("invalid challenge.flag for '{}' from database: {e}", model.id))?;
        let points = Points::new(i64::from(model.points)).map_err(|e| {
            anyhow!("invalid challenge.points for '{}' from database: {e}", model.id)
        })?;
        let created_by = UserEmail::parse(&model.created_by).map_err(|e| {
            anyhow!("invalid challenge.created_by for '{}' from database: {e}", model.id)
        })?;

        Ok(ChallengeRecord {
            id,
            title: model.title,
            description: model.description,
            flag,
            flag_format: model.flag_format,
            difficulty: Self::map_difficulty(model.difficulty)?,
            category: Self::map_category(model.category)?,
            points,
            is_active: model.is_active,
            created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[async_trait]
impl ChallengeRepository for SeaOrmChallengeRepository {
    async fn create(&self, new_challenge: NewChallenge) -> Result<ChallengeRecord> {
        let id = ChallengeId::new();

        let active_model = challenge::ActiveModel {
            id: Set(id.to_string()),
            title: Set(new_challenge.title.into_inner()),
            description: Set(new_challenge.description),
            flag: Set(new_challenge.flag.into_inner()),
            flag_format: Set(new_challenge.flag_format),
            difficulty: Set(Self::map_difficulty_code(new_challenge.difficulty)),
            category: Set(Self::map_category_code(new_challenge.category)),
            points: Set(Self::map_points_column(new_challenge.points)?),
            is_active: Set(new_challenge.is_active),
            created_by: Set(new_challenge.created_by.to_string()),
            created_at: Set(new_challenge.created_at),
            updated_at: Set(new_challenge.created_at),
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn find_by_id(&self, challenge_id: ChallengeId) -> Result<Option<ChallengeRecord>> {
        let model = challenge::Entity::find_by_id(challenge_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn list(&self, active_only: bool) -> Result<Vec<ChallengeRecord>> {
        let mut query = challenge::Entity::find();
        if active_only {
            query = query.filter(challenge::Column::IsActive.eq(true));
        }

        let models = query
            .order_by_asc(challenge::Column::Category)
            .order_by_asc(challenge::Column::Points)
            .order_by_asc(challenge::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn update(
        &self,
        challenge_id: ChallengeId,
        update: ChallengeUpdate,
    ) -> Result<Option<ChallengeRecord>> {
        let Some(model) = challenge::Entity::find_by_id(challenge_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: challenge::ActiveModel = model.into();
        if let Some(title) = update.title {
            active_model.title = Set(title.into_inner());
        }
        if let Some(description) = update.description {
            active_model.description = Set(description);
        }
        if let Some(flag) = update.flag {
            active_model.flag = Set(flag.into_inner());
        }
        if let Some(flag_format) = update.flag_format {
            active_model.flag_format = Set(flag_format);
        }
        if let Some(difficulty) = update.difficulty {
            active_model.difficulty = Set(Self::map_difficulty_code(difficulty));
        }
        if let Some(category) = update.category {
            active_model.category = Set(Self::map_category_code(category));
        }
        if let Some(points) = update.points {
            active_model.points = Set(Self::map_points_column(points)?);
        }
        if let Some(is_active) = update.is_active {
            active_model.is_active = Set(is_active);
        }
        active_model.updated_at = Set(update.updated_at);

        let updated = active_model.update(&self.db).await?;
        Self::map_model(updated).map(Some)
    }

    async fn delete(&self, challenge_id: ChallengeId) -> Result<Option<u64>> {
        let txn = self.db.begin().await?;

        // Explicit so the ledger goes too where FK enforcement is off.
        let submissions = submission::Entity::delete_many()
            .filter(submission::Column::ChallengeId.eq(challenge_id.to_string()))
            .exec(&txn)
            .await?;
        let challenges = challenge::Entity::delete_by_id(challenge_id.to_string())
            .exec(&txn)
            .await?;

        if challenges.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        txn.commit().await?;
        Ok(Some(submissions.rows_affected))
    }

    async fn count_active(&self) -> Result<u64> {
        let count = challenge::Entity::find()
            .filter(challenge::Column::IsActive.eq(true))
            .count(&self.db)
            .await?;

        Ok(count)
    }
}
