use crate::entity::user_profile;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use flagforge_core::domain::UserEmail;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfileRecord {
    pub email: UserEmail,
    pub display_name: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone)]
pub struct NewUserProfile {
    pub email: UserEmail,
    pub display_name: String,
    pub is_admin: bool,
}

/// Profiles belong to the identity provider; scoring only reads them; the
/// upsert exists for seeding admins.
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    async fn find_by_email(&self, email: &UserEmail) -> Result<Option<UserProfileRecord>>;
    async fn find_many(&self, emails: &[UserEmail]) -> Result<Vec<UserProfileRecord>>;
    async fn upsert(&self, profile: NewUserProfile) -> Result<UserProfileRecord>;
}

#[derive(Clone)]
pub struct SeaOrmUserProfileRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: user_profile::Model) -> Result<UserProfileRecord> {
        let email = UserEmail::parse(&model.email).map_err(|e| {
            anyhow!("invalid user_profile.email '{}' from database: {e}", model.email)
        })?;

        Ok(UserProfileRecord {
            email,
            display_name: model.display_name,
            is_admin: model.is_admin,
        })
    }
}

#[async_trait]
impl UserProfileRepository for SeaOrmUserProfileRepository {
    async fn find_by_email(&self, email: &UserEmail) -> Result<Option<UserProfileRecord>> {
        let model = user_profile::Entity::find_by_id(email.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn find_many(&self, emails: &[UserEmail]) -> Result<Vec<UserProfileRecord>> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }

        let models = user_profile::Entity::find()
            .filter(user_profile::Column::Email.is_in(emails.iter().map(UserEmail::to_string)))
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn upsert(&self, profile: NewUserProfile) -> Result<UserProfileRecord> {
        let existing = user_profile::Entity::find_by_id(profile.email.to_string())
            .one(&self.db)
            .await?;

        let model = match existing {
            Some(model) => {
                let mut active_model: user_profile::ActiveModel = model.into();
                active_model.display_name = Set(profile.display_name);
                active_model.is_admin = Set(profile.is_admin);
                active_model.update(&self.db).await?
            }
            None => {
                user_profile::ActiveModel {
                    email: Set(profile.email.to_string()),
                    display_name: Set(profile.display_name),
                    is_admin: Set(profile.is_admin),
                    created_at: Set(Utc::now()),
                }
                .insert(&self.db)
                .await?
            }
        };

        Self::map_model(model)
    }
}
