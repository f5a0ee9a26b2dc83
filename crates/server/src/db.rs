use flagforge_core::domain::UserEmail;
use flagforge_migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::info;

use crate::config::AdminSeed;
use crate::repository::{NewUserProfile, UserProfileRepository};

pub async fn init_pool_and_migrate(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(database_url).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Makes sure every configured admin has an admin profile.
pub async fn seed_admins(
    profiles: &dyn UserProfileRepository,
    admins: &[AdminSeed],
) -> anyhow::Result<()> {
    for seed in admins {
        let email = UserEmail::parse(&seed.email)?;
        let display_name = seed
            .display_name
            .clone()
            .unwrap_or_else(|| email.local_part().to_string());

        profiles
            .upsert(NewUserProfile {
                email: email.clone(),
                display_name,
                is_admin: true,
            })
            .await?;

        info!(email = %email, "admin profile seeded");
    }

    Ok(())
}
