use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfile::Table)
                    .if_not_exists()
                    // Emails are stored lowercased; they are the user identity.
                    .col(string_len(UserProfile::Email, 255).primary_key())
                    .col(string_len(UserProfile::DisplayName, 100))
                    .col(boolean(UserProfile::IsAdmin).default(false))
                    .col(timestamp_with_time_zone(UserProfile::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Challenge::Table)
                    .if_not_exists()
                    .col(string_len(Challenge::Id, 36).primary_key())
                    .col(string_len(Challenge::Title, 200))
                    .col(text(Challenge::Description))
                    .col(string_len(Challenge::Flag, 255))
                    .col(string_len(Challenge::FlagFormat, 255))
                    // 0=easy, 1=medium, 2=hard
                    .col(
                        small_integer(Challenge::Difficulty)
                            .check(Expr::col(Challenge::Difficulty).gte(0))
                            .check(Expr::col(Challenge::Difficulty).lte(2)),
                    )
                    // 0=web, 1=crypto, 2=forensics, 3=osint, 4=reverse, 5=misc
                    .col(
                        small_integer(Challenge::Category)
                            .check(Expr::col(Challenge::Category).gte(0))
                            .check(Expr::col(Challenge::Category).lte(5)),
                    )
                    .col(integer(Challenge::Points).check(Expr::col(Challenge::Points).gt(0)))
                    .col(boolean(Challenge::IsActive).default(true))
                    .col(string_len(Challenge::CreatedBy, 255))
                    .col(timestamp_with_time_zone(Challenge::CreatedAt))
                    .col(timestamp_with_time_zone(Challenge::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Submission::Table)
                    .if_not_exists()
                    .col(string_len(Submission::Id, 36).primary_key())
                    .col(string_len(Submission::ChallengeId, 36))
                    .col(string_len(Submission::UserEmail, 255))
                    .col(boolean(Submission::IsCorrect))
                    .col(text(Submission::SubmittedFlag))
                    .col(timestamp_with_time_zone(Submission::SubmittedAt))
                    .col(
                        integer(Submission::PointsEarned)
                            .default(0)
                            .check(Expr::col(Submission::PointsEarned).gte(0)),
                    )
                    .col(boolean(Submission::IsFirstBlood).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submission-challenge_id")
                            .from(Submission::Table, Submission::ChallengeId)
                            .to(Challenge::Table, Challenge::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_challenge_id")
                    .table(Submission::Table)
                    .col(Submission::ChallengeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_user_email")
                    .table(Submission::Table)
                    .col(Submission::UserEmail)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_is_correct")
                    .table(Submission::Table)
                    .col(Submission::IsCorrect)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_submitted_at")
                    .table(Submission::Table)
                    .col(Submission::SubmittedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Submission::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Challenge::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UserProfile::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum UserProfile {
    Table,
    Email,
    DisplayName,
    IsAdmin,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Challenge {
    Table,
    Id,
    Title,
    Description,
    Flag,
    FlagFormat,
    Difficulty,
    Category,
    Points,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submission {
    Table,
    Id,
    ChallengeId,
    UserEmail,
    IsCorrect,
    SubmittedFlag,
    SubmittedAt,
    PointsEarned,
    IsFirstBlood,
}
