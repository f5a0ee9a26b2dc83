use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("flag must not be empty")]
    EmptyFlag,
    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),
    #[error("invalid points: {0}. points must be between 1 and 1000000000")]
    InvalidPoints(i64),
    #[error("flag is too long: {0} characters")]
    FlagTooLong(usize),
    #[error("flag format is too long: {0} characters")]
    FlagFormatTooLong(usize),
    #[error("challenge title must not be empty")]
    EmptyTitle,
    #[error("challenge title is too long: {0} characters")]
    TitleTooLong(usize),
    #[error("unknown difficulty: '{0}'")]
    UnknownDifficulty(String),
    #[error("unknown category: '{0}'")]
    UnknownCategory(String),
}
