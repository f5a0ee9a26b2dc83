use super::DomainError;

/// The secret a player has to submit. Stored trimmed.
#[derive(Clone, PartialEq, Eq)]
pub struct Flag(String);

impl Flag {
    pub const MASK: &'static str = "********";
    pub const MAX_LEN: usize = 255;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(DomainError::EmptyFlag);
        }

        let len = trimmed.chars().count();
        if len > Self::MAX_LEN {
            return Err(DomainError::FlagTooLong(len));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Exact, case-sensitive comparison after trimming the attempt.
    pub fn matches(&self, attempt: &str) -> bool {
        self.0 == attempt.trim()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

// Keep the secret out of logs and panic messages.
impl std::fmt::Debug for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Flag").field(&Self::MASK).finish()
    }
}

/// Hint shown to players about the flag's shape, e.g. `CTF{...}`. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FlagFormat(String);

impl FlagFormat {
    pub const MAX_LEN: usize = 255;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();

        let len = trimmed.chars().count();
        if len > Self::MAX_LEN {
            return Err(DomainError::FlagFormatTooLong(len));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChallengeTitle(String);

impl ChallengeTitle {
    pub const MAX_LEN: usize = 200;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(DomainError::EmptyTitle);
        }

        let len = trimmed.chars().count();
        if len > Self::MAX_LEN {
            return Err(DomainError::TitleTooLong(len));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
