use std::fmt;

use super::DomainError;

/// User identity key. Scoring joins users by email, so every email is trimmed
/// and lowercased before it gets anywhere near the ledger.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserEmail(String);

impl UserEmail {
    pub const MAX_LEN: usize = 254;

    pub fn parse(value: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = value.as_ref();
        let normalized = raw.trim().to_lowercase();

        let valid = match normalized.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && normalized.chars().count() <= Self::MAX_LEN
                    && !domain.contains('@')
                    && !normalized.contains(char::is_whitespace)
            }
            None => false,
        };

        if valid {
            Ok(Self(normalized))
        } else {
            Err(DomainError::InvalidEmail(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the `@`, used as a nickname when no profile exists.
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or(self.0.as_str(), |(local, _)| local)
    }
}

impl fmt::Display for UserEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
