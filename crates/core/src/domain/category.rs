use std::fmt;
use std::str::FromStr;

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Web,
    Crypto,
    Forensics,
    Osint,
    Reverse,
    Misc,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Web,
        Self::Crypto,
        Self::Forensics,
        Self::Osint,
        Self::Reverse,
        Self::Misc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "Web",
            Self::Crypto => "Crypto",
            Self::Forensics => "Forensics",
            Self::Osint => "OSINT",
            Self::Reverse => "Reverse",
            Self::Misc => "Misc",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}
