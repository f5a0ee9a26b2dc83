use super::DomainError;

/// Base award of a challenge, in `1..=Points::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Points(u32);

impl Points {
    /// Largest base award. A first-blood award of `round(1.5 * MAX)` still
    /// fits a signed 32-bit column.
    pub const MAX: u32 = 1_000_000_000;

    pub fn new(value: i64) -> Result<Self, DomainError> {
        match u32::try_from(value) {
            Ok(points) if (1..=Self::MAX).contains(&points) => Ok(Self(points)),
            _ => Err(DomainError::InvalidPoints(value)),
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Points granted for a submission against a challenge worth `self`.
    ///
    /// First blood earns `round(1.5 * P)`, reported as the base `P` plus a
    /// bonus of `round(0.5 * P)` (half rounds up).
    pub fn award(self, correct: bool, first_blood: bool) -> Award {
        if !correct {
            return Award::default();
        }

        let bonus = if first_blood { self.0.div_ceil(2) } else { 0 };

        Award {
            points_awarded: self.0 + bonus,
            bonus_points: bonus,
            first_blood,
        }
    }
}

impl TryFrom<i64> for Points {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Points> for u32 {
    fn from(value: Points) -> Self {
        value.value()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Award {
    pub points_awarded: u32,
    pub bonus_points: u32,
    pub first_blood: bool,
}
