use chrono::{DateTime, TimeDelta, Utc};

/// How many attempts a user may make on one challenge.
///
/// `Unlimited` keeps every wrong guess allowed, which is the platform's
/// historical behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttemptPolicy {
    #[default]
    Unlimited,
    Limited { max_attempts: u32, window_secs: u64 },
}

impl AttemptPolicy {
    /// Start of the trailing window ending at `now`, if attempts are limited.
    pub fn window_start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match *self {
            Self::Unlimited => None,
            Self::Limited { window_secs, .. } => {
                let secs = i64::try_from(window_secs).unwrap_or(i64::MAX);
                let window = TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX);
                Some(
                    now.checked_sub_signed(window)
                        .unwrap_or(DateTime::<Utc>::MIN_UTC),
                )
            }
        }
    }

    pub fn allows(&self, attempts_in_window: u64) -> bool {
        match *self {
            Self::Unlimited => true,
            Self::Limited { max_attempts, .. } => attempts_in_window < u64::from(max_attempts),
        }
    }
}
