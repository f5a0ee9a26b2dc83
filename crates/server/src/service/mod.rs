//! CTF scoring engine on top of the repositories.
//!
//! `CtfService` is split by concern: `submit` holds the write path,
//! `standings` the read-side aggregations and `challenges` the admin-gated
//! challenge management.

mod challenges;
mod clock;
mod error;
mod locks;
mod policy;
mod standings;
mod submit;

use std::sync::Arc;

use crate::events::{SolveBroadcaster, SolveStream};
use crate::repository::{ChallengeRepository, SubmissionRepository, UserProfileRepository};

pub use challenges::{ChallengeDraft, ChallengePatch, ChallengeView};
pub use clock::{Clock, SystemClock};
pub use error::{CtfError, Result};
pub use locks::ChallengeLocks;
pub use policy::AttemptPolicy;
pub use standings::ScoreboardEntry;
pub use submit::SubmitResult;

const DEFAULT_EVENT_BUFFER_SIZE: usize = 1_000;

pub struct CtfService {
    challenges: Arc<dyn ChallengeRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    profiles: Arc<dyn UserProfileRepository>,
    locks: ChallengeLocks,
    policy: AttemptPolicy,
    clock: Arc<dyn Clock>,
    events: SolveBroadcaster,
}

impl CtfService {
    pub fn new(
        challenges: Arc<dyn ChallengeRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        profiles: Arc<dyn UserProfileRepository>,
    ) -> Self {
        Self {
            challenges,
            submissions,
            profiles,
            locks: ChallengeLocks::new(),
            policy: AttemptPolicy::default(),
            clock: Arc::new(SystemClock),
            events: SolveBroadcaster::new(DEFAULT_EVENT_BUFFER_SIZE),
        }
    }

    pub fn with_policy(mut self, policy: AttemptPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.events = SolveBroadcaster::new(capacity);
        self
    }

    pub fn policy(&self) -> AttemptPolicy {
        self.policy
    }

    pub fn subscribe_solves(&self) -> SolveStream {
        self.events.subscribe()
    }
}
