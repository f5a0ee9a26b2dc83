use std::collections::HashMap;
use std::sync::Arc;

use flagforge_core::domain::ChallengeId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per challenge.
///
/// Held across the already-solved check, the first-blood check and the ledger
/// append so that two correct submissions for the same challenge cannot both
/// see an empty solver set. Admin updates and deletes take the same lock.
#[derive(Debug, Default)]
pub struct ChallengeLocks {
    locks: Mutex<HashMap<ChallengeId, Arc<Mutex<()>>>>,
}

impl ChallengeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, challenge_id: ChallengeId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(challenge_id).or_default().clone()
        };

        lock.lock_owned().await
    }

    /// Drops the entry of a deleted challenge. Guards already handed out stay
    /// valid.
    pub async fn forget(&self, challenge_id: ChallengeId) {
        self.locks.lock().await.remove(&challenge_id);
    }

    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}
