use chrono::{DateTime, Utc};
use flagforge_core::domain::{ChallengeId, UserEmail};
use tokio::sync::broadcast;

/// Published after every correct submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveEvent {
    pub challenge_id: ChallengeId,
    pub challenge_title: String,
    pub user_email: UserEmail,
    pub points_awarded: u32,
    pub first_blood: bool,
    pub solved_at: DateTime<Utc>,
}

/// Fan-out of solve events over `tokio::broadcast`.
#[derive(Debug, Clone)]
pub struct SolveBroadcaster {
    sender: broadcast::Sender<SolveEvent>,
}

impl SolveBroadcaster {
    /// `capacity` is the broadcast queue length; slow subscribers lag past it.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishing with no subscribers is not an error.
    pub fn emit(&self, event: SolveEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> SolveStream {
        SolveStream {
            receiver: self.sender.subscribe(),
        }
    }
}

#[derive(Debug)]
pub struct SolveStream {
    receiver: broadcast::Receiver<SolveEvent>,
}

impl SolveStream {
    pub async fn recv(&mut self) -> Result<SolveEvent, broadcast::error::RecvError> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Result<SolveEvent, broadcast::error::TryRecvError> {
        self.receiver.try_recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> SolveEvent {
        SolveEvent {
            challenge_id: ChallengeId::new(),
            challenge_title: "Warmup".to_string(),
            user_email: UserEmail::parse("a@x.com").expect("valid email"),
            points_awarded: 150,
            first_blood: true,
            solved_at: Utc::now(),
        }
    }

    #[test]
    fn subscribers_receive_emitted_events() {
        let broadcaster = SolveBroadcaster::new(8);
        let mut stream = broadcaster.subscribe();

        let sent = event();
        broadcaster.emit(sent.clone());

        assert_eq!(stream.try_recv().expect("event should be queued"), sent);
        assert!(stream.try_recv().is_err());
    }

    #[test]
    fn emitting_without_subscribers_is_silent() {
        let broadcaster = SolveBroadcaster::new(0);
        broadcaster.emit(event());
    }
}
