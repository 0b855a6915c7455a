use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::SessionState;

#[derive(Debug, Clone, Copy)]
struct ActiveSession {
    id: Uuid,
    started_at: DateTime<Utc>,
}

/// Idle ⇄ Recording. A session id exists exactly while processing.
#[derive(Debug, Default)]
pub struct SessionStateMachine {
    state: SessionState,
    active: Option<ActiveSession>,
}

impl SessionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.active.map(|active| active.id)
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.active.map(|active| active.started_at)
    }

    /// Enters Recording with a fresh session id. `None` if already recording.
    pub fn start(&mut self) -> Option<Uuid> {
        if self.state.is_recording() {
            debug!("Start ignored, already recording");
            return None;
        }
        let id = Uuid::new_v4();
        self.active = Some(ActiveSession {
            id,
            started_at: Utc::now(),
        });
        self.state = SessionState::Recording;
        Some(id)
    }

    /// Returns to Idle and yields the id of the session that ended. `None` if already idle.
    pub fn stop(&mut self) -> Option<Uuid> {
        if self.state == SessionState::Idle {
            debug!("Stop ignored, already idle");
            return None;
        }
        self.state = SessionState::Idle;
        self.active.take().map(|active| active.id)
    }
}
