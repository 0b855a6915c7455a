/// Recording implies Processing: there is no state that records without processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Processing,
    Recording,
}

impl SessionState {
    pub fn is_processing(self) -> bool {
        matches!(self, SessionState::Processing | SessionState::Recording)
    }

    pub fn is_recording(self) -> bool {
        self == SessionState::Recording
    }
}
