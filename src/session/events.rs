use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::trace;

use crate::error::AppError;
use crate::model::ModelEvent;
use crate::pipeline::FrameCompletion;

/// Everything that reaches the session owner. Producers on other contexts only ever send these.
pub enum SessionEvent {
    Start,
    Stop,
    SwitchCamera,
    ToggleMode,
    FrameAvailable,
    FrameProcessed(FrameCompletion),
    Model(ModelEvent),
    Shutdown,
}

impl From<FrameCompletion> for SessionEvent {
    fn from(completion: FrameCompletion) -> Self {
        SessionEvent::FrameProcessed(completion)
    }
}

impl From<ModelEvent> for SessionEvent {
    fn from(event: ModelEvent) -> Self {
        SessionEvent::Model(event)
    }
}

/// Cloneable entry point into the session owner's inbox.
#[derive(Clone)]
pub struct SessionHandle {
    event_tx: mpsc::Sender<SessionEvent>,
}

impl SessionHandle {
    pub fn new(event_tx: mpsc::Sender<SessionEvent>) -> Self {
        Self { event_tx }
    }

    /// True once the session owner has shut down.
    pub fn is_closed(&self) -> bool {
        self.event_tx.is_closed()
    }

    /// Camera-side notification. Never blocks; returns `false` if the notice was dropped.
    pub fn frame_available(&self) -> bool {
        match self.event_tx.try_send(SessionEvent::FrameAvailable) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                trace!("Session inbox full, frame notice dropped");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    pub async fn start(&self) -> Result<(), AppError> {
        self.send(SessionEvent::Start).await
    }

    pub async fn stop(&self) -> Result<(), AppError> {
        self.send(SessionEvent::Stop).await
    }

    pub async fn switch_camera(&self) -> Result<(), AppError> {
        self.send(SessionEvent::SwitchCamera).await
    }

    pub async fn toggle_mode(&self) -> Result<(), AppError> {
        self.send(SessionEvent::ToggleMode).await
    }

    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.send(SessionEvent::Shutdown).await
    }

    async fn send(&self, event: SessionEvent) -> Result<(), AppError> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| AppError::Session("session controller is not running".to_string()))
    }
}
