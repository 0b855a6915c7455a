//! The session owner: state machine, event loop and the wiring between components.
pub mod controller;
pub mod events;
pub mod machine;
pub mod state;

pub use controller::{SessionController, SessionControllerBuilder};
pub use events::{SessionEvent, SessionHandle};
pub use machine::SessionStateMachine;
pub use state::SessionState;
