pub mod camera;
pub mod common;
pub mod config;
pub mod error;
pub mod export;
pub mod headless;
pub mod inference;
pub mod model;
pub mod pipeline;
pub mod session;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Configuration;
pub use error::AppError;
pub use session::{SessionController, SessionHandle};
