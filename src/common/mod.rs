pub mod frame;
pub mod trajectory;

pub use frame::Frame;
pub use trajectory::{DEFAULT_COORDINATES, coordinates_or_default};
