use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelRole {
    /// Bound to the vision processor for per-frame tracking.
    Tracking,
    /// Bound to the inference coordinator for digit recognition.
    Classification,
}

impl fmt::Display for ModelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelRole::Tracking => write!(f, "tracking"),
            ModelRole::Classification => write!(f, "classification"),
        }
    }
}
