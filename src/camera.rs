use image::DynamicImage;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraFacing {
    Front,
    #[default]
    Back,
}

impl CameraFacing {
    pub fn toggled(self) -> Self {
        match self {
            CameraFacing::Front => CameraFacing::Back,
            CameraFacing::Back => CameraFacing::Front,
        }
    }
}

/// The capture device and its preview surface.
///
/// Frame-available notifications are delivered separately, through
/// [`SessionHandle::frame_available`](crate::session::SessionHandle::frame_available).
pub trait CameraController: Send {
    /// Copies the bitmap currently shown on the preview surface.
    fn capture_preview(&mut self) -> Option<DynamicImage>;

    fn facing(&self) -> CameraFacing;

    /// Closes the current device and opens the one facing `facing`.
    fn reopen(&mut self, facing: CameraFacing) -> Result<(), AppError>;
}
