use image::DynamicImage;

/// The UI surface the session drives.
pub trait LiveView: Send {
    fn display(&mut self, overlay: &DynamicImage);

    /// Flips start/stop affordances.
    fn set_recording(&mut self, recording: bool);

    /// User-visible notice, e.g. a toast.
    fn notify(&mut self, message: &str);
}
