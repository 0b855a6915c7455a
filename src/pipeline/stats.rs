#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub delivered: u64,
    pub dispatched: u64,
    pub dropped: u64,
    pub stale: u64,
    pub failed: u64,
}

impl FrameStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
