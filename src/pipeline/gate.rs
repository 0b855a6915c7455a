/// Single-frame backpressure. Owned by one context, so a plain flag suffices.
#[derive(Debug, Default)]
pub struct InFlightGate {
    in_flight: bool,
}

impl InFlightGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the gate; `false` means a frame is already in flight.
    pub fn try_acquire(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn release(&mut self) {
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}
