use serde::{Deserialize, Serialize};

/// Letter and digit recognition are mutually exclusive, so the pair of flags is one enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecognitionMode {
    Letter,
    #[default]
    Digit,
}

impl RecognitionMode {
    pub fn is_letter(self) -> bool {
        self == RecognitionMode::Letter
    }

    pub fn is_digit(self) -> bool {
        self == RecognitionMode::Digit
    }

    pub fn toggled(self) -> Self {
        match self {
            RecognitionMode::Letter => RecognitionMode::Digit,
            RecognitionMode::Digit => RecognitionMode::Letter,
        }
    }

    pub fn toggle(&mut self) {
        *self = self.toggled();
    }

    /// Setting the letter flag clears the digit flag and vice versa.
    pub fn set_letter(&mut self, enabled: bool) {
        *self = if enabled {
            RecognitionMode::Letter
        } else {
            RecognitionMode::Digit
        };
    }

    pub fn set_digit(&mut self, enabled: bool) {
        self.set_letter(!enabled);
    }
}
