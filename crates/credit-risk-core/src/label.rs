//! Credit risk outcome labels.

use std::fmt;

/// Decoded classifier outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLabel {
    Bad,
    Good,
}

impl RiskLabel {
    /// Decode a classifier class: `0` is bad, every other class is good.
    ///
    /// Only sound for a strictly binary classifier with classes `{0, 1}`.
    pub fn from_class(class: i64) -> Self {
        if class == 0 { Self::Bad } else { Self::Good }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bad => "bad",
            Self::Good => "good",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
