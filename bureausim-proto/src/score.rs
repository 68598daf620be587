//! Score presentation: elapsed-time formatting and percentile inversion.
//!
//! Elapsed time is whole seconds everywhere. The results screen shows it as
//! minutes with two decimals; the percentile P is shown as "top (100 - P)%".

use std::fmt;

/// Percentile shown when score submission fails or returns none.
pub const DEFAULT_PERCENTILE: Percentile = Percentile(50);

/// Format seconds as `MM:SS`. Minutes never roll over into hours.
#[must_use]
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format seconds as decimal minutes with two places (180 → `"3.00"`).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_minutes(seconds: u64) -> String {
    format!("{:.2}", seconds as f64 / 60.0)
}

/// Server-reported rank, clamped to `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percentile(u8);

impl Percentile {
    /// Build from an integer, clamping to 100.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Build from a wire value, rounding and clamping. NaN maps to the default.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_wire(value: f64) -> Self {
        if value.is_nan() {
            return DEFAULT_PERCENTILE;
        }
        Self(value.round().clamp(0.0, 100.0) as u8)
    }

    /// Raw percentile.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// The "top X%" figure: `100 - P`.
    #[must_use]
    pub const fn top_percent(self) -> u8 {
        100 - self.0
    }
}

impl Default for Percentile {
    fn default() -> Self {
        DEFAULT_PERCENTILE
    }
}

impl fmt::Display for Percentile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "top {}%", self.top_percent())
    }
}
