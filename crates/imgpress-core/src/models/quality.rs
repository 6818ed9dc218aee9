use crate::constants::DEFAULT_QUALITY;

/// Encoder quality, always within 1..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub const MAX: Quality = Quality(DEFAULT_QUALITY);

    /// Lenient parse of the `quality` form field.
    ///
    /// Missing, non-numeric and out-of-range values all fall back to 100.
    pub fn from_field(value: Option<&str>) -> Self {
        value
            .map(str::trim)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 1.0 && *v <= 100.0)
            .map(|v| Quality(v.round() as u8))
            .unwrap_or(Self::MAX)
    }

    pub fn new(value: u8) -> Option<Self> {
        (1..=100).contains(&value).then_some(Quality(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::MAX
    }
}
