//! The fixed price ranges used to build the price histogram.

use std::fmt::Display;

/// A price range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    /// The lowest price in the range.
    pub min: f64,
    /// The highest price in the range, `None` if the range has no upper bound.
    pub max: Option<f64>,
}

impl PriceRange {
    const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    const fn unbounded(min: f64) -> Self {
        Self { min, max: None }
    }

    /// Whether `price` is within the range, including both bounds.
    ///
    /// Mirrors the SQL condition built by `WhereClause::and_price_between`.
    #[cfg(test)]
    pub(crate) fn contains(&self, price: f64) -> bool {
        self.min <= price && self.max.is_none_or(|max| price <= max)
    }
}

/// Formats the range as "min-max", e.g. "101-200", or "901-Infinity" for an
/// unbounded range.
impl Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}-Infinity", self.min),
        }
    }
}

/// The ten price ranges of the histogram, in increasing order.
///
/// Each range after the first starts one above the previous maximum, so a
/// fractional price between two ranges, e.g. 100.5, is in neither.
pub const PRICE_RANGES: [PriceRange; 10] = [
    PriceRange::new(0.0, 100.0),
    PriceRange::new(101.0, 200.0),
    PriceRange::new(201.0, 300.0),
    PriceRange::new(301.0, 400.0),
    PriceRange::new(401.0, 500.0),
    PriceRange::new(501.0, 600.0),
    PriceRange::new(601.0, 700.0),
    PriceRange::new(701.0, 800.0),
    PriceRange::new(801.0, 900.0),
    PriceRange::unbounded(901.0),
];
