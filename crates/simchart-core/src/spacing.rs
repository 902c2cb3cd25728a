// File: crates/simchart-core/src/spacing.rs
// Summary: Validated major/minor line spacing per axis.

use crate::error::{ChartError, Result};
use crate::transform::Orientation;

/// Ratio tolerance when checking that major spacing is a multiple of minor spacing.
const MULTIPLE_TOLERANCE: f64 = 1e-10;

/// Major and minor spacing for one axis, in model units.
/// Contract: at least one is set; both positive; if both, `major > minor` and
/// `major` is an integer multiple of `minor`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSpacing {
    major: Option<f64>,
    minor: Option<f64>,
}

impl LineSpacing {
    pub fn new(major: Option<f64>, minor: Option<f64>) -> Result<Self> {
        for s in [major, minor].into_iter().flatten() {
            if !(s > 0.0) || !s.is_finite() {
                return Err(ChartError::InvalidSpacing(s));
            }
        }
        match (major, minor) {
            (None, None) => return Err(ChartError::MissingSpacing),
            (Some(major), Some(minor)) => {
                let ratio = major / minor;
                if major <= minor || (ratio - ratio.round()).abs() > MULTIPLE_TOLERANCE {
                    return Err(ChartError::IncompatibleSpacing { major, minor });
                }
            }
            _ => {}
        }
        Ok(Self { major, minor })
    }

    pub fn major_only(major: f64) -> Result<Self> {
        Self::new(Some(major), None)
    }

    pub fn minor_only(minor: f64) -> Result<Self> {
        Self::new(None, Some(minor))
    }

    pub fn major(&self) -> Option<f64> { self.major }
    pub fn minor(&self) -> Option<f64> { self.minor }
}

/// Spacing for both axes; either may be omitted to draw lines along one axis only.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisSpacing {
    /// Spacing along model x (vertical lines). Default: none.
    pub x: Option<LineSpacing>,
    /// Spacing along model y (horizontal lines). Default: none.
    pub y: Option<LineSpacing>,
}

impl AxisSpacing {
    pub fn new(x: Option<LineSpacing>, y: Option<LineSpacing>) -> Self {
        Self { x, y }
    }

    pub fn get(&self, orientation: Orientation) -> Option<LineSpacing> {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }
}
