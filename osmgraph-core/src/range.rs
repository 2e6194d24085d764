//! Optional bounding-box filter applied to nodes as they are extracted.

use std::fmt;
use std::str::FromStr;

use geo::{Coord, Intersects, Point, Rect};
use thiserror::Error;

/// Errors returned when parsing a [`RangeFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeFilterError {
    /// The string did not split into exactly four fields.
    #[error("range `{input}` must have four fields minX,minY,maxX,maxY but has {found}")]
    FieldCount {
        /// Rejected input.
        input: String,
        /// Fields found.
        found: usize,
    },
    /// A field did not parse as a number.
    #[error("range field {index} (`{field}`) is not a number")]
    InvalidField {
        /// Zero-based field position.
        index: usize,
        /// Offending text.
        field: String,
    },
}

/// Axis-aligned box in longitude (x) and latitude (y).
///
/// Corners are normalised, so `3,4,1,2` and `1,2,3,4` describe the same
/// box. Points on the boundary are inside.
///
/// # Examples
/// ```
/// use geo::Point;
/// use osmgraph_core::RangeFilter;
///
/// # fn main() -> Result<(), osmgraph_core::RangeFilterError> {
/// let range: RangeFilter = "12.9; 55.5; 13.1; 55.7".parse()?;
/// assert!(range.contains(Point::new(13.0, 55.6)));
/// assert!(!range.contains(Point::new(14.0, 55.6)));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    rect: Rect<f64>,
}

impl RangeFilter {
    /// Build a filter from two opposite corners.
    #[must_use]
    pub fn new(min: Coord<f64>, max: Coord<f64>) -> Self {
        Self {
            rect: Rect::new(min, max),
        }
    }

    /// Whether `point` lies inside the box or on its edge.
    #[must_use]
    pub fn contains(&self, point: Point<f64>) -> bool {
        self.rect.intersects(&point)
    }

    /// The normalised box.
    #[must_use]
    pub const fn rect(&self) -> Rect<f64> {
        self.rect
    }
}

impl FromStr for RangeFilter {
    type Err = RangeFilterError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = input.split([',', ';']).map(str::trim).collect();
        let [min_x, min_y, max_x, max_y] = fields.as_slice() else {
            return Err(RangeFilterError::FieldCount {
                input: input.to_owned(),
                found: fields.len(),
            });
        };
        let parse = |index: usize, field: &str| {
            field
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| RangeFilterError::InvalidField {
                    index,
                    field: field.to_owned(),
                })
        };
        Ok(Self::new(
            Coord {
                x: parse(0, min_x)?,
                y: parse(1, min_y)?,
            },
            Coord {
                x: parse(2, max_x)?,
                y: parse(3, max_y)?,
            },
        ))
    }
}

impl fmt::Display for RangeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min = self.rect.min();
        let max = self.rect.max();
        write!(f, "{},{},{},{}", min.x, min.y, max.x, max.y)
    }
}
