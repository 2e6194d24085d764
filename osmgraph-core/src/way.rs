//! Way directionality and shape.
//!
//! # Examples
//! ```
//! use osmgraph_core::{collapse_consecutive, Direction, Geometry};
//!
//! assert_eq!(Direction::from_oneway(Some("-1")), Direction::Backward);
//! let refs = collapse_consecutive(&[1, 1, 2, 3, 1]);
//! assert_eq!(refs, [1, 2, 3, 1]);
//! assert_eq!(Geometry::classify(&refs), Geometry::Polygon);
//! ```

use std::fmt;

/// Traversal direction declared by a way's `oneway` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Traversable either way.
    #[default]
    Both,
    /// Traversable in document order only.
    Forward,
    /// Traversable against document order only.
    Backward,
}

impl Direction {
    /// Resolve the direction from the raw `oneway` tag value.
    #[must_use]
    pub fn from_oneway(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("-1") => Self::Backward,
            Some(text)
                if text == "1"
                    || text.eq_ignore_ascii_case("yes")
                    || text.eq_ignore_ascii_case("true") =>
            {
                Self::Forward
            }
            _ => Self::Both,
        }
    }

    /// Text stored on the way's `oneway` property.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Both => "BOTH",
            Self::Forward => "FORWARD",
            Self::Backward => "BACKWARD",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a way after duplicate collapsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Geometry {
    /// Fewer than two references.
    Point,
    /// An open polyline.
    Line,
    /// A closed ring.
    Polygon,
}

impl Geometry {
    /// Classify already-collapsed node references.
    #[must_use]
    pub fn classify(refs: &[i64]) -> Self {
        match (refs.first(), refs.last()) {
            _ if refs.len() < 2 => Self::Point,
            (Some(first), Some(last)) if first == last => Self::Polygon,
            _ => Self::Line,
        }
    }

    /// Lower-case name used in log output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Line => "line",
            Self::Polygon => "polygon",
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drop references equal to their immediate predecessor.
#[must_use]
pub fn collapse_consecutive(refs: &[i64]) -> Vec<i64> {
    let mut collapsed = refs.to_vec();
    collapsed.dedup();
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, Direction::Both)]
    #[case(Some("-1"), Direction::Backward)]
    #[case(Some("1"), Direction::Forward)]
    #[case(Some("yes"), Direction::Forward)]
    #[case(Some("YES"), Direction::Forward)]
    #[case(Some("True"), Direction::Forward)]
    #[case(Some("no"), Direction::Both)]
    #[case(Some("reversible"), Direction::Both)]
    fn oneway_values_resolve(#[case] value: Option<&str>, #[case] expected: Direction) {
        assert_eq!(Direction::from_oneway(value), expected);
    }

    #[rstest]
    #[case(&[], Geometry::Point)]
    #[case(&[4], Geometry::Point)]
    #[case(&[4, 5], Geometry::Line)]
    #[case(&[4, 5, 6, 4], Geometry::Polygon)]
    fn geometry_follows_reference_shape(#[case] refs: &[i64], #[case] expected: Geometry) {
        assert_eq!(Geometry::classify(refs), expected);
    }

    #[rstest]
    fn collapse_keeps_non_adjacent_repeats() {
        assert_eq!(collapse_consecutive(&[1, 2, 2, 2, 3, 2]), [1, 2, 3, 2]);
    }
}
