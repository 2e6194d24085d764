//! Typed property values and the ordered property map carried by events.

use std::fmt;

use geo::Point;

/// A single property value after attribute coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Free text, the default for uncoerced attributes and all tag values.
    String(String),
    /// 64-bit integers: OSM ids and epoch-millisecond timestamps.
    Long(i64),
    /// 32-bit integers: entity versions.
    Int(i32),
    /// Floating point values such as a lone `lat` or `lon`.
    Double(f64),
    /// Flags such as `visible=false`.
    Bool(bool),
    /// WGS84 location with `x = longitude`, `y = latitude`.
    Point(Point<f64>),
}

impl PropertyValue {
    /// Borrow the value as text when it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Read the value as a 64-bit integer when it is integral.
    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(value) => Some(*value),
            Self::Int(value) => Some(i64::from(*value)),
            _ => None,
        }
    }

    /// Read the value as a point when it is a location.
    #[must_use]
    pub const fn as_point(&self) -> Option<Point<f64>> {
        match self {
            Self::Point(point) => Some(*point),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Long(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Double(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Point(point) => write!(f, "point({}, {})", point.x(), point.y()),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

/// Insertion-ordered property map.
///
/// Re-inserting an existing key replaces its value in place, so the map keeps
/// first-seen key order with last-value-wins semantics, matching how
/// duplicate `<tag k=...>` children behave.
///
/// # Examples
/// ```
/// use osmgraph_core::{Properties, PropertyValue};
///
/// let mut tags = Properties::new();
/// tags.insert("highway", "residential");
/// tags.insert("name", "Main Street");
/// tags.insert("highway", "primary");
///
/// let keys: Vec<_> = tags.keys().collect();
/// assert_eq!(keys, ["highway", "name"]);
/// assert_eq!(tags.get_str("highway"), Some("primary"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(String, PropertyValue)>,
}

impl Properties {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace a property.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        let name: String = key.into();
        let coerced = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = coerced,
            None => self.entries.push((name, coerced)),
        }
    }

    /// Look up a property by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Look up a string property by key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropertyValue::as_str)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Key/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}

impl IntoIterator for Properties {
    type Item = (String, PropertyValue);
    type IntoIter = std::vec::IntoIter<(String, PropertyValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
