//! Attribute decoding and coercion for OSM elements.

use chrono::NaiveDateTime;
use geo::Point;
use log::warn;
use osmgraph_core::{Properties, PropertyValue};
use quick_xml::events::BytesStart;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Decoded `(name, value)` attribute pairs in document order.
pub(super) fn decode(element: &BytesStart<'_>) -> Result<Vec<(String, String)>, quick_xml::Error> {
    element
        .attributes()
        .map(|result| {
            let attribute = result?;
            let key = std::str::from_utf8(attribute.key.local_name().into_inner())?.to_owned();
            let value = attribute.unescape_value()?.into_owned();
            Ok((key, value))
        })
        .collect()
}

/// Local element name as text.
pub(super) fn element_name(element: &BytesStart<'_>) -> Result<String, quick_xml::Error> {
    Ok(std::str::from_utf8(element.local_name().into_inner())?.to_owned())
}

/// First value of attribute `key`.
pub(super) fn lookup<'a>(attributes: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

/// A node, way or relation's coerced attributes.
#[derive(Debug, Default)]
pub(super) struct EntityAttributes {
    pub osm_id: Option<i64>,
    pub location: Option<Point<f64>>,
    pub properties: Properties,
}

/// Coerce the attributes of a `node`, `way` or `relation` element.
///
/// `id` becomes `<kind>_osm_id`, `version` an integer and `timestamp` epoch
/// milliseconds. `visible` is implied and only recorded as `false`. `lat` and `lon` merge into `location`
/// when both parse.
pub(super) fn entity(kind: &str, attributes: Vec<(String, String)>) -> EntityAttributes {
    let mut coerced = EntityAttributes::default();
    let mut lat = None;
    let mut lon = None;
    for (key, value) in attributes {
        match key.as_str() {
            "id" => match value.trim().parse::<i64>() {
                Ok(osm_id) => {
                    coerced.osm_id = Some(osm_id);
                    coerced.properties.insert(format!("{kind}_osm_id"), osm_id);
                }
                Err(err) => warn!("{kind} id `{value}` is not an integer: {err}"),
            },
            "lat" => lat = parse_coordinate(kind, &key, &value),
            "lon" => lon = parse_coordinate(kind, &key, &value),
            "version" => match value.trim().parse::<i32>() {
                Ok(version) => coerced.properties.insert(key, PropertyValue::Int(version)),
                Err(_) => coerced.properties.insert(key, value),
            },
            "visible" => {
                if value != "true" && value != "1" {
                    coerced.properties.insert(key, PropertyValue::Bool(false));
                }
            }
            "timestamp" => match parse_timestamp(&value) {
                Some(millis) => coerced.properties.insert(key, millis),
                None => warn!("unparsable timestamp `{value}` on {kind}; property omitted"),
            },
            _ => coerced.properties.insert(key, value),
        }
    }
    match (lat, lon) {
        (Some(y), Some(x)) => {
            let point = Point::new(x, y);
            coerced.location = Some(point);
            coerced
                .properties
                .insert("location", PropertyValue::Point(point));
        }
        (Some(y), None) => coerced.properties.insert("lat", PropertyValue::Double(y)),
        (None, Some(x)) => coerced.properties.insert("lon", PropertyValue::Double(x)),
        (None, None) => {}
    }
    coerced
}

/// Properties of a `bounds` element: the four corners as doubles.
pub(super) fn bounds(attributes: Vec<(String, String)>) -> Properties {
    attributes
        .into_iter()
        .map(|(key, value)| {
            let coerced = match key.as_str() {
                "minlat" | "minlon" | "maxlat" | "maxlon" => value
                    .trim()
                    .parse::<f64>()
                    .map_or_else(|_| PropertyValue::String(value), PropertyValue::Double),
                _ => PropertyValue::String(value),
            };
            (key, coerced)
        })
        .collect()
}

/// Properties of the root `osm` element plus the dataset's file name.
pub(super) fn dataset(file_name: &str, attributes: Vec<(String, String)>) -> Properties {
    let mut properties: Properties = attributes.into_iter().collect();
    properties.insert("name", file_name);
    properties
}

fn parse_coordinate(kind: &str, key: &str, value: &str) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Some(parsed),
        _ => {
            warn!("{kind} {key} `{value}` is not a number; ignored");
            None
        }
    }
}

/// Parse `yyyy-MM-ddTHH:mm:ssZ` as UTC epoch milliseconds.
fn parse_timestamp(value: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .ok()
        .map(|parsed| parsed.and_utc().timestamp_millis())
}
