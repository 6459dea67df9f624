//! Mapping of `GeoJSON` property values onto [`FieldValue`].

use chrono::{NaiveDate, NaiveDateTime};
use geoarchive_core_common::FieldValue;
use geojson::JsonValue;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Convert one property value.
///
/// Strings holding a plain ISO date or date-time without offset become
/// [`FieldValue::Date`] carrying the original text; integers beyond `i64` stay exact as
/// [`FieldValue::Unsigned`]; arrays and objects are kept as compact JSON text.
#[must_use]
pub fn json_to_field_value(value: &JsonValue) -> FieldValue {
    match value {
        JsonValue::Null => FieldValue::Null,
        JsonValue::Bool(flag) => FieldValue::Boolean(*flag),
        JsonValue::Number(number) => {
            if let Some(integer) = number.as_i64() {
                FieldValue::Integer(integer)
            } else if let Some(unsigned) = number.as_u64() {
                FieldValue::Unsigned(unsigned)
            } else {
                number.as_f64().map_or(FieldValue::Null, FieldValue::Float)
            }
        },
        JsonValue::String(text) => match parse_date(text) {
            Some(value) => FieldValue::Date {
                value,
                source: Some(text.clone()),
            },
            None => FieldValue::Text(text.clone()),
        },
        JsonValue::Array(_) | JsonValue::Object(_) => FieldValue::Text(value.to_string()),
    }
}

fn parse_date(text: &str) -> Option<NaiveDateTime> {
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
