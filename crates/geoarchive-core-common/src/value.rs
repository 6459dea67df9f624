//! Typed attribute values and their archival text form.

use std::borrow::Cow;
use std::fmt;

use chrono::{NaiveDateTime, Timelike};

/// A single attribute value read from a feature class.
///
/// Every variant has exactly one text rendering, see [`FieldValue::render`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Missing value.
    Null,
    /// Free text, written verbatim.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// Boolean flag.
    Boolean(bool),
    /// Whole number above `i64::MAX`.
    Unsigned(u64),
    /// Calendar date and time of day, without an offset.
    ///
    /// `source` holds the stored text when the date was recognised in a text value;
    /// it is written back unchanged.
    Date {
        value: NaiveDateTime,
        source: Option<String>,
    },
}

impl FieldValue {
    /// A date with no stored text form.
    #[must_use]
    pub fn date(value: NaiveDateTime) -> Self {
        FieldValue::Date {
            value,
            source: None,
        }
    }

    /// Text form of the value, with `null_value` standing in for [`FieldValue::Null`].
    ///
    /// Floats always carry a fractional part (`3.0`). Dates read from text render as
    /// that text; other dates render as `YYYY-MM-DD HH:MM:SS` plus the sub-second part
    /// when it is non-zero (microseconds, or nanoseconds when needed).
    #[must_use]
    pub fn render<'a>(&'a self, null_value: &'a str) -> Cow<'a, str> {
        match self {
            FieldValue::Null => Cow::Borrowed(null_value),
            FieldValue::Text(text) => Cow::Borrowed(text),
            FieldValue::Integer(value) => Cow::Owned(value.to_string()),
            FieldValue::Unsigned(value) => Cow::Owned(value.to_string()),
            FieldValue::Float(value) => Cow::Owned(format_float(*value)),
            FieldValue::Boolean(value) => Cow::Borrowed(if *value { "true" } else { "false" }),
            FieldValue::Date {
                source: Some(text), ..
            } => Cow::Borrowed(text),
            FieldValue::Date {
                value,
                source: None,
            } => Cow::Owned(format_date(value)),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

fn format_date(value: &NaiveDateTime) -> String {
    // leap seconds carry an extra second in the nanosecond field
    let nanos = value.nanosecond() % 1_000_000_000;
    let format = if nanos == 0 {
        "%Y-%m-%d %H:%M:%S"
    } else if nanos % 1_000 == 0 {
        "%Y-%m-%d %H:%M:%S%.6f"
    } else {
        "%Y-%m-%d %H:%M:%S%.9f"
    };
    value.format(format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_null_uses_token() {
        assert_eq!(FieldValue::Null.render("None"), "None");
        assert_eq!(FieldValue::Null.render(""), "");
        assert_eq!(FieldValue::Null.to_string(), "");
    }

    #[test]
    fn test_text_is_verbatim() {
        let value = FieldValue::Text("Ridge | Loop".to_string());
        assert_eq!(value.render("None"), "Ridge | Loop");
    }

    #[test]
    fn test_float_always_has_fraction() {
        assert_eq!(FieldValue::Float(3.0).render(""), "3.0");
        assert_eq!(FieldValue::Float(2.5).render(""), "2.5");
        assert_eq!(FieldValue::Float(-0.125).render(""), "-0.125");
        assert_eq!(FieldValue::Float(f64::NAN).render(""), "NaN");
        assert_eq!(FieldValue::Float(f64::NEG_INFINITY).render(""), "-inf");
    }

    #[test]
    fn test_integer_and_boolean() {
        assert_eq!(FieldValue::Integer(-42).render(""), "-42");
        assert_eq!(FieldValue::Boolean(true).render(""), "true");
        assert_eq!(FieldValue::Unsigned(u64::MAX).render(""), "18446744073709551615");
    }

    #[test]
    fn test_date_formatting() {
        let date = NaiveDate::from_ymd_opt(2019, 6, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(FieldValue::date(date).render(""), "2019-06-15 00:00:00");

        let precise = NaiveDate::from_ymd_opt(2019, 6, 15)
            .unwrap()
            .and_hms_micro_opt(8, 30, 5, 250)
            .unwrap();
        assert_eq!(
            FieldValue::date(precise).render(""),
            "2019-06-15 08:30:05.000250"
        );

        let nanos = NaiveDate::from_ymd_opt(2019, 6, 15)
            .unwrap()
            .and_hms_nano_opt(8, 30, 5, 123_456_789)
            .unwrap();
        assert_eq!(
            FieldValue::date(nanos).render(""),
            "2019-06-15 08:30:05.123456789"
        );

        let leap = NaiveDate::from_ymd_opt(2016, 12, 31)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 1_500)
            .unwrap();
        assert_eq!(FieldValue::date(leap).render(""), "2016-12-31 23:59:60.500000");
    }

    #[test]
    fn test_date_with_source_renders_source() {
        let value = FieldValue::Date {
            value: NaiveDate::from_ymd_opt(2019, 6, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            source: Some("2019-06-15".to_string()),
        };
        assert_eq!(value.render("None"), "2019-06-15");
    }
}
