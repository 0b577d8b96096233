//! Lenient field deserializers.
//!
//! Records arrive from operator forms, spreadsheet migrations and hand-edited
//! YAML, so numeric fields are not always numbers. These helpers accept a
//! number, a numeric string, a boolean, `null` or an empty string, and coerce
//! anything that is not a usable number to zero instead of failing the whole
//! record.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Num(f64),
    Text(String),
    Flag(bool),
    Other(IgnoredAny),
}

impl Loose {
    fn as_f64(&self) -> f64 {
        match self {
            Loose::Num(n) if n.is_finite() => *n,
            Loose::Num(_) => 0.0,
            Loose::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0),
            Loose::Flag(b) => f64::from(u8::from(*b)),
            Loose::Other(_) => 0.0,
        }
    }

    fn into_string(self) -> String {
        match self {
            Loose::Num(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", n as i64),
            Loose::Num(n) => n.to_string(),
            Loose::Text(s) => s,
            Loose::Flag(b) => b.to_string(),
            Loose::Other(_) => String::new(),
        }
    }
}

/// Deserialize an `f64`, coercing malformed values to `0.0`.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?.map_or(0.0, |v| v.as_f64()))
}

/// Deserialize a non-negative count, truncating fractions and coercing
/// malformed or negative values to `0`.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = number(deserializer)?;
    if n <= 0.0 {
        Ok(0)
    } else if n >= f64::from(u32::MAX) {
        Ok(u32::MAX)
    } else {
        Ok(n.trunc() as u32)
    }
}

/// Deserialize an identifier or free-text field, rendering numbers without a
/// trailing `.0` and `null` as an empty string.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?.map_or_else(String::new, Loose::into_string))
}

/// Deserialize a clock-time field whose presence marks a stage as recorded.
///
/// Like [`text`], except that `0`, `false` and non-finite numbers read as
/// not entered and become an empty string.
pub fn clock<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        None | Some(Loose::Flag(false)) => String::new(),
        Some(Loose::Num(n)) if n == 0.0 || !n.is_finite() => String::new(),
        Some(value) => value.into_string(),
    })
}

/// Deserialize a list of batch identifiers.
///
/// Accepts either a sequence or the legacy comma-joined string
/// (`"1510, 1511, 1512"`). Entries are trimmed and empty entries dropped.
pub fn id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Ids {
        List(Vec<Loose>),
        Joined(String),
        Single(f64),
    }

    let ids = match Option::<Ids>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Ids::List(items)) => items.into_iter().map(Loose::into_string).collect(),
        Some(Ids::Joined(joined)) => joined.split(',').map(str::to_string).collect(),
        Some(Ids::Single(n)) => vec![Loose::Num(n).into_string()],
    };

    Ok(ids
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::number")]
        value: f64,
        #[serde(default, deserialize_with = "super::count")]
        count: u32,
        #[serde(default, deserialize_with = "super::text")]
        id: String,
        #[serde(default, deserialize_with = "super::id_list")]
        ids: Vec<String>,
        #[serde(default, deserialize_with = "super::clock")]
        time: String,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).expect("probe should deserialize")
    }

    #[test]
    fn test_numbers_pass_through() {
        let p = probe(r#"{"value": 2.5, "count": 252}"#);
        assert_eq!(p.value, 2.5);
        assert_eq!(p.count, 252);
    }

    #[test]
    fn test_numeric_strings_are_parsed() {
        let p = probe(r#"{"value": " 47.5 ", "count": "12"}"#);
        assert_eq!(p.value, 47.5);
        assert_eq!(p.count, 12);
    }

    #[test]
    fn test_malformed_values_coerce_to_zero() {
        let p = probe(r#"{"value": "n/a", "count": {"nested": true}}"#);
        assert_eq!(p.value, 0.0);
        assert_eq!(p.count, 0);

        let p = probe(r#"{"value": null, "count": -4}"#);
        assert_eq!(p.value, 0.0);
        assert_eq!(p.count, 0);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let p = probe("{}");
        assert_eq!(p.value, 0.0);
        assert_eq!(p.count, 0);
        assert!(p.id.is_empty());
        assert!(p.ids.is_empty());
    }

    #[test]
    fn test_numeric_ids_render_without_fraction() {
        assert_eq!(probe(r#"{"id": 1520}"#).id, "1520");
        assert_eq!(probe(r#"{"id": "1520"}"#).id, "1520");
        assert_eq!(probe(r#"{"id": null}"#).id, "");
    }

    #[test]
    fn test_unentered_clock_times_are_empty() {
        assert_eq!(probe(r#"{"time": 0}"#).time, "");
        assert_eq!(probe(r#"{"time": false}"#).time, "");
        assert_eq!(probe(r#"{"time": null}"#).time, "");
        assert_eq!(probe(r#"{"time": ""}"#).time, "");
    }

    #[test]
    fn test_entered_clock_times_are_kept() {
        assert_eq!(probe(r#"{"time": "08:42"}"#).time, "08:42");
        assert_eq!(probe(r#"{"time": "0"}"#).time, "0");
        assert_eq!(probe(r#"{"time": 1330}"#).time, "1330");
        assert_eq!(probe(r#"{"time": true}"#).time, "true");
    }

    #[test]
    fn test_comma_joined_ids_are_split_and_trimmed() {
        let p = probe(r#"{"ids": "1510, 1511,,1512 "}"#);
        assert_eq!(p.ids, vec!["1510", "1511", "1512"]);
    }

    #[test]
    fn test_id_sequences_accept_numbers() {
        let p = probe(r#"{"ids": [1538, "1539", " "]}"#);
        assert_eq!(p.ids, vec!["1538", "1539"]);
    }
}
