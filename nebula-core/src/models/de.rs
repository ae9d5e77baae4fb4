//! Lenient field decoders for the snapshot payload.
//!
//! The backend stores rows in loosely-typed columns and forms post raw input
//! values, so the same field can arrive as `null`, `""`, `"42"` or `42`.

use serde::{de::Error, Deserialize, Deserializer};
use serde_json::Value;

/// Optional text. `null`, missing and blank strings all decode to `None`.
pub fn opt_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	match Option::<Value>::deserialize(d)? {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
		Some(Value::String(s)) => Ok(Some(s)),
		Some(Value::Number(n)) => Ok(Some(n.to_string())),
		Some(Value::Bool(b)) => Ok(Some(b.to_string())),
		Some(other) => Err(D::Error::custom(format!("expected text, got {other}"))),
	}
}

/// Required text where the column may still hold `null`.
pub fn text<'de, D>(d: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(opt_text(d)?.unwrap_or_default())
}

pub fn opt_int<'de, D>(d: D) -> Result<Option<i64>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<Value>::deserialize(d)? {
		Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
		Some(Value::String(s)) => parse_int(&s),
		_ => None,
	})
}

pub fn opt_float<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<Value>::deserialize(d)? {
		Some(Value::Number(n)) => n.as_f64(),
		Some(Value::String(s)) => s.trim().parse().ok(),
		_ => None,
	})
}

/// SQLite has no boolean column type; accept `0`/`1` as well as `true`/`false`.
pub fn flag<'de, D>(d: D) -> Result<bool, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<Value>::deserialize(d)? {
		Some(Value::Bool(b)) => b,
		Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
		Some(Value::String(s)) => matches!(s.trim(), "1" | "true"),
		_ => false,
	})
}

/// Form-style integer parse: `"12"` and `"12.0"` both yield 12.
pub fn parse_int(raw: &str) -> Option<i64> {
	let raw = raw.trim();
	raw.parse::<i64>()
		.ok()
		.or_else(|| raw.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.round() as i64))
}
