//! Serde helpers for aggregator payloads.
//!
//! The aggregator encodes big integers as decimal strings, occasionally as hex
//! strings or JSON numbers, and omits or nulls optional sections when they do
//! not apply. These helpers turn all of that into typed `Option`s where an
//! unreadable value means "absent" rather than a failed response.

use alloy_primitives::U256;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes an optional section, mapping `null` and malformed values to `None`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
	D: Deserializer<'de>,
	T: DeserializeOwned,
{
	let value = Option::<Value>::deserialize(deserializer)?;
	Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Like [`lenient`], falling back to `T::default()` instead of `None`.
pub fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: DeserializeOwned + Default,
{
	Ok(lenient(deserializer)?.unwrap_or_default())
}

/// Deserializes a list element by element, dropping entries that do not parse.
///
/// A missing, `null` or non-array value yields an empty list.
pub fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: DeserializeOwned,
{
	let value = Option::<Value>::deserialize(deserializer)?;
	Ok(match value {
		Some(Value::Array(items)) => items
			.into_iter()
			.filter_map(|item| serde_json::from_value(item).ok())
			.collect(),
		_ => Vec::new(),
	})
}

/// Deserializes an optional integer given as a decimal string, hex string or number.
pub fn flex_u256<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;
	Ok(value.as_ref().and_then(value_to_u256))
}

/// Deserializes an optional basis-point count given as a string or number.
pub fn flex_bps<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;
	Ok(value
		.as_ref()
		.and_then(value_to_u256)
		.and_then(|v| u32::try_from(v).ok()))
}

fn value_to_u256(value: &Value) -> Option<U256> {
	match value {
		Value::String(s) => parse_u256(s),
		Value::Number(n) => n.as_u64().map(U256::from),
		_ => None,
	}
}

/// Parses a decimal or `0x`-prefixed hex integer.
pub fn parse_u256(s: &str) -> Option<U256> {
	let s = s.trim();
	if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
		U256::from_str_radix(hex, 16).ok()
	} else {
		U256::from_str_radix(s, 10).ok()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde::Deserialize;

	#[derive(Debug, Deserialize)]
	struct Payload {
		#[serde(default, deserialize_with = "flex_u256")]
		amount: Option<U256>,
		#[serde(default, deserialize_with = "flex_bps")]
		bps: Option<u32>,
		#[serde(default, deserialize_with = "lenient")]
		nested: Option<Nested>,
		#[serde(default, deserialize_with = "lenient_or_default")]
		flag: bool,
		#[serde(default, deserialize_with = "lenient_seq")]
		items: Vec<Nested>,
	}

	#[derive(Debug, Deserialize)]
	struct Nested {
		name: String,
	}

	#[test]
	fn test_flex_u256_accepts_strings_and_numbers() {
		let p: Payload = serde_json::from_str(r#"{"amount":"1000"}"#).unwrap();
		assert_eq!(p.amount, Some(U256::from(1000)));

		let p: Payload = serde_json::from_str(r#"{"amount":"0x3e8"}"#).unwrap();
		assert_eq!(p.amount, Some(U256::from(1000)));

		let p: Payload = serde_json::from_str(r#"{"amount":1000}"#).unwrap();
		assert_eq!(p.amount, Some(U256::from(1000)));
	}

	#[test]
	fn test_missing_null_and_garbage_are_absent() {
		let p: Payload = serde_json::from_str(r#"{}"#).unwrap();
		assert!(p.amount.is_none() && p.bps.is_none() && p.nested.is_none());

		let p: Payload = serde_json::from_str(r#"{"amount":null,"bps":null,"nested":null}"#).unwrap();
		assert!(p.amount.is_none() && p.bps.is_none() && p.nested.is_none());

		let p: Payload =
			serde_json::from_str(r#"{"amount":"lots","bps":[1],"nested":{"other":1}}"#).unwrap();
		assert!(p.amount.is_none() && p.bps.is_none() && p.nested.is_none());
	}

	#[test]
	fn test_lenient_keeps_well_formed_sections() {
		let p: Payload = serde_json::from_str(r#"{"nested":{"name":"Uniswap_V3"}}"#).unwrap();
		assert_eq!(p.nested.unwrap().name, "Uniswap_V3");
	}

	#[test]
	fn test_lenient_or_default_on_null_and_wrong_type() {
		let p: Payload = serde_json::from_str(r#"{"flag":true}"#).unwrap();
		assert!(p.flag);

		let p: Payload = serde_json::from_str(r#"{"flag":null}"#).unwrap();
		assert!(!p.flag);

		let p: Payload = serde_json::from_str(r#"{"flag":"true"}"#).unwrap();
		assert!(!p.flag);
	}

	#[test]
	fn test_lenient_seq_skips_bad_elements() {
		let p: Payload =
			serde_json::from_str(r#"{"items":[{"name":"a"},{"other":1},3,{"name":"b"}]}"#).unwrap();
		let names: Vec<&str> = p.items.iter().map(|n| n.name.as_str()).collect();
		assert_eq!(names, vec!["a", "b"]);

		let p: Payload = serde_json::from_str(r#"{"items":null}"#).unwrap();
		assert!(p.items.is_empty());

		let p: Payload = serde_json::from_str(r#"{"items":"nope"}"#).unwrap();
		assert!(p.items.is_empty());
	}

	#[test]
	fn test_flex_bps() {
		let p: Payload = serde_json::from_str(r#"{"bps":"5000"}"#).unwrap();
		assert_eq!(p.bps, Some(5000));

		let p: Payload = serde_json::from_str(r#"{"bps":"99999999999"}"#).unwrap();
		assert_eq!(p.bps, None);
	}
}
