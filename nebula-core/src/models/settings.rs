use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const KEY_PALETTE: &str = "palette";
pub const KEY_ENABLE_RACKS: &str = "enable_racks";
pub const KEY_SHOW_NETWORK: &str = "show_network_in_dashboard";
pub const KEY_UNIFI_HOST: &str = "unifi_host";
pub const KEY_UNIFI_USER: &str = "unifi_user";
pub const KEY_UNIFI_PASS: &str = "unifi_pass";

/// Flat key/value settings as stored by the backend.
/// Flags are the strings `"true"`/`"false"`, not JSON booleans.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "BTreeMap<String, Value>")]
pub struct Settings(BTreeMap<String, String>);

impl From<BTreeMap<String, Value>> for Settings {
	fn from(raw: BTreeMap<String, Value>) -> Self {
		let values = raw
			.into_iter()
			.map(|(k, v)| {
				let v = match v {
					Value::String(s) => s,
					Value::Null => String::new(),
					other => other.to_string(),
				};
				(k, v)
			})
			.collect();
		Settings(values)
	}
}

impl Settings {
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.0.insert(key.into(), value.into());
	}

	fn flag(&self, key: &str) -> bool {
		self.get(key) == Some("true")
	}

	fn non_empty(&self, key: &str) -> Option<&str> {
		self.get(key).filter(|v| !v.is_empty())
	}

	pub fn palette(&self) -> Palette {
		self.get(KEY_PALETTE).and_then(Palette::parse).unwrap_or_default()
	}

	pub fn enable_racks(&self) -> bool {
		self.flag(KEY_ENABLE_RACKS)
	}

	pub fn show_network_in_dashboard(&self) -> bool {
		self.flag(KEY_SHOW_NETWORK)
	}

	pub fn unifi_host(&self) -> Option<&str> {
		self.non_empty(KEY_UNIFI_HOST)
	}

	pub fn unifi_user(&self) -> Option<&str> {
		self.non_empty(KEY_UNIFI_USER)
	}

	pub fn unifi_pass(&self) -> Option<&str> {
		self.non_empty(KEY_UNIFI_PASS)
	}

	pub fn apply(&mut self, patch: &SettingsPatch) {
		for (k, v) in &patch.0 {
			self.set(k.clone(), v.clone());
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Palette {
	#[default]
	Blue,
	Purple,
	Red,
	Green,
	Orange,
}

impl Palette {
	pub const ALL: [Palette; 5] = [
		Palette::Blue,
		Palette::Purple,
		Palette::Red,
		Palette::Green,
		Palette::Orange,
	];

	pub fn parse(raw: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|p| p.as_str() == raw)
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Palette::Blue => "blue",
			Palette::Purple => "purple",
			Palette::Red => "red",
			Palette::Green => "green",
			Palette::Orange => "orange",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Palette::Blue => "Ocean Blue",
			Palette::Purple => "Deep Purple",
			Palette::Red => "Crimson Red",
			Palette::Green => "Forest Green",
			Palette::Orange => "Sunset Orange",
		}
	}

	pub fn css_class(self) -> String {
		format!("palette-{}", self.as_str())
	}
}

/// Partial settings update. Keys not present are left alone by the backend.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct SettingsPatch(BTreeMap<String, String>);

impl SettingsPatch {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.insert(key.into(), value.into());
		self
	}

	pub fn palette(self, palette: Palette) -> Self {
		self.with(KEY_PALETTE, palette.as_str())
	}

	pub fn enable_racks(self, on: bool) -> Self {
		self.with(KEY_ENABLE_RACKS, bool_str(on))
	}

	pub fn show_network_in_dashboard(self, on: bool) -> Self {
		self.with(KEY_SHOW_NETWORK, bool_str(on))
	}

	/// Forget stored UniFi credentials.
	pub fn clear_unifi(self) -> Self {
		self.with(KEY_UNIFI_HOST, "")
			.with(KEY_UNIFI_USER, "")
			.with(KEY_UNIFI_PASS, "")
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}
}

fn bool_str(on: bool) -> &'static str {
	if on { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn settings(json: &str) -> Settings {
		serde_json::from_str(json).unwrap()
	}

	#[test]
	fn test_flags_are_strings() {
		let s = settings(r#"{"enable_racks": "true", "show_network_in_dashboard": "false"}"#);
		assert!(s.enable_racks());
		assert!(!s.show_network_in_dashboard());
	}

	#[test]
	fn test_non_string_values_are_stringified() {
		let s = settings(r#"{"enable_racks": true, "show_network_in_dashboard": 1}"#);
		assert!(s.enable_racks());
		assert!(!s.show_network_in_dashboard());
	}

	#[test]
	fn test_palette_default_and_unknown() {
		assert_eq!(settings("{}").palette(), Palette::Blue);
		assert_eq!(settings(r#"{"palette": "teal"}"#).palette(), Palette::Blue);
		assert_eq!(settings(r#"{"palette": "red"}"#).palette(), Palette::Red);
	}

	#[test]
	fn test_blank_unifi_credentials_are_none() {
		let s = settings(r#"{"unifi_host": "", "unifi_user": "admin"}"#);
		assert_eq!(s.unifi_host(), None);
		assert_eq!(s.unifi_user(), Some("admin"));
	}

	#[test]
	fn test_patch_merges_only_given_keys() {
		let mut s = settings(r#"{"palette": "green", "enable_racks": "true"}"#);
		s.apply(&SettingsPatch::new().enable_racks(false));
		assert_eq!(s.palette(), Palette::Green);
		assert!(!s.enable_racks());
	}

	#[test]
	fn test_clear_unifi_patch_body() {
		let body = serde_json::to_value(SettingsPatch::new().clear_unifi()).unwrap();
		assert_eq!(
			body,
			serde_json::json!({"unifi_host": "", "unifi_user": "", "unifi_pass": ""})
		);
	}
}
