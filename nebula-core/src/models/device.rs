use serde::{Deserialize, Serialize};

use super::de;

/// A switch, router, access point or other network gear.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkDevice {
	pub id: String,
	#[serde(default, deserialize_with = "de::text")]
	pub name: String,
	#[serde(rename = "type", default, deserialize_with = "de::text")]
	pub kind: String,
	#[serde(default, deserialize_with = "de::opt_text")]
	pub brand: Option<String>,
	#[serde(default, deserialize_with = "de::opt_text")]
	pub model: Option<String>,
	#[serde(default, deserialize_with = "de::opt_text")]
	pub ip: Option<String>,
	#[serde(default, deserialize_with = "de::opt_text")]
	pub serial: Option<String>,
	#[serde(default, deserialize_with = "de::opt_text")]
	pub rack_id: Option<String>,
	/// `true` when entered by hand, `false` when synced from UniFi.
	#[serde(default, deserialize_with = "de::flag")]
	pub is_manual: bool,
}

impl NetworkDevice {
	pub fn rack_id(&self) -> Option<&str> {
		self.rack_id.as_deref()
	}

	/// Model when known, device type otherwise.
	pub fn model_or_kind(&self) -> &str {
		self.model.as_deref().unwrap_or(&self.kind)
	}
}
