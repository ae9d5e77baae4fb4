use serde::{Deserialize, Serialize};

use super::de;

/// A physical host and the services/VMs it runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Server {
	pub id: String,
	#[serde(default, deserialize_with = "de::text")]
	pub name: String,
	#[serde(default, deserialize_with = "de::opt_text")]
	pub ip: Option<String>,
	#[serde(default, deserialize_with = "de::opt_text")]
	pub description: Option<String>,
	/// Weak reference to a rack. Empty and missing both mean unassigned.
	#[serde(default, deserialize_with = "de::opt_text")]
	pub rack_id: Option<String>,
	#[serde(default)]
	pub services: Vec<Service>,
}

impl Server {
	pub fn rack_id(&self) -> Option<&str> {
		self.rack_id.as_deref()
	}

	pub fn service(&self, service_id: &str) -> Option<&Service> {
		self.services.iter().find(|s| s.id == service_id)
	}
}

/// A VM, container or plain service. Owned by exactly one server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
	pub id: String,
	#[serde(default, deserialize_with = "de::opt_text")]
	pub server_id: Option<String>,
	#[serde(default, deserialize_with = "de::text")]
	pub name: String,
	#[serde(default, deserialize_with = "de::opt_int")]
	pub vmid: Option<i64>,
	#[serde(default, deserialize_with = "de::opt_text")]
	pub ip: Option<String>,
	#[serde(default, deserialize_with = "de::opt_int")]
	pub vlan: Option<i64>,
	#[serde(default, deserialize_with = "de::opt_int")]
	pub cpu: Option<i64>,
	/// GB
	#[serde(default, deserialize_with = "de::opt_float")]
	pub ram: Option<f64>,
	/// GB
	#[serde(default, deserialize_with = "de::opt_float")]
	pub storage: Option<f64>,
	#[serde(default, deserialize_with = "de::opt_text")]
	pub description: Option<String>,
}
