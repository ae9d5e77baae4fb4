use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::topology::{service_node_id, CORE_NODE_ID};

use super::{NetworkDevice, Rack, Server, Service, Settings};

/// Everything `GET /api/data` returns. Read-only once loaded; a mutation is
/// always followed by fetching a fresh one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
	#[serde(default)]
	pub servers: Vec<Server>,
	#[serde(default)]
	pub racks: Vec<Rack>,
	#[serde(default)]
	pub network_devices: Vec<NetworkDevice>,
	#[serde(default)]
	pub settings: Settings,
}

impl Snapshot {
	/// Parse and validate a raw `/api/data` body.
	pub fn from_json(body: &str) -> Result<Self, SnapshotError> {
		let snapshot: Snapshot =
			serde_json::from_str(body).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
		snapshot.validate()?;
		tracing::debug!(
			servers = snapshot.servers.len(),
			racks = snapshot.racks.len(),
			devices = snapshot.network_devices.len(),
			"snapshot loaded"
		);
		Ok(snapshot)
	}

	pub fn from_value(value: serde_json::Value) -> Result<Self, SnapshotError> {
		let snapshot: Snapshot =
			serde_json::from_value(value).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
		snapshot.validate()?;
		Ok(snapshot)
	}

	/// Rejects empty ids, duplicates within a collection, and any clash in
	/// the shared graph id space (core node, servers, devices, and services
	/// under their server-scoped node id). A service id may repeat across
	/// servers. Dangling `rack_id` values are accepted.
	pub fn validate(&self) -> Result<(), SnapshotError> {
		let mut rack_ids = HashMap::new();
		for rack in &self.racks {
			claim(&mut rack_ids, &rack.id, "rack")?;
		}

		let mut graph_ids: HashMap<&str, &'static str> = HashMap::new();
		graph_ids.insert(CORE_NODE_ID, "core node");

		for server in &self.servers {
			claim(&mut graph_ids, &server.id, "server")?;
		}
		for device in &self.network_devices {
			claim(&mut graph_ids, &device.id, "network device")?;
		}

		let mut service_nodes: HashSet<String> = HashSet::new();
		for server in &self.servers {
			let mut local: HashSet<&str> = HashSet::new();
			for service in &server.services {
				if service.id.is_empty() {
					return Err(SnapshotError::EmptyId { collection: "service" });
				}
				if !local.insert(service.id.as_str()) {
					return Err(SnapshotError::DuplicateId {
						collection: "service",
						id: service.id.clone(),
					});
				}
				let node_id = service_node_id(&server.id, &service.id);
				if let Some(first) = graph_ids.get(node_id.as_str()).copied() {
					return Err(SnapshotError::IdCollision {
						id: node_id,
						first,
						second: "service",
					});
				}
				if !service_nodes.insert(node_id.clone()) {
					return Err(SnapshotError::DuplicateId {
						collection: "service",
						id: node_id,
					});
				}
			}
		}

		Ok(())
	}

	pub fn server(&self, id: &str) -> Option<&Server> {
		self.servers.iter().find(|s| s.id == id)
	}

	pub fn rack(&self, id: &str) -> Option<&Rack> {
		self.racks.iter().find(|r| r.id == id)
	}

	pub fn device(&self, id: &str) -> Option<&NetworkDevice> {
		self.network_devices.iter().find(|d| d.id == id)
	}

	/// Services are only unique under their server, so both ids are needed.
	pub fn service(&self, server_id: &str, service_id: &str) -> Option<&Service> {
		self.server(server_id)?.service(service_id)
	}

	pub fn manual_device_count(&self) -> usize {
		self.network_devices.iter().filter(|d| d.is_manual).count()
	}

	pub fn synced_device_count(&self) -> usize {
		self.network_devices.len() - self.manual_device_count()
	}
}

fn claim<'a>(
	seen: &mut HashMap<&'a str, &'static str>,
	id: &'a str,
	collection: &'static str,
) -> Result<(), SnapshotError> {
	if id.is_empty() {
		return Err(SnapshotError::EmptyId { collection });
	}
	match seen.insert(id, collection) {
		None => Ok(()),
		Some(first) if first == collection => Err(SnapshotError::DuplicateId {
			collection,
			id: id.to_string(),
		}),
		Some(first) => Err(SnapshotError::IdCollision {
			id: id.to_string(),
			first,
			second: collection,
		}),
	}
}
