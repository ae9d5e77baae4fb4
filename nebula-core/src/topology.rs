//! Node/edge model for the topology view.
//!
//! Devices hang off a fixed core node. Servers link to the gateway when one
//! can be identified, to the core otherwise. Services hang off their server.

use serde::Serialize;

use crate::models::{NetworkDevice, Snapshot};

/// Reserved id; ingestion rejects entities that use it.
pub const CORE_NODE_ID: &str = "core_network";
pub const CORE_NODE_LABEL: &str = "Core Network";

pub const GATEWAY_KEYWORDS: [&str; 3] = ["gateway", "router", "udm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	Core,
	Device,
	Server,
	Service,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyNode {
	pub id: String,
	/// Name and address on separate lines.
	pub label: String,
	/// Hover text.
	pub title: String,
	pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyEdge {
	pub from: String,
	pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Topology {
	pub nodes: Vec<TopologyNode>,
	pub edges: Vec<TopologyEdge>,
	/// Id of the device servers connect through, if any.
	pub gateway: Option<String>,
}

impl Topology {
	pub fn node(&self, id: &str) -> Option<&TopologyNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a TopologyEdge> + 'a {
		self.edges.iter().filter(move |e| e.from == id)
	}
}

pub fn is_gateway(device: &NetworkDevice) -> bool {
	let kind = device.kind.to_lowercase();
	let model = device.model.as_deref().unwrap_or_default().to_lowercase();
	GATEWAY_KEYWORDS
		.iter()
		.any(|kw| kind.contains(kw) || model.contains(kw))
}

/// First matching device in snapshot order.
pub fn find_gateway(devices: &[NetworkDevice]) -> Option<&NetworkDevice> {
	devices.iter().find(|d| is_gateway(d))
}

/// Service ids are only unique under their server, so service nodes carry both.
pub fn service_node_id(server_id: &str, service_id: &str) -> String {
	format!("{server_id}/{service_id}")
}

fn label(name: &str, ip: Option<&str>) -> String {
	match ip {
		Some(ip) => format!("{name}\n{ip}"),
		None => name.to_string(),
	}
}

pub fn project(snapshot: &Snapshot) -> Topology {
	let mut topo = Topology::default();

	topo.nodes.push(TopologyNode {
		id: CORE_NODE_ID.to_string(),
		label: CORE_NODE_LABEL.to_string(),
		title: CORE_NODE_LABEL.to_string(),
		kind: NodeKind::Core,
	});

	for device in &snapshot.network_devices {
		topo.nodes.push(TopologyNode {
			id: device.id.clone(),
			label: label(&device.name, device.ip.as_deref()),
			title: format!("{} ({})", device.model_or_kind(), device.kind),
			kind: NodeKind::Device,
		});
		topo.edges.push(TopologyEdge {
			from: CORE_NODE_ID.to_string(),
			to: device.id.clone(),
		});
	}

	topo.gateway = find_gateway(&snapshot.network_devices).map(|d| d.id.clone());
	let uplink = topo.gateway.clone().unwrap_or_else(|| CORE_NODE_ID.to_string());

	for server in &snapshot.servers {
		topo.nodes.push(TopologyNode {
			id: server.id.clone(),
			label: label(&server.name, server.ip.as_deref()),
			title: format!("Host: {}", server.ip.as_deref().unwrap_or("N/A")),
			kind: NodeKind::Server,
		});
		topo.edges.push(TopologyEdge {
			from: server.id.clone(),
			to: uplink.clone(),
		});

		for service in &server.services {
			let node_id = service_node_id(&server.id, &service.id);
			topo.nodes.push(TopologyNode {
				id: node_id.clone(),
				label: format!("{}\n{}", service.name, service.ip.as_deref().unwrap_or("No IP")),
				title: format!("Service: {}", service.ip.as_deref().unwrap_or("N/A")),
				kind: NodeKind::Service,
			});
			topo.edges.push(TopologyEdge {
				from: server.id.clone(),
				to: node_id,
			});
		}
	}

	tracing::debug!(
		nodes = topo.nodes.len(),
		edges = topo.edges.len(),
		gateway = topo.gateway.as_deref().unwrap_or("-"),
		"projected topology"
	);
	topo
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{device_of, server, service};

	fn snapshot() -> Snapshot {
		let mut snap = Snapshot::default();
		let mut s1 = server("S1", None);
		s1.services.push(service("V1", "S1"));
		s1.services.push(service("V2", "S1"));
		snap.servers.push(s1);
		snap.servers.push(server("S2", None));
		snap
	}

	fn server_targets(topo: &Topology) -> Vec<&str> {
		let kind = |id: &str| topo.node(id).map(|n| n.kind);
		topo.edges
			.iter()
			.filter(|e| kind(&e.from) == Some(NodeKind::Server) && kind(&e.to) != Some(NodeKind::Service))
			.map(|e| e.to.as_str())
			.collect()
	}

	#[test]
	fn test_servers_link_to_gateway() {
		let mut snap = snapshot();
		snap.network_devices.push(device_of("D1", "Switch", Some("USW-24")));
		snap.network_devices.push(device_of("D2", "Gateway", Some("UXG-Pro")));
		snap.network_devices.push(device_of("D3", "AP", None));

		let topo = project(&snap);
		assert_eq!(topo.gateway.as_deref(), Some("D2"));
		assert_eq!(server_targets(&topo), vec!["D2", "D2"]);
	}

	#[test]
	fn test_no_gateway_links_to_core() {
		let mut snap = snapshot();
		snap.network_devices.push(device_of("D1", "Switch", Some("USW-24")));

		let topo = project(&snap);
		assert_eq!(topo.gateway, None);
		assert_eq!(server_targets(&topo), vec![CORE_NODE_ID, CORE_NODE_ID]);
	}

	#[test]
	fn test_gateway_matches_model_case_insensitive() {
		assert!(is_gateway(&device_of("D", "Console", Some("UDM-Pro"))));
		assert!(is_gateway(&device_of("D", "Edge ROUTER", None)));
		assert!(!is_gateway(&device_of("D", "Switch", Some("USW-Lite"))));
	}

	#[test]
	fn test_first_gateway_wins() {
		let devices = vec![
			device_of("G1", "router", None),
			device_of("G2", "gateway", None),
		];
		assert_eq!(find_gateway(&devices).map(|d| d.id.as_str()), Some("G1"));
	}

	#[test]
	fn test_node_and_edge_shape() {
		let mut snap = snapshot();
		snap.network_devices.push(device_of("D1", "Switch", None));

		let topo = project(&snap);
		// core + 1 device + 2 servers + 2 services
		assert_eq!(topo.nodes.len(), 6);
		// core->device, 2 uplinks, 2 services
		assert_eq!(topo.edges.len(), 5);
		assert_eq!(topo.nodes[0].kind, NodeKind::Core);
		assert_eq!(topo.edges[0], TopologyEdge { from: CORE_NODE_ID.into(), to: "D1".into() });

		let services: Vec<&str> = topo.edges_from("S1").skip(1).map(|e| e.to.as_str()).collect();
		assert_eq!(services, vec!["S1/V1", "S1/V2"]);
	}

	#[test]
	fn test_node_ids_unique() {
		let mut snap = snapshot();
		snap.network_devices.push(device_of("D1", "Switch", None));
		let topo = project(&snap);
		let mut ids: Vec<&str> = topo.nodes.iter().map(|n| n.id.as_str()).collect();
		let total = ids.len();
		ids.sort();
		ids.dedup();
		assert_eq!(ids.len(), total);
	}

	#[test]
	fn test_labels() {
		let mut snap = Snapshot::default();
		let mut s = crate::testing::server_with_ip("S1", "10.0.0.5");
		s.services.push(service("V1", "S1"));
		snap.servers.push(s);

		let topo = project(&snap);
		assert_eq!(topo.node("S1").unwrap().label, format!("{}\n10.0.0.5", "Server S1"));
		assert_eq!(topo.node("S1").unwrap().title, "Host: 10.0.0.5");
		assert!(topo.node("S1/V1").unwrap().label.ends_with("\nNo IP"));
		assert_eq!(topo.node("S1/V1").unwrap().title, "Service: N/A");
	}
}
