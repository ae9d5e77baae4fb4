//! Plain-text renderings of core views. Styling is left to the caller.

use std::fmt::Write;

use nebula_core::render::{Card, DashboardView, DeviceCard, ServerCard};
use nebula_core::topology::Topology;
use nebula_core::Snapshot;

pub fn snapshot_summary(snapshot: &Snapshot) -> String {
	let services: usize = snapshot.servers.iter().map(|s| s.services.len()).sum();
	let mut out = String::new();
	let _ = writeln!(out, "servers:   {}", snapshot.servers.len());
	let _ = writeln!(out, "services:  {services}");
	let _ = writeln!(out, "racks:     {}", snapshot.racks.len());
	let _ = writeln!(
		out,
		"devices:   {} ({} manual, {} synced)",
		snapshot.network_devices.len(),
		snapshot.manual_device_count(),
		snapshot.synced_device_count()
	);
	let _ = writeln!(out, "palette:   {}", snapshot.settings.palette().as_str());
	let _ = writeln!(out, "racks on:  {}", snapshot.settings.enable_racks());
	let _ = writeln!(out, "show net:  {}", snapshot.settings.show_network_in_dashboard());
	out
}

fn server_lines(out: &mut String, card: &ServerCard, indent: &str) {
	let _ = writeln!(out, "{indent}[server] {}  {}", card.name, card.ip_text);
	for row in &card.services {
		let _ = write!(out, "{indent}    - {}", row.name);
		if let Some(ip) = &row.ip {
			let _ = write!(out, "  {ip}");
		}
		if let Some(vm) = &row.vm_label {
			let _ = write!(out, "  ({vm})");
		}
		out.push('\n');
	}
}

fn device_line(out: &mut String, card: &DeviceCard, indent: &str) {
	let origin = if card.is_manual { "manual" } else { "synced" };
	let _ = writeln!(
		out,
		"{indent}[device] {}  {}  {}  {}  [{origin}]",
		card.name, card.ip_text, card.subtitle, card.kind
	);
}

fn card_lines(out: &mut String, card: &Card, indent: &str) {
	match card {
		Card::Server(c) => server_lines(out, c, indent),
		Card::Device(c) => device_line(out, c, indent),
	}
}

/// Dashboard tree, one entity per line, rack groups as headings.
pub fn dashboard_tree(view: &DashboardView) -> String {
	let mut out = String::new();
	match view {
		DashboardView::Empty { message } => {
			let _ = writeln!(out, "{message}");
		}
		DashboardView::Flat { cards, placeholder } => {
			for card in cards {
				card_lines(&mut out, card, "");
			}
			if let Some(text) = placeholder {
				let _ = writeln!(out, "{text}");
			}
		}
		DashboardView::Racks { groups } => {
			for group in groups {
				match &group.header.location {
					Some(loc) => {
						let _ = writeln!(out, "{} ({loc})", group.header.name);
					}
					None => {
						let _ = writeln!(out, "{}", group.header.name);
					}
				}
				if group.cards.is_empty() {
					let _ = writeln!(out, "    (empty)");
				}
				for card in &group.cards {
					card_lines(&mut out, card, "    ");
				}
			}
		}
	}
	out
}

/// Edge list with node labels flattened onto one line.
pub fn topology_lines(topology: &Topology) -> String {
	let label = |id: &str| {
		topology
			.node(id)
			.map(|n| n.label.replace('\n', " "))
			.unwrap_or_else(|| id.to_string())
	};
	let mut out = String::new();
	let _ = writeln!(out, "{} nodes, {} edges", topology.nodes.len(), topology.edges.len());
	if let Some(gw) = &topology.gateway {
		let _ = writeln!(out, "gateway: {}", label(gw));
	}
	for edge in &topology.edges {
		let _ = writeln!(out, "{}  ->  {}", label(&edge.from), label(&edge.to));
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use nebula_core::render::render_dashboard;
	use nebula_core::topology::project;
	use serde_json::json;

	fn snapshot(enable_racks: &str) -> Snapshot {
		Snapshot::from_value(json!({
			"servers": [
				{
					"id": "srv_1", "name": "pve", "ip": "10.0.0.5", "rack_id": "rck_1",
					"services": [{ "id": "svc_1", "name": "db", "ip": "10.0.0.20", "vmid": "101" }]
				},
				{ "id": "srv_2", "name": "nas", "ip": "", "rack_id": null, "services": [] }
			],
			"racks": [
				{ "id": "rck_1", "name": "Main", "location": "Closet" },
				{ "id": "rck_2", "name": "Spare", "location": "" }
			],
			"network_devices": [
				{ "id": "net_1", "name": "udm", "type": "Gateway", "model": "UDM-Pro", "is_manual": 0 }
			],
			"settings": { "enable_racks": enable_racks, "show_network_in_dashboard": "true" }
		}))
		.unwrap()
	}

	#[test]
	fn test_summary_counts() {
		let text = snapshot_summary(&snapshot("true"));
		assert!(text.contains("servers:   2"));
		assert!(text.contains("services:  1"));
		assert!(text.contains("devices:   1 (0 manual, 1 synced)"));
		assert!(text.contains("palette:   blue"));
	}

	#[test]
	fn test_tree_groups_by_rack() {
		let text = dashboard_tree(&render_dashboard(&snapshot("true")));
		let lines: Vec<&str> = text.lines().collect();
		assert_eq!(lines[0], "Main (Closet)");
		assert_eq!(lines[1], "    [server] pve  10.0.0.5");
		assert_eq!(lines[2], "        - db  10.0.0.20  (VM 101)");
		assert_eq!(lines[3], "Spare");
		assert_eq!(lines[4], "    (empty)");
		assert_eq!(lines[5], "Infrastructure & Network (Unassigned Gear)");
		assert!(text.contains("[server] nas  No IP specified"));
		assert!(text.contains("[device] udm  No IP  UDM-Pro  Gateway  [synced]"));
	}

	#[test]
	fn test_tree_flat_mode() {
		let text = dashboard_tree(&render_dashboard(&snapshot("false")));
		assert!(text.starts_with("[server] pve"));
		assert!(!text.contains("Main"));
		assert!(!text.contains("[device]"));
	}

	#[test]
	fn test_topology_lines_use_labels() {
		let text = topology_lines(&project(&snapshot("true")));
		assert!(text.contains("gateway: udm"));
		assert!(text.contains("Core Network  ->  udm"));
		assert!(text.contains("pve 10.0.0.5  ->  udm"));
		assert!(text.contains("pve 10.0.0.5  ->  db 10.0.0.20"));
		assert!(text.contains("nas  ->  udm"));
	}
}
