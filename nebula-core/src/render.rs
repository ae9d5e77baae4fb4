//! Dashboard view tree.
//!
//! Pure projection of a snapshot into groups, cards and service rows. Every
//! string is owned so the tree can be handed to components as props.

use crate::models::{EntityKind, NetworkDevice, Server, Service, Snapshot};
use crate::partition::{partition_snapshot, BucketId, Partition, RackBucket};

pub const EMPTY_RACKS_MESSAGE: &str = "No servers or racks tracked. Add a rack to get started!";
pub const EMPTY_FLAT_MESSAGE: &str = "No servers tracked. Add one to get started!";
pub const SERVER_IP_PLACEHOLDER: &str = "No IP specified";
pub const DEVICE_IP_PLACEHOLDER: &str = "No IP";

/// Typed click targets, one per kind of interaction a card exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
	EditServer { server_id: String },
	EditRack { rack_id: String },
	ManageService { server_id: String, service_id: String },
	AddService { server_id: String },
	EditDevice { device_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRow {
	pub name: String,
	pub ip: Option<String>,
	/// `VM 101`
	pub vm_label: Option<String>,
	pub on_click: Interaction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerCard {
	pub id: String,
	pub name: String,
	pub ip_text: String,
	pub description: Option<String>,
	pub services: Vec<ServiceRow>,
	pub on_click: Interaction,
	pub add_service: Interaction,
	pub draggable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCard {
	pub id: String,
	pub name: String,
	pub ip_text: String,
	/// Model, falling back to type.
	pub subtitle: String,
	pub kind: String,
	pub brand: Option<String>,
	pub is_manual: bool,
	/// Only manual devices can be edited.
	pub on_click: Option<Interaction>,
	pub draggable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Card {
	Server(ServerCard),
	Device(DeviceCard),
}

impl Card {
	pub fn id(&self) -> &str {
		match self {
			Card::Server(c) => &c.id,
			Card::Device(c) => &c.id,
		}
	}

	pub fn kind(&self) -> EntityKind {
		match self {
			Card::Server(_) => EntityKind::Server,
			Card::Device(_) => EntityKind::Device,
		}
	}

	pub fn draggable(&self) -> bool {
		match self {
			Card::Server(c) => c.draggable,
			Card::Device(c) => c.draggable,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupHeader {
	pub name: String,
	pub location: Option<String>,
	pub on_click: Option<Interaction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RackGroup {
	pub bucket: BucketId,
	pub header: GroupHeader,
	pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
	Empty { message: String },
	Flat { cards: Vec<Card>, placeholder: Option<String> },
	Racks { groups: Vec<RackGroup> },
}

impl DashboardView {
	pub fn card_count(&self) -> usize {
		match self {
			DashboardView::Empty { .. } => 0,
			DashboardView::Flat { cards, .. } => cards.len(),
			DashboardView::Racks { groups } => groups.iter().map(|g| g.cards.len()).sum(),
		}
	}
}

fn service_row(server_id: &str, service: &Service) -> ServiceRow {
	ServiceRow {
		name: service.name.clone(),
		ip: service.ip.clone(),
		vm_label: service.vmid.map(|id| format!("VM {id}")),
		on_click: Interaction::ManageService {
			server_id: server_id.to_string(),
			service_id: service.id.clone(),
		},
	}
}

pub fn server_card(server: &Server, draggable: bool) -> ServerCard {
	ServerCard {
		id: server.id.clone(),
		name: server.name.clone(),
		ip_text: server.ip.clone().unwrap_or_else(|| SERVER_IP_PLACEHOLDER.to_string()),
		description: server.description.clone(),
		services: server.services.iter().map(|s| service_row(&server.id, s)).collect(),
		on_click: Interaction::EditServer { server_id: server.id.clone() },
		add_service: Interaction::AddService { server_id: server.id.clone() },
		draggable,
	}
}

pub fn device_card(device: &NetworkDevice, draggable: bool) -> DeviceCard {
	DeviceCard {
		id: device.id.clone(),
		name: device.name.clone(),
		ip_text: device.ip.clone().unwrap_or_else(|| DEVICE_IP_PLACEHOLDER.to_string()),
		subtitle: device.model_or_kind().to_string(),
		kind: device.kind.clone(),
		brand: device.brand.clone(),
		is_manual: device.is_manual,
		on_click: device
			.is_manual
			.then(|| Interaction::EditDevice { device_id: device.id.clone() }),
		draggable,
	}
}

/// One group per bucket; servers first, then devices.
pub fn render_bucket(bucket: &RackBucket<'_>) -> RackGroup {
	let on_click = match &bucket.id {
		BucketId::Rack(id) => Some(Interaction::EditRack { rack_id: id.clone() }),
		BucketId::Unassigned => None,
	};
	let cards = bucket
		.servers
		.iter()
		.map(|s| Card::Server(server_card(s, true)))
		.chain(bucket.devices.iter().map(|d| Card::Device(device_card(d, true))))
		.collect();

	RackGroup {
		bucket: bucket.id.clone(),
		header: GroupHeader {
			name: bucket.name.to_string(),
			location: bucket.location.map(str::to_string),
			on_click,
		},
		cards,
	}
}

pub fn render_partition(partition: &Partition<'_>) -> DashboardView {
	match partition {
		Partition::Empty => DashboardView::Empty { message: EMPTY_RACKS_MESSAGE.to_string() },
		Partition::Flat(servers) => DashboardView::Flat {
			cards: servers.iter().map(|s| Card::Server(server_card(s, false))).collect(),
			placeholder: servers.is_empty().then(|| EMPTY_FLAT_MESSAGE.to_string()),
		},
		Partition::Racks(buckets) => DashboardView::Racks {
			groups: buckets.iter().map(render_bucket).collect(),
		},
	}
}

pub fn render_dashboard(snapshot: &Snapshot) -> DashboardView {
	render_partition(&partition_snapshot(snapshot))
}

/// Network page grid: every device in snapshot order, never draggable.
pub fn render_device_inventory(snapshot: &Snapshot) -> Vec<DeviceCard> {
	snapshot
		.network_devices
		.iter()
		.map(|d| device_card(d, false))
		.collect()
}

/// `"<n> Manual, <m> Synced"`
pub fn device_summary(snapshot: &Snapshot) -> String {
	format!(
		"{} Manual, {} Synced",
		snapshot.manual_device_count(),
		snapshot.synced_device_count()
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{device, rack, server, service, snapshot_with};

	#[test]
	fn test_flat_mode_one_card_per_server() {
		let snap = snapshot_with(
			vec![server("S1", Some("R1")), server("S2", Some("missing")), server("S3", None)],
			vec![rack("R1", "Main")],
			vec![device("D1", None, true)],
			false,
			true,
		);
		let DashboardView::Flat { cards, placeholder } = render_dashboard(&snap) else {
			panic!("expected flat view");
		};
		assert_eq!(cards.len(), 3);
		assert!(placeholder.is_none());
		assert!(cards.iter().all(|c| !c.draggable()));
	}

	#[test]
	fn test_flat_placeholder_when_no_servers() {
		let snap = snapshot_with(vec![], vec![], vec![], false, false);
		assert_eq!(
			render_dashboard(&snap),
			DashboardView::Flat { cards: vec![], placeholder: Some(EMPTY_FLAT_MESSAGE.into()) }
		);
	}

	#[test]
	fn test_empty_state_message() {
		let snap = snapshot_with(vec![], vec![], vec![], true, false);
		assert_eq!(
			render_dashboard(&snap),
			DashboardView::Empty { message: EMPTY_RACKS_MESSAGE.into() }
		);
	}

	#[test]
	fn test_rack_groups_and_headers() {
		let mut r1 = rack("R1", "Main");
		r1.location = Some("Basement".into());
		let snap = snapshot_with(
			vec![server("S1", Some("R1")), server("S2", None)],
			vec![r1, rack("R2", "Spare")],
			vec![device("D1", Some("R1"), false)],
			true,
			true,
		);
		let DashboardView::Racks { groups } = render_dashboard(&snap) else {
			panic!("expected racks view");
		};
		assert_eq!(groups.len(), 3);
		assert_eq!(groups[0].header.location.as_deref(), Some("Basement"));
		assert_eq!(groups[0].header.on_click, Some(Interaction::EditRack { rack_id: "R1".into() }));
		assert_eq!(groups[0].cards.len(), 2);
		assert_eq!(groups[0].cards[1].kind(), EntityKind::Device);
		assert!(groups[1].cards.is_empty());
		assert_eq!(groups[2].header.name, "Infrastructure & Network");
		assert_eq!(groups[2].header.on_click, None);
		assert!(groups.iter().flat_map(|g| &g.cards).all(Card::draggable));
	}

	#[test]
	fn test_server_card_contents() {
		let mut s = server("S1", None);
		let mut vm = service("V1", "S1");
		vm.vmid = Some(104);
		vm.ip = Some("10.0.0.40".into());
		s.services.push(vm);
		s.services.push(service("V2", "S1"));

		let card = server_card(&s, true);
		assert_eq!(card.ip_text, SERVER_IP_PLACEHOLDER);
		assert_eq!(card.add_service, Interaction::AddService { server_id: "S1".into() });
		assert_eq!(card.services[0].vm_label.as_deref(), Some("VM 104"));
		assert_eq!(card.services[1].vm_label, None);
		assert_eq!(
			card.services[1].on_click,
			Interaction::ManageService { server_id: "S1".into(), service_id: "V2".into() }
		);
	}

	#[test]
	fn test_add_service_present_without_services() {
		let card = server_card(&server("S9", None), false);
		assert!(card.services.is_empty());
		assert_eq!(card.add_service, Interaction::AddService { server_id: "S9".into() });
	}

	#[test]
	fn test_device_card_edit_only_when_manual() {
		let synced = device_card(&device("D1", None, false), false);
		assert_eq!(synced.on_click, None);
		assert_eq!(synced.ip_text, DEVICE_IP_PLACEHOLDER);

		let manual = device_card(&device("D2", None, true), false);
		assert_eq!(manual.on_click, Some(Interaction::EditDevice { device_id: "D2".into() }));
	}

	#[test]
	fn test_render_is_idempotent() {
		let snap = snapshot_with(
			vec![server("S1", Some("R1")), server("S2", None)],
			vec![rack("R1", "Main")],
			vec![],
			true,
			false,
		);
		assert_eq!(render_dashboard(&snap), render_dashboard(&snap));
	}

	#[test]
	fn test_device_summary() {
		let snap = snapshot_with(
			vec![],
			vec![],
			vec![device("D1", None, true), device("D2", None, false), device("D3", None, false)],
			false,
			false,
		);
		assert_eq!(device_summary(&snap), "1 Manual, 2 Synced");
		assert_eq!(render_device_inventory(&snap).len(), 3);
	}
}
