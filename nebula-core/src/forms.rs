//! Pending add/edit form state.
//!
//! Fields hold raw input strings. Conversion to a request body trims text
//! and turns blanks into `None`; no other validation happens here.

use crate::api::{DeviceDraft, RackDraft, ServerDraft, ServiceDraft};
use crate::models::{de, NetworkDevice, Rack, Server, Service};
use crate::pull::ProxmoxVm;

pub const UNASSIGNED_OPTION: &str = "-- Unassigned --";

fn clean(raw: &str) -> Option<String> {
	let t = raw.trim();
	(!t.is_empty()).then(|| t.to_string())
}

fn fmt_num(n: f64) -> String {
	if n.fract() == 0.0 { format!("{}", n as i64) } else { n.to_string() }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerForm {
	pub name: String,
	pub ip: String,
	pub description: String,
	/// Empty means unassigned.
	pub rack_id: String,
}

impl ServerForm {
	pub fn from_server(s: &Server) -> Self {
		ServerForm {
			name: s.name.clone(),
			ip: s.ip.clone().unwrap_or_default(),
			description: s.description.clone().unwrap_or_default(),
			rack_id: s.rack_id.clone().unwrap_or_default(),
		}
	}

	/// `rack_id` is only sent when the rack layout is on.
	pub fn to_draft(&self, enable_racks: bool) -> ServerDraft {
		ServerDraft {
			name: self.name.trim().to_string(),
			ip: clean(&self.ip),
			description: clean(&self.description),
			rack_id: if enable_racks { clean(&self.rack_id) } else { None },
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceForm {
	pub server_id: String,
	pub name: String,
	pub vmid: String,
	pub ip: String,
	pub vlan: String,
	pub cpu: String,
	pub ram: String,
	pub storage: String,
	pub description: String,
}

impl ServiceForm {
	pub fn new(server_id: impl Into<String>) -> Self {
		ServiceForm { server_id: server_id.into(), ..Default::default() }
	}

	pub fn from_service(server_id: &str, s: &Service) -> Self {
		ServiceForm {
			server_id: server_id.to_string(),
			name: s.name.clone(),
			vmid: s.vmid.map(|v| v.to_string()).unwrap_or_default(),
			ip: s.ip.clone().unwrap_or_default(),
			vlan: s.vlan.map(|v| v.to_string()).unwrap_or_default(),
			cpu: s.cpu.map(|v| v.to_string()).unwrap_or_default(),
			ram: s.ram.map(fmt_num).unwrap_or_default(),
			storage: s.storage.map(fmt_num).unwrap_or_default(),
			description: s.description.clone().unwrap_or_default(),
		}
	}

	/// Copy a pulled VM into the form. Nothing is saved until submit.
	pub fn apply_vm(&mut self, vm: &ProxmoxVm) {
		self.name = vm.display_name().to_string();
		self.vmid = vm.vmid.map(|v| v.to_string()).unwrap_or_default();
		self.cpu = vm.cpu.map(|v| v.to_string()).unwrap_or_default();
		self.ram = vm.ram.map(fmt_num).unwrap_or_default();
		self.storage = vm.storage.map(fmt_num).unwrap_or_default();
	}

	pub fn to_draft(&self) -> ServiceDraft {
		ServiceDraft {
			server_id: self.server_id.clone(),
			name: self.name.trim().to_string(),
			vmid: de::parse_int(&self.vmid),
			ip: clean(&self.ip),
			vlan: de::parse_int(&self.vlan),
			cpu: de::parse_int(&self.cpu),
			ram: self.ram.trim().parse().ok(),
			storage: self.storage.trim().parse().ok(),
			description: clean(&self.description),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RackForm {
	pub name: String,
	pub location: String,
}

impl RackForm {
	pub fn from_rack(r: &Rack) -> Self {
		RackForm {
			name: r.name.clone(),
			location: r.location.clone().unwrap_or_default(),
		}
	}

	pub fn to_draft(&self) -> RackDraft {
		RackDraft {
			name: self.name.trim().to_string(),
			location: clean(&self.location),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceForm {
	pub name: String,
	pub kind: String,
	pub brand: String,
	pub model: String,
	pub ip: String,
	pub serial: String,
	/// Carried through edits so saving does not unassign the device.
	pub rack_id: Option<String>,
}

impl DeviceForm {
	pub fn from_device(d: &NetworkDevice) -> Self {
		DeviceForm {
			name: d.name.clone(),
			kind: d.kind.clone(),
			brand: d.brand.clone().unwrap_or_default(),
			model: d.model.clone().unwrap_or_default(),
			ip: d.ip.clone().unwrap_or_default(),
			serial: d.serial.clone().unwrap_or_default(),
			rack_id: d.rack_id.clone(),
		}
	}

	pub fn to_draft(&self) -> DeviceDraft {
		DeviceDraft {
			name: self.name.trim().to_string(),
			kind: self.kind.trim().to_string(),
			brand: clean(&self.brand),
			model: clean(&self.model),
			ip: clean(&self.ip),
			serial: clean(&self.serial),
			rack_id: self.rack_id.clone(),
		}
	}
}

/// `(value, label)` pairs for the server form's rack select.
pub fn rack_options(racks: &[Rack]) -> Vec<(String, String)> {
	std::iter::once((String::new(), UNASSIGNED_OPTION.to_string()))
		.chain(racks.iter().map(|r| (r.id.clone(), r.name.clone())))
		.collect()
}
