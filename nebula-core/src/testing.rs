//! Fixtures and an in-memory [`InventoryApi`] for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;

use crate::api::{DeviceDraft, InventoryApi, RackDraft, ServerDraft, ServiceDraft};
use crate::error::ApiError;
use crate::models::{NetworkDevice, Rack, Server, Service, SettingsPatch, Snapshot};
use crate::pull::{Credentials, ProxmoxResponse, UnifiResponse};

pub fn server(id: &str, rack_id: Option<&str>) -> Server {
	Server {
		id: id.to_string(),
		name: format!("Server {id}"),
		ip: None,
		description: None,
		rack_id: rack_id.map(str::to_string),
		services: Vec::new(),
	}
}

pub fn server_with_ip(id: &str, ip: &str) -> Server {
	Server { ip: Some(ip.to_string()), ..server(id, None) }
}

pub fn service(id: &str, server_id: &str) -> Service {
	Service {
		id: id.to_string(),
		server_id: Some(server_id.to_string()),
		name: format!("svc-{id}"),
		vmid: None,
		ip: None,
		vlan: None,
		cpu: None,
		ram: None,
		storage: None,
		description: None,
	}
}

pub fn rack(id: &str, name: &str) -> Rack {
	Rack { id: id.to_string(), name: name.to_string(), location: None }
}

pub fn device(id: &str, rack_id: Option<&str>, is_manual: bool) -> NetworkDevice {
	NetworkDevice {
		id: id.to_string(),
		name: format!("Device {id}"),
		kind: "Switch".to_string(),
		brand: None,
		model: None,
		ip: None,
		serial: None,
		rack_id: rack_id.map(str::to_string),
		is_manual,
	}
}

pub fn device_of(id: &str, kind: &str, model: Option<&str>) -> NetworkDevice {
	NetworkDevice {
		kind: kind.to_string(),
		model: model.map(str::to_string),
		..device(id, None, false)
	}
}

pub fn snapshot_with(
	servers: Vec<Server>,
	racks: Vec<Rack>,
	network_devices: Vec<NetworkDevice>,
	enable_racks: bool,
	show_network: bool,
) -> Snapshot {
	let mut snap = Snapshot { servers, racks, network_devices, ..Default::default() };
	snap.settings.set("enable_racks", if enable_racks { "true" } else { "false" });
	snap.settings.set("show_network_in_dashboard", if show_network { "true" } else { "false" });
	snap
}

/// Records one line per call, plus the JSON body of each update. Every call
/// fails once `fail_with` is set.
#[derive(Default)]
pub struct RecordingApi {
	calls: Mutex<Vec<String>>,
	bodies: Mutex<Vec<serde_json::Value>>,
	failure: Mutex<Option<ApiError>>,
	snapshot: Mutex<Snapshot>,
	proxmox: Mutex<ProxmoxResponse>,
	unifi: Mutex<UnifiResponse>,
}

impl RecordingApi {
	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().unwrap().clone()
	}

	/// Bodies of update and replace calls, in call order.
	pub fn bodies(&self) -> Vec<serde_json::Value> {
		self.bodies.lock().unwrap().clone()
	}

	pub fn fail_with(&self, err: ApiError) {
		*self.failure.lock().unwrap() = Some(err);
	}

	pub fn set_snapshot(&self, snap: Snapshot) {
		*self.snapshot.lock().unwrap() = snap;
	}

	pub fn set_proxmox(&self, resp: ProxmoxResponse) {
		*self.proxmox.lock().unwrap() = resp;
	}

	pub fn set_unifi(&self, resp: UnifiResponse) {
		*self.unifi.lock().unwrap() = resp;
	}

	fn record_with<B: Serialize>(&self, call: String, body: &B) -> Result<(), ApiError> {
		let value = serde_json::to_value(body).unwrap();
		self.bodies.lock().unwrap().push(value);
		self.record(call)
	}

	fn record(&self, call: String) -> Result<(), ApiError> {
		self.calls.lock().unwrap().push(call);
		match self.failure.lock().unwrap().clone() {
			Some(err) => Err(err),
			None => Ok(()),
		}
	}
}

fn rack_of(rack_id: &Option<String>) -> &str {
	rack_id.as_deref().unwrap_or("-")
}

#[async_trait]
impl InventoryApi for RecordingApi {
	async fn fetch_snapshot(&self) -> Result<Snapshot, ApiError> {
		self.record("fetch_snapshot".into())?;
		Ok(self.snapshot.lock().unwrap().clone())
	}

	async fn create_server(&self, draft: &ServerDraft) -> Result<(), ApiError> {
		self.record(format!("create_server {} rack={}", draft.name, rack_of(&draft.rack_id)))
	}

	async fn update_server(&self, id: &str, draft: &ServerDraft) -> Result<(), ApiError> {
		self.record_with(format!("update_server {id} rack={}", rack_of(&draft.rack_id)), draft)
	}

	async fn replace_server(&self, server: &Server) -> Result<(), ApiError> {
		self.record_with(format!("replace_server {} rack={}", server.id, rack_of(&server.rack_id)), server)
	}

	async fn delete_server(&self, id: &str) -> Result<(), ApiError> {
		self.record(format!("delete_server {id}"))
	}

	async fn reset_servers(&self) -> Result<(), ApiError> {
		self.record("reset_servers".into())
	}

	async fn create_service(&self, draft: &ServiceDraft) -> Result<(), ApiError> {
		self.record(format!("create_service {} on {}", draft.name, draft.server_id))
	}

	async fn update_service(&self, id: &str, draft: &ServiceDraft) -> Result<(), ApiError> {
		self.record_with(format!("update_service {id}"), draft)
	}

	async fn delete_service(&self, id: &str) -> Result<(), ApiError> {
		self.record(format!("delete_service {id}"))
	}

	async fn create_rack(&self, draft: &RackDraft) -> Result<(), ApiError> {
		self.record(format!("create_rack {}", draft.name))
	}

	async fn update_rack(&self, id: &str, draft: &RackDraft) -> Result<(), ApiError> {
		self.record_with(format!("update_rack {id}"), draft)
	}

	async fn delete_rack(&self, id: &str) -> Result<(), ApiError> {
		self.record(format!("delete_rack {id}"))
	}

	async fn create_device(&self, draft: &DeviceDraft) -> Result<(), ApiError> {
		self.record(format!("create_device {}", draft.name))
	}

	async fn update_device(&self, id: &str, draft: &DeviceDraft) -> Result<(), ApiError> {
		self.record_with(format!("update_device {id} rack={}", rack_of(&draft.rack_id)), draft)
	}

	async fn replace_device(&self, device: &NetworkDevice) -> Result<(), ApiError> {
		self.record_with(format!("replace_device {} rack={}", device.id, rack_of(&device.rack_id)), device)
	}

	async fn delete_device(&self, id: &str) -> Result<(), ApiError> {
		self.record(format!("delete_device {id}"))
	}

	async fn update_settings(&self, patch: &SettingsPatch) -> Result<(), ApiError> {
		self.record(format!("update_settings {}", patch.keys().collect::<Vec<_>>().join(",")))
	}

	async fn proxmox_vms(&self, creds: &Credentials) -> Result<ProxmoxResponse, ApiError> {
		self.record(format!("proxmox_vms {}", creds.host))?;
		Ok(self.proxmox.lock().unwrap().clone())
	}

	async fn unifi_pull(&self, creds: &Credentials) -> Result<UnifiResponse, ApiError> {
		self.record(format!("unifi_pull {}", creds.host))?;
		Ok(self.unifi.lock().unwrap().clone())
	}

	async fn export_csv(&self) -> Result<String, ApiError> {
		self.record("export_csv".into())?;
		Ok("Server Name,Server IP\n".into())
	}
}
