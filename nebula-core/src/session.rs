//! Per-load UI session: last snapshot, current selection, drag controller.
//!
//! Build a fresh one every time a snapshot is loaded.

use crate::api::InventoryApi;
use crate::error::ApiError;
use crate::forms::{DeviceForm, RackForm, ServerForm, ServiceForm};
use crate::models::Snapshot;
use crate::reassign::ReassignController;
use crate::render::Interaction;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
	pub server_id: Option<String>,
	pub service_id: Option<String>,
	pub rack_id: Option<String>,
	pub device_id: Option<String>,
}

/// Modal to open and the form to open it with. `None` ids mean "add".
#[derive(Debug, Clone, PartialEq)]
pub enum ModalRequest {
	Server { server_id: Option<String>, form: ServerForm },
	Service { server_id: String, service_id: Option<String>, form: ServiceForm },
	Rack { rack_id: Option<String>, form: RackForm },
	Device { device_id: Option<String>, form: DeviceForm },
}

impl ModalRequest {
	pub fn title(&self) -> &'static str {
		match self {
			ModalRequest::Server { server_id: None, .. } => "Add Server",
			ModalRequest::Server { .. } => "Edit Server",
			ModalRequest::Service { service_id: None, .. } => "Add Service",
			ModalRequest::Service { .. } => "Edit Service",
			ModalRequest::Rack { rack_id: None, .. } => "Add Rack",
			ModalRequest::Rack { .. } => "Edit Rack",
			ModalRequest::Device { device_id: None, .. } => "Add Network Device",
			ModalRequest::Device { .. } => "Edit Network Device",
		}
	}

	pub fn is_edit(&self) -> bool {
		match self {
			ModalRequest::Server { server_id, .. } => server_id.is_some(),
			ModalRequest::Service { service_id, .. } => service_id.is_some(),
			ModalRequest::Rack { rack_id, .. } => rack_id.is_some(),
			ModalRequest::Device { device_id, .. } => device_id.is_some(),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
	pub snapshot: Snapshot,
	pub selection: Selection,
	pub reassign: ReassignController,
}

impl Session {
	pub fn new(snapshot: Snapshot) -> Self {
		let reassign = ReassignController::for_snapshot(&snapshot);
		Session { snapshot, selection: Selection::default(), reassign }
	}

	/// Fetch a fresh snapshot and start over.
	pub async fn load(api: &dyn InventoryApi) -> Result<Self, ApiError> {
		Ok(Self::new(api.fetch_snapshot().await?))
	}

	/// Resolve a click against the snapshot. `None` if the target is gone.
	pub fn dispatch(&mut self, interaction: &Interaction) -> Option<ModalRequest> {
		self.selection = Selection::default();
		let request = match interaction {
			Interaction::EditServer { server_id } => {
				let server = self.snapshot.server(server_id)?;
				self.selection.server_id = Some(server.id.clone());
				ModalRequest::Server {
					server_id: Some(server.id.clone()),
					form: ServerForm::from_server(server),
				}
			}
			Interaction::EditRack { rack_id } => {
				let rack = self.snapshot.rack(rack_id)?;
				self.selection.rack_id = Some(rack.id.clone());
				ModalRequest::Rack {
					rack_id: Some(rack.id.clone()),
					form: RackForm::from_rack(rack),
				}
			}
			Interaction::ManageService { server_id, service_id } => {
				let service = self.snapshot.service(server_id, service_id)?;
				self.selection.server_id = Some(server_id.clone());
				self.selection.service_id = Some(service.id.clone());
				ModalRequest::Service {
					server_id: server_id.clone(),
					service_id: Some(service.id.clone()),
					form: ServiceForm::from_service(server_id, service),
				}
			}
			Interaction::AddService { server_id } => {
				let server = self.snapshot.server(server_id)?;
				self.selection.server_id = Some(server.id.clone());
				ModalRequest::Service {
					server_id: server.id.clone(),
					service_id: None,
					form: ServiceForm::new(server.id.clone()),
				}
			}
			Interaction::EditDevice { device_id } => {
				let device = self.snapshot.device(device_id)?;
				self.selection.device_id = Some(device.id.clone());
				ModalRequest::Device {
					device_id: Some(device.id.clone()),
					form: DeviceForm::from_device(device),
				}
			}
		};
		tracing::debug!(modal = request.title(), "dispatch");
		Some(request)
	}

	pub fn add_server(&mut self) -> ModalRequest {
		self.selection = Selection::default();
		ModalRequest::Server { server_id: None, form: ServerForm::default() }
	}

	pub fn add_rack(&mut self) -> ModalRequest {
		self.selection = Selection::default();
		ModalRequest::Rack { rack_id: None, form: RackForm::default() }
	}

	pub fn add_device(&mut self) -> ModalRequest {
		self.selection = Selection::default();
		ModalRequest::Device { device_id: None, form: DeviceForm::default() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{device, rack, server, service, snapshot_with};

	fn session() -> Session {
		let mut s1 = server("S1", Some("R1"));
		s1.services.push(service("V1", "S1"));
		Session::new(snapshot_with(
			vec![s1],
			vec![rack("R1", "Main")],
			vec![device("D1", None, true)],
			true,
			false,
		))
	}

	#[test]
	fn test_manage_service_selects_both_ids() {
		let mut session = session();
		let req = session
			.dispatch(&Interaction::ManageService { server_id: "S1".into(), service_id: "V1".into() })
			.unwrap();
		assert_eq!(req.title(), "Edit Service");
		assert_eq!(session.selection.server_id.as_deref(), Some("S1"));
		assert_eq!(session.selection.service_id.as_deref(), Some("V1"));
	}

	#[test]
	fn test_add_service_prefills_server() {
		let mut session = session();
		let Some(ModalRequest::Service { form, service_id, .. }) =
			session.dispatch(&Interaction::AddService { server_id: "S1".into() })
		else {
			panic!("expected service modal");
		};
		assert_eq!(service_id, None);
		assert_eq!(form.server_id, "S1");
		assert!(form.name.is_empty());
	}

	#[test]
	fn test_edit_rack_prefills_form() {
		let mut session = session();
		let Some(ModalRequest::Rack { form, .. }) =
			session.dispatch(&Interaction::EditRack { rack_id: "R1".into() })
		else {
			panic!("expected rack modal");
		};
		assert_eq!(form.name, "Main");
	}

	#[test]
	fn test_stale_target_opens_nothing() {
		let mut session = session();
		assert!(session.dispatch(&Interaction::EditServer { server_id: "gone".into() }).is_none());
		assert_eq!(session.selection, Selection::default());
	}

	#[test]
	fn test_new_selection_replaces_old() {
		let mut session = session();
		session.dispatch(&Interaction::EditServer { server_id: "S1".into() });
		session.dispatch(&Interaction::EditDevice { device_id: "D1".into() });
		assert_eq!(session.selection.server_id, None);
		assert_eq!(session.selection.device_id.as_deref(), Some("D1"));
	}

	#[tokio::test]
	async fn test_load_starts_clean() {
		let api = crate::testing::RecordingApi::default();
		api.set_snapshot(snapshot_with(vec![server("S1", None)], vec![], vec![], true, false));
		let session = Session::load(&api).await.unwrap();
		assert_eq!(session.snapshot.servers.len(), 1);
		assert_eq!(session.selection, Selection::default());
		assert_eq!(api.calls(), vec!["fetch_snapshot".to_string()]);
	}

	#[test]
	fn test_reassign_follows_rack_setting() {
		assert!(session().reassign.enabled());
		let flat = Session::new(snapshot_with(vec![], vec![], vec![], false, false));
		assert!(!flat.reassign.enabled());
	}
}
