//! Destructive actions and their confirmation prompts.

use crate::api::InventoryApi;
use crate::error::ApiError;
use crate::models::SettingsPatch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestructiveAction {
	/// Cascades to the rack's servers and their services.
	DeleteRack { rack_id: String },
	DeleteServer { server_id: String },
	DeleteService { service_id: String },
	DeleteDevice { device_id: String },
	ResetAll,
	DisconnectUnifi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	/// Declined; nothing was sent.
	Aborted,
	/// Request succeeded. Reload the snapshot.
	Done,
}

impl DestructiveAction {
	pub fn requires_confirmation(&self) -> bool {
		!matches!(self, DestructiveAction::DeleteService { .. })
	}

	pub fn prompt(&self) -> &'static str {
		match self {
			DestructiveAction::DeleteRack { .. } => {
				"Are you sure you want to delete this rack and ALL servers and services inside it? This cannot be undone."
			}
			DestructiveAction::DeleteServer { .. } => {
				"Are you sure you want to delete this physical server and ALL of its associated VMs and Services? This cannot be undone."
			}
			DestructiveAction::DeleteService { .. } => "Delete this service?",
			DestructiveAction::DeleteDevice { .. } => "Delete this network device?",
			DestructiveAction::ResetAll => {
				"Are you absolutely sure you want to delete all servers and services? This action cannot be undone."
			}
			DestructiveAction::DisconnectUnifi => "Disconnect UniFi and remove all cached device data?",
		}
	}

	/// `confirmed` is the user's answer to [`prompt`](Self::prompt); ignored
	/// for actions that do not ask.
	pub async fn run(&self, api: &dyn InventoryApi, confirmed: bool) -> Result<Outcome, ApiError> {
		if self.requires_confirmation() && !confirmed {
			tracing::debug!(action = ?self, "declined");
			return Ok(Outcome::Aborted);
		}
		tracing::info!(action = ?self, "running destructive action");
		match self {
			DestructiveAction::DeleteRack { rack_id } => api.delete_rack(rack_id).await?,
			DestructiveAction::DeleteServer { server_id } => api.delete_server(server_id).await?,
			DestructiveAction::DeleteService { service_id } => api.delete_service(service_id).await?,
			DestructiveAction::DeleteDevice { device_id } => api.delete_device(device_id).await?,
			DestructiveAction::ResetAll => api.reset_servers().await?,
			DestructiveAction::DisconnectUnifi => {
				api.update_settings(&SettingsPatch::new().clear_unifi()).await?
			}
		}
		Ok(Outcome::Done)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::RecordingApi;

	#[tokio::test]
	async fn test_declined_sends_nothing() {
		let api = RecordingApi::default();
		for action in [
			DestructiveAction::DeleteRack { rack_id: "R1".into() },
			DestructiveAction::DeleteServer { server_id: "S1".into() },
			DestructiveAction::DeleteDevice { device_id: "D1".into() },
			DestructiveAction::ResetAll,
			DestructiveAction::DisconnectUnifi,
		] {
			assert!(action.requires_confirmation());
			assert_eq!(action.run(&api, false).await, Ok(Outcome::Aborted));
		}
		assert!(api.calls().is_empty());
	}

	#[tokio::test]
	async fn test_confirmed_rack_delete() {
		let api = RecordingApi::default();
		let action = DestructiveAction::DeleteRack { rack_id: "R1".into() };
		assert_eq!(action.run(&api, true).await, Ok(Outcome::Done));
		assert_eq!(api.calls(), vec!["delete_rack R1".to_string()]);
	}

	#[tokio::test]
	async fn test_service_delete_needs_no_confirmation() {
		let api = RecordingApi::default();
		let action = DestructiveAction::DeleteService { service_id: "V1".into() };
		assert!(!action.requires_confirmation());
		assert_eq!(action.run(&api, false).await, Ok(Outcome::Done));
		assert_eq!(api.calls(), vec!["delete_service V1".to_string()]);
	}

	#[tokio::test]
	async fn test_disconnect_clears_credentials() {
		let api = RecordingApi::default();
		DestructiveAction::DisconnectUnifi.run(&api, true).await.unwrap();
		assert_eq!(
			api.calls(),
			vec!["update_settings unifi_host,unifi_pass,unifi_user".to_string()]
		);
	}

	#[tokio::test]
	async fn test_rejection_propagates() {
		let api = RecordingApi::default();
		api.fail_with(ApiError::Rejected(Some("locked".into())));
		let err = DestructiveAction::ResetAll.run(&api, true).await.unwrap_err();
		assert_eq!(err.alert_text("fallback"), "locked");
	}

	#[test]
	fn test_prompts() {
		assert!(DestructiveAction::DeleteRack { rack_id: "x".into() }
			.prompt()
			.contains("ALL servers and services"));
		assert_eq!(DestructiveAction::DeleteDevice { device_id: "x".into() }.prompt(), "Delete this network device?");
	}
}
