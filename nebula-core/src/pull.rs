//! Proxmox VM listing and UniFi device sync.
//!
//! Neither flow writes inventory directly. A Proxmox pull only offers
//! candidates for the pending service form; a UniFi pull persists on the
//! backend and shows up after the next reload.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::InventoryApi;
use crate::error::ApiError;
use crate::models::{de, Server, Settings};

pub const PROXMOX_PORT: u16 = 8006;

pub const MSG_NO_SERVER_IP: &str =
	"This server does not have an IP address configured. Proxmox connection requires an IP.";
pub const MSG_NO_VMS: &str = "No VMs found or connection failed. Please check credentials.";
pub const MSG_UNIFI_FAILED: &str =
	"Failed to connect to UniFi. Check credentials and ensure local access is enabled.";

pub const CONNECT_LABEL: &str = "Connect";
pub const BUSY_LABEL: &str = "Connecting...";

#[derive(Clone, Default, Serialize, PartialEq)]
pub struct Credentials {
	pub host: String,
	pub user: String,
	pub password: String,
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("host", &self.host)
			.field("user", &self.user)
			.field("password", &"<redacted>")
			.finish()
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProxmoxVm {
	#[serde(default, deserialize_with = "de::text")]
	pub name: String,
	#[serde(default, deserialize_with = "de::opt_int")]
	pub vmid: Option<i64>,
	/// `qemu` or `lxc`
	#[serde(rename = "type", default, deserialize_with = "de::text")]
	pub kind: String,
	#[serde(default, deserialize_with = "de::opt_int")]
	pub cpu: Option<i64>,
	/// GB
	#[serde(default, deserialize_with = "de::opt_float")]
	pub ram: Option<f64>,
	/// GB
	#[serde(default, deserialize_with = "de::opt_float")]
	pub storage: Option<f64>,
}

impl ProxmoxVm {
	pub fn display_name(&self) -> &str {
		if self.name.is_empty() { "Unnamed VM" } else { &self.name }
	}

	/// One line for the candidate list, e.g. `db (ID: 101) - qemu`.
	pub fn summary(&self) -> String {
		match self.vmid {
			Some(vmid) => format!("{} (ID: {vmid}) - {}", self.display_name(), self.kind),
			None => format!("{} - {}", self.display_name(), self.kind),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProxmoxResponse {
	#[serde(default, deserialize_with = "de::flag")]
	pub success: bool,
	#[serde(default)]
	pub vms: Vec<ProxmoxVm>,
	#[serde(default, deserialize_with = "de::opt_text")]
	pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UnifiResponse {
	#[serde(default, deserialize_with = "de::flag")]
	pub success: bool,
	#[serde(default, deserialize_with = "de::opt_text")]
	pub error: Option<String>,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PullError {
	#[error("{}", MSG_NO_SERVER_IP)]
	NoServerIp,

	/// Backend said no, or said yes with nothing to offer.
	#[error("{0}")]
	Rejected(String),

	#[error(transparent)]
	Communication(ApiError),
}

impl PullError {
	pub fn alert_text(&self) -> String {
		match self {
			PullError::Communication(e) => e.alert_text(""),
			other => other.to_string(),
		}
	}
}

fn communication(e: ApiError) -> PullError {
	match e {
		ApiError::Rejected(msg) => PullError::Rejected(msg.unwrap_or_else(|| MSG_NO_VMS.to_string())),
		other => PullError::Communication(other),
	}
}

/// `ip:8006` of the server that will host the imported service.
pub fn proxmox_host(server: &Server) -> Result<String, PullError> {
	match server.ip.as_deref().map(str::trim) {
		Some(ip) if !ip.is_empty() => Ok(format!("{ip}:{PROXMOX_PORT}")),
		_ => Err(PullError::NoServerIp),
	}
}

/// Only a successful, non-empty listing counts.
pub fn evaluate_proxmox(resp: ProxmoxResponse) -> Result<Vec<ProxmoxVm>, PullError> {
	if resp.success && !resp.vms.is_empty() {
		Ok(resp.vms)
	} else {
		Err(PullError::Rejected(resp.error.unwrap_or_else(|| MSG_NO_VMS.to_string())))
	}
}

pub fn evaluate_unifi(resp: UnifiResponse) -> Result<(), PullError> {
	if resp.success {
		Ok(())
	} else {
		Err(PullError::Rejected(resp.error.unwrap_or_else(|| MSG_UNIFI_FAILED.to_string())))
	}
}

pub async fn pull_proxmox(
	api: &dyn InventoryApi,
	server: &Server,
	user: &str,
	password: &str,
) -> Result<Vec<ProxmoxVm>, PullError> {
	let creds = Credentials {
		host: proxmox_host(server)?,
		user: user.to_string(),
		password: password.to_string(),
	};
	tracing::info!(host = %creds.host, "listing proxmox vms");
	let resp = api.proxmox_vms(&creds).await.map_err(communication)?;
	let vms = evaluate_proxmox(resp)?;
	tracing::info!(count = vms.len(), "proxmox vms listed");
	Ok(vms)
}

/// On `Ok` the devices are already stored server-side; reload to see them.
pub async fn pull_unifi(api: &dyn InventoryApi, creds: &Credentials) -> Result<(), PullError> {
	tracing::info!(host = %creds.host, "syncing unifi devices");
	let resp = api.unifi_pull(creds).await.map_err(|e| match e {
		ApiError::Rejected(msg) => PullError::Rejected(msg.unwrap_or_else(|| MSG_UNIFI_FAILED.to_string())),
		other => PullError::Communication(other),
	})?;
	evaluate_unifi(resp)
}

/// Prefill for the UniFi connect form. The password is never prefilled.
pub fn unifi_form_defaults(settings: &Settings) -> Credentials {
	Credentials {
		host: settings.unifi_host().unwrap_or_default().to_string(),
		user: settings.unifi_user().unwrap_or_default().to_string(),
		password: String::new(),
	}
}

/// Connect button state while a pull request is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullBusy(pub bool);

impl PullBusy {
	pub fn label(self) -> &'static str {
		if self.0 { BUSY_LABEL } else { CONNECT_LABEL }
	}

	pub fn disabled(self) -> bool {
		self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{server_with_ip, RecordingApi};

	fn vm(name: &str, vmid: i64) -> ProxmoxVm {
		ProxmoxVm {
			name: name.into(),
			vmid: Some(vmid),
			kind: "qemu".into(),
			cpu: Some(2),
			ram: Some(4.0),
			storage: Some(32.0),
		}
	}

	#[test]
	fn test_empty_success_is_failure() {
		let resp = ProxmoxResponse { success: true, vms: vec![], error: None };
		assert_eq!(evaluate_proxmox(resp), Err(PullError::Rejected(MSG_NO_VMS.into())));
	}

	#[test]
	fn test_rejection_uses_server_text() {
		let resp = ProxmoxResponse {
			success: false,
			vms: vec![],
			error: Some("401 Unauthorized: authentication failure".into()),
		};
		assert_eq!(
			evaluate_proxmox(resp).unwrap_err().alert_text(),
			"401 Unauthorized: authentication failure"
		);
	}

	#[test]
	fn test_unifi_fallback_text() {
		let err = evaluate_unifi(UnifiResponse { success: false, error: None }).unwrap_err();
		assert_eq!(err.alert_text(), MSG_UNIFI_FAILED);
	}

	#[test]
	fn test_proxmox_host_requires_ip() {
		assert_eq!(proxmox_host(&server_with_ip("S1", "10.0.0.2")).unwrap(), "10.0.0.2:8006");
		assert_eq!(proxmox_host(&crate::testing::server("S2", None)), Err(PullError::NoServerIp));
	}

	#[test]
	fn test_vm_summary() {
		assert_eq!(vm("db", 101).summary(), "db (ID: 101) - qemu");
		let mut unnamed = vm("", 7);
		unnamed.kind = "lxc".into();
		assert_eq!(unnamed.summary(), "Unnamed VM (ID: 7) - lxc");
	}

	#[test]
	fn test_credentials_debug_hides_password() {
		let creds = Credentials { host: "h".into(), user: "u".into(), password: "hunter2".into() };
		assert!(!format!("{creds:?}").contains("hunter2"));
	}

	#[test]
	fn test_unifi_defaults_from_settings() {
		let settings: Settings = serde_json::from_value(serde_json::json!({
			"unifi_host": "192.168.1.1", "unifi_user": "admin", "unifi_pass": "secret"
		}))
		.unwrap();
		let creds = unifi_form_defaults(&settings);
		assert_eq!(creds.host, "192.168.1.1");
		assert_eq!(creds.user, "admin");
		assert!(creds.password.is_empty());
	}

	#[test]
	fn test_busy_label() {
		assert_eq!(PullBusy(true).label(), "Connecting...");
		assert!(!PullBusy(false).disabled());
	}

	#[tokio::test]
	async fn test_pull_without_ip_sends_nothing() {
		let api = RecordingApi::default();
		let err = pull_proxmox(&api, &crate::testing::server("S1", None), "root@pam", "pw")
			.await
			.unwrap_err();
		assert_eq!(err, PullError::NoServerIp);
		assert!(api.calls().is_empty());
	}

	#[tokio::test]
	async fn test_pull_sends_host_with_port() {
		let api = RecordingApi::default();
		api.set_proxmox(ProxmoxResponse { success: true, vms: vec![vm("web", 100)], error: None });

		let vms = pull_proxmox(&api, &server_with_ip("S1", "10.0.0.9"), "root@pam", "pw")
			.await
			.unwrap();
		assert_eq!(vms.len(), 1);
		assert_eq!(api.calls(), vec!["proxmox_vms 10.0.0.9:8006".to_string()]);
	}

	#[tokio::test]
	async fn test_transport_failure_is_distinct() {
		let api = RecordingApi::default();
		api.fail_with(ApiError::Transport("connection refused".into()));

		let err = pull_proxmox(&api, &server_with_ip("S1", "10.0.0.9"), "u", "p")
			.await
			.unwrap_err();
		assert_eq!(err.alert_text(), "Error communicating with backend: connection refused");
	}

	#[tokio::test]
	async fn test_unifi_pull_rejection_text() {
		let api = RecordingApi::default();
		api.set_unifi(UnifiResponse {
			success: false,
			error: Some("Authentication failed for UniFi Controller.".into()),
		});
		let creds = Credentials { host: "192.168.1.1".into(), user: "admin".into(), password: "pw".into() };
		let err = pull_unifi(&api, &creds).await.unwrap_err();
		assert_eq!(err.alert_text(), "Authentication failed for UniFi Controller.");
		assert_eq!(api.calls(), vec!["unifi_pull 192.168.1.1".to_string()]);

		api.set_unifi(UnifiResponse { success: true, error: None });
		assert_eq!(pull_unifi(&api, &creds).await, Ok(()));
	}
}
