//! Client side of the inventory REST API.
//!
//! Every mutation answers `{success, error?}`. Callers reload the snapshot
//! after any successful mutation; nothing here patches local state.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError, SnapshotError};
use crate::models::{de, NetworkDevice, Server, SettingsPatch, Snapshot};
use crate::pull::{Credentials, ProxmoxResponse, UnifiResponse};

// ─── Request bodies ───────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ServerDraft {
	pub name: String,
	pub ip: Option<String>,
	pub description: Option<String>,
	pub rack_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ServiceDraft {
	pub server_id: String,
	pub name: String,
	pub vmid: Option<i64>,
	pub ip: Option<String>,
	pub vlan: Option<i64>,
	pub cpu: Option<i64>,
	pub ram: Option<f64>,
	pub storage: Option<f64>,
	pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RackDraft {
	pub name: String,
	pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DeviceDraft {
	pub name: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub brand: Option<String>,
	pub model: Option<String>,
	pub ip: Option<String>,
	pub serial: Option<String>,
	pub rack_id: Option<String>,
}

// ─── Trait ────────────────────────────────────────────────────

#[async_trait]
pub trait InventoryApi: Send + Sync {
	async fn fetch_snapshot(&self) -> Result<Snapshot, ApiError>;

	async fn create_server(&self, draft: &ServerDraft) -> Result<(), ApiError>;
	/// Full replacement, not a patch.
	async fn update_server(&self, id: &str, draft: &ServerDraft) -> Result<(), ApiError>;
	/// PUT of the whole record as loaded, services included.
	async fn replace_server(&self, server: &Server) -> Result<(), ApiError>;
	async fn delete_server(&self, id: &str) -> Result<(), ApiError>;
	/// Deletes every server and service.
	async fn reset_servers(&self) -> Result<(), ApiError>;

	async fn create_service(&self, draft: &ServiceDraft) -> Result<(), ApiError>;
	async fn update_service(&self, id: &str, draft: &ServiceDraft) -> Result<(), ApiError>;
	async fn delete_service(&self, id: &str) -> Result<(), ApiError>;

	async fn create_rack(&self, draft: &RackDraft) -> Result<(), ApiError>;
	async fn update_rack(&self, id: &str, draft: &RackDraft) -> Result<(), ApiError>;
	/// Cascades to member servers and their services.
	async fn delete_rack(&self, id: &str) -> Result<(), ApiError>;

	async fn create_device(&self, draft: &DeviceDraft) -> Result<(), ApiError>;
	async fn update_device(&self, id: &str, draft: &DeviceDraft) -> Result<(), ApiError>;
	async fn replace_device(&self, device: &NetworkDevice) -> Result<(), ApiError>;
	async fn delete_device(&self, id: &str) -> Result<(), ApiError>;

	async fn update_settings(&self, patch: &SettingsPatch) -> Result<(), ApiError>;

	/// Raw response; gating on `success` and emptiness happens in [`crate::pull`].
	async fn proxmox_vms(&self, creds: &Credentials) -> Result<ProxmoxResponse, ApiError>;
	async fn unifi_pull(&self, creds: &Credentials) -> Result<UnifiResponse, ApiError>;

	async fn export_csv(&self) -> Result<String, ApiError>;
}

// ─── HTTP implementation ──────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Ack {
	#[serde(default, deserialize_with = "de::flag")]
	success: bool,
	#[serde(default, deserialize_with = "de::opt_text")]
	error: Option<String>,
}

pub struct HttpInventoryApi {
	client: reqwest::Client,
	base: Url,
}

impl HttpInventoryApi {
	pub fn new(base: Url) -> Self {
		HttpInventoryApi { client: reqwest::Client::new(), base }
	}

	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		Ok(Self::new(config.base_url()?))
	}

	pub fn base(&self) -> &Url {
		&self.base
	}

	fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
		let mut url = self.base.clone();
		{
			let mut path = url
				.path_segments_mut()
				.map_err(|_| ApiError::Transport(format!("{} cannot be a base url", self.base)))?;
			path.pop_if_empty().extend(segments);
		}
		Ok(url)
	}

	async fn request<B>(
		&self,
		method: Method,
		segments: &[&str],
		body: Option<&B>,
	) -> Result<(StatusCode, String), ApiError>
	where
		B: Serialize + ?Sized + Sync,
	{
		let url = self.endpoint(segments)?;
		tracing::debug!(method = method.as_str(), path = url.path(), "api request");

		let mut req = self.client.request(method, url);
		if let Some(body) = body {
			req = req.json(body);
		}
		let resp = req.send().await.map_err(transport)?;
		let status = resp.status();
		let text = resp.text().await.map_err(transport)?;
		if !status.is_success() {
			tracing::warn!(%status, "api returned error status");
		}
		Ok((status, text))
	}

	async fn mutate<B>(&self, method: Method, segments: &[&str], body: Option<&B>) -> Result<(), ApiError>
	where
		B: Serialize + ?Sized + Sync,
	{
		let (status, text) = self.request(method, segments, body).await?;
		ack(status, &text)
	}
}

fn transport(e: reqwest::Error) -> ApiError {
	ApiError::Transport(e.to_string())
}

fn decode<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<T, ApiError> {
	serde_json::from_str(text).map_err(|e| {
		if status.is_success() {
			ApiError::Transport(format!("unexpected response: {e}"))
		} else {
			ApiError::Transport(format!("HTTP {status}"))
		}
	})
}

fn ack(status: StatusCode, text: &str) -> Result<(), ApiError> {
	let ack: Ack = decode(status, text)?;
	if ack.success {
		Ok(())
	} else {
		Err(ApiError::Rejected(ack.error))
	}
}

const NO_BODY: Option<&()> = None;

#[async_trait]
impl InventoryApi for HttpInventoryApi {
	async fn fetch_snapshot(&self) -> Result<Snapshot, ApiError> {
		let (status, text) = self.request(Method::GET, &["api", "data"], NO_BODY).await?;
		if !status.is_success() {
			return Err(ApiError::Transport(format!("HTTP {status}")));
		}
		Snapshot::from_json(&text).map_err(|e| match e {
			SnapshotError::Malformed(detail) => ApiError::Transport(detail),
			other => ApiError::Snapshot(other),
		})
	}

	async fn create_server(&self, draft: &ServerDraft) -> Result<(), ApiError> {
		self.mutate(Method::POST, &["api", "servers"], Some(draft)).await
	}

	async fn update_server(&self, id: &str, draft: &ServerDraft) -> Result<(), ApiError> {
		self.mutate(Method::PUT, &["api", "servers", id], Some(draft)).await
	}

	async fn replace_server(&self, server: &Server) -> Result<(), ApiError> {
		self.mutate(Method::PUT, &["api", "servers", &server.id], Some(server)).await
	}

	async fn delete_server(&self, id: &str) -> Result<(), ApiError> {
		self.mutate(Method::DELETE, &["api", "servers", id], NO_BODY).await
	}

	async fn reset_servers(&self) -> Result<(), ApiError> {
		self.mutate(Method::DELETE, &["api", "servers"], NO_BODY).await
	}

	async fn create_service(&self, draft: &ServiceDraft) -> Result<(), ApiError> {
		self.mutate(Method::POST, &["api", "services"], Some(draft)).await
	}

	async fn update_service(&self, id: &str, draft: &ServiceDraft) -> Result<(), ApiError> {
		self.mutate(Method::PUT, &["api", "services", id], Some(draft)).await
	}

	async fn delete_service(&self, id: &str) -> Result<(), ApiError> {
		self.mutate(Method::DELETE, &["api", "services", id], NO_BODY).await
	}

	async fn create_rack(&self, draft: &RackDraft) -> Result<(), ApiError> {
		self.mutate(Method::POST, &["api", "racks"], Some(draft)).await
	}

	async fn update_rack(&self, id: &str, draft: &RackDraft) -> Result<(), ApiError> {
		self.mutate(Method::PUT, &["api", "racks", id], Some(draft)).await
	}

	async fn delete_rack(&self, id: &str) -> Result<(), ApiError> {
		self.mutate(Method::DELETE, &["api", "racks", id], NO_BODY).await
	}

	async fn create_device(&self, draft: &DeviceDraft) -> Result<(), ApiError> {
		self.mutate(Method::POST, &["api", "network-devices"], Some(draft)).await
	}

	async fn update_device(&self, id: &str, draft: &DeviceDraft) -> Result<(), ApiError> {
		self.mutate(Method::PUT, &["api", "network-devices", id], Some(draft)).await
	}

	async fn replace_device(&self, device: &NetworkDevice) -> Result<(), ApiError> {
		self.mutate(Method::PUT, &["api", "network-devices", &device.id], Some(device)).await
	}

	async fn delete_device(&self, id: &str) -> Result<(), ApiError> {
		self.mutate(Method::DELETE, &["api", "network-devices", id], NO_BODY).await
	}

	async fn update_settings(&self, patch: &SettingsPatch) -> Result<(), ApiError> {
		self.mutate(Method::POST, &["api", "settings"], Some(patch)).await
	}

	async fn proxmox_vms(&self, creds: &Credentials) -> Result<ProxmoxResponse, ApiError> {
		let (status, text) = self.request(Method::POST, &["api", "proxmox", "vms"], Some(creds)).await?;
		decode(status, &text)
	}

	async fn unifi_pull(&self, creds: &Credentials) -> Result<UnifiResponse, ApiError> {
		let (status, text) = self.request(Method::POST, &["api", "unifi", "pull"], Some(creds)).await?;
		decode(status, &text)
	}

	async fn export_csv(&self) -> Result<String, ApiError> {
		let (status, text) = self.request(Method::GET, &["api", "export", "csv"], NO_BODY).await?;
		if !status.is_success() {
			return Err(ApiError::Transport(format!("HTTP {status}")));
		}
		Ok(text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn api(base: &str) -> HttpInventoryApi {
		HttpInventoryApi::new(Url::parse(base).unwrap())
	}

	#[test]
	fn test_endpoint_joins_under_base_path() {
		assert_eq!(
			api("http://localhost:80").endpoint(&["api", "data"]).unwrap().as_str(),
			"http://localhost/api/data"
		);
		assert_eq!(
			api("http://nas:5000/nebula/").endpoint(&["api", "servers", "srv_1"]).unwrap().as_str(),
			"http://nas:5000/nebula/api/servers/srv_1"
		);
	}

	#[test]
	fn test_endpoint_escapes_ids() {
		let url = api("http://h/").endpoint(&["api", "racks", "a/b c"]).unwrap();
		assert_eq!(url.path(), "/api/racks/a%2Fb%20c");
	}

	#[test]
	fn test_ack_success() {
		assert_eq!(ack(StatusCode::OK, r#"{"success": true}"#), Ok(()));
	}

	#[test]
	fn test_ack_rejection_keeps_message() {
		assert_eq!(
			ack(StatusCode::OK, r#"{"success": false, "error": "no such rack"}"#),
			Err(ApiError::Rejected(Some("no such rack".into())))
		);
		assert_eq!(
			ack(StatusCode::OK, r#"{"success": false}"#),
			Err(ApiError::Rejected(None))
		);
	}

	#[test]
	fn test_non_json_is_transport() {
		let err = ack(StatusCode::INTERNAL_SERVER_ERROR, "<h1>Internal Server Error</h1>").unwrap_err();
		assert_eq!(err, ApiError::Transport("HTTP 500 Internal Server Error".into()));
		assert!(ack(StatusCode::OK, "ok").unwrap_err().is_transport());
	}

	#[test]
	fn test_device_draft_uses_type_key() {
		let draft = DeviceDraft { name: "sw".into(), kind: "Switch".into(), ..Default::default() };
		let body = serde_json::to_value(&draft).unwrap();
		assert_eq!(body["type"], "Switch");
		assert!(body.get("kind").is_none());
	}

	#[test]
	fn test_device_record_body_keeps_identity() {
		let mut device = crate::testing::device("D1", Some("R1"), true);
		device.model = Some("USW-24".into());
		let body = serde_json::to_value(&device).unwrap();
		assert_eq!(body["id"], "D1");
		assert_eq!(body["type"], "Switch");
		assert_eq!(body["is_manual"], true);
		assert_eq!(body["rack_id"], "R1");
	}
}
