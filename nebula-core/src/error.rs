use std::path::PathBuf;

use thiserror::Error;

/// Failure talking to the inventory backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
	/// Network unreachable, or a response that is not the JSON we expect.
	#[error("{0}")]
	Transport(String),

	/// The backend answered with `success: false`.
	#[error("{}", .0.as_deref().unwrap_or("request rejected by backend"))]
	Rejected(Option<String>),

	#[error("snapshot rejected: {0}")]
	Snapshot(#[from] SnapshotError),
}

impl ApiError {
	/// Text shown to the user. Rejections use the backend's message when it
	/// sent one, `fallback` otherwise.
	pub fn alert_text(&self, fallback: &str) -> String {
		match self {
			ApiError::Transport(detail) => format!("Error communicating with backend: {detail}"),
			ApiError::Rejected(Some(msg)) => msg.clone(),
			ApiError::Rejected(None) => fallback.to_string(),
			ApiError::Snapshot(e) => format!("Inventory data is inconsistent: {e}"),
		}
	}

	pub fn is_transport(&self) -> bool {
		matches!(self, ApiError::Transport(_))
	}
}

/// Snapshot payload failed to parse or violates id uniqueness.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SnapshotError {
	#[error("malformed snapshot: {0}")]
	Malformed(String),

	#[error("{collection} entry with empty id")]
	EmptyId { collection: &'static str },

	#[error("duplicate {collection} id: {id}")]
	DuplicateId { collection: &'static str, id: String },

	#[error("id {id} is used by both a {first} and a {second}")]
	IdCollision {
		id: String,
		first: &'static str,
		second: &'static str,
	},
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read config {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid config: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("invalid api url {url}: {reason}")]
	InvalidUrl { url: String, reason: String },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_alert_text_prefers_server_message() {
		let e = ApiError::Rejected(Some("Authentication failed for UniFi Controller.".into()));
		assert_eq!(e.alert_text("fallback"), "Authentication failed for UniFi Controller.");
	}

	#[test]
	fn test_alert_text_fallback_when_silent() {
		assert_eq!(ApiError::Rejected(None).alert_text("No VMs found"), "No VMs found");
	}

	#[test]
	fn test_transport_text_is_distinct() {
		let text = ApiError::Transport("connection refused".into()).alert_text("ignored");
		assert_eq!(text, "Error communicating with backend: connection refused");
	}
}
