use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:80";
pub const API_URL_ENV: &str = "NEBULA_API_URL";
const CONFIG_FILE: &str = "config.toml";

/// `<config_dir>/nebula/config.toml`
///
/// ```toml
/// api_base_url = "http://nas.local:5000"
/// log_dir = "/var/log/nebula"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
	pub api_base_url: String,
	pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
	fn default() -> Self {
		ClientConfig {
			api_base_url: DEFAULT_API_URL.to_string(),
			log_dir: None,
		}
	}
}

impl ClientConfig {
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|d| d.join("nebula").join(CONFIG_FILE))
	}

	/// Config file if present, then `NEBULA_API_URL`. The URL is checked
	/// later by [`base_url`](Self::base_url) so a command-line override can
	/// still replace a bad one.
	pub fn load() -> Result<Self, ConfigError> {
		let mut config = match Self::default_path() {
			Some(path) if path.exists() => Self::from_file(&path)?,
			_ => Self::default(),
		};
		if let Ok(url) = std::env::var(API_URL_ENV) {
			config.override_api_url(url);
		}
		Ok(config)
	}

	pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		tracing::debug!(path = %path.display(), "loaded config");
		Self::from_toml_str(&raw)
	}

	pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(raw)?)
	}

	pub fn override_api_url(&mut self, url: impl Into<String>) {
		let url = url.into();
		if !url.trim().is_empty() {
			self.api_base_url = url.trim().to_string();
		}
	}

	pub fn base_url(&self) -> Result<Url, ConfigError> {
		let invalid = |reason: String| ConfigError::InvalidUrl {
			url: self.api_base_url.clone(),
			reason,
		};
		let url = Url::parse(&self.api_base_url).map_err(|e| invalid(e.to_string()))?;
		if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
			return Err(invalid("expected an http(s) base url".into()));
		}
		Ok(url)
	}

	/// Explicit `log_dir`, else `<data_dir>/Nebula`.
	pub fn log_dir(&self) -> PathBuf {
		self.log_dir.clone().unwrap_or_else(|| {
			dirs::data_dir()
				.unwrap_or_else(|| PathBuf::from("."))
				.join("Nebula")
		})
	}
}
