//! Inventory model and view logic shared by the desktop app and the CLI.

pub mod actions;
pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod html;
pub mod models;
pub mod partition;
pub mod pull;
pub mod reassign;
pub mod render;
pub mod session;
pub mod topology;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{HttpInventoryApi, InventoryApi};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, SnapshotError};
pub use models::{EntityKind, NetworkDevice, Palette, Rack, Server, Service, Settings, SettingsPatch, Snapshot};
pub use session::Session;
