pub mod de;
mod device;
mod rack;
mod server;
mod settings;
mod snapshot;

pub use device::NetworkDevice;
pub use rack::Rack;
pub use server::{Server, Service};
pub use settings::{Palette, Settings, SettingsPatch};
pub use snapshot::Snapshot;

/// The two kinds of entity that can sit in a rack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
	Server,
	Device,
}

impl EntityKind {
	pub fn as_str(self) -> &'static str {
		match self {
			EntityKind::Server => "server",
			EntityKind::Device => "device",
		}
	}
}
