//! Groups flat servers and devices into their owning rack.
//!
//! Bucket order follows rack order; members keep snapshot order. Anything
//! whose `rack_id` is empty or points at a rack that no longer exists goes to
//! the trailing unassigned bucket.

use crate::models::{EntityKind, NetworkDevice, Rack, Server, Snapshot};

pub const UNASSIGNED_NAME: &str = "Infrastructure & Network";
pub const UNASSIGNED_LOCATION: &str = "Unassigned Gear";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BucketId {
	Rack(String),
	Unassigned,
}

impl BucketId {
	/// The `rack_id` value an entity dropped here should carry.
	pub fn rack_id(&self) -> Option<&str> {
		match self {
			BucketId::Rack(id) => Some(id),
			BucketId::Unassigned => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct RackBucket<'a> {
	pub id: BucketId,
	pub name: &'a str,
	pub location: Option<&'a str>,
	pub servers: Vec<&'a Server>,
	pub devices: Vec<&'a NetworkDevice>,
}

impl<'a> RackBucket<'a> {
	fn for_rack(rack: &'a Rack) -> Self {
		RackBucket {
			id: BucketId::Rack(rack.id.clone()),
			name: &rack.name,
			location: rack.location.as_deref(),
			servers: Vec::new(),
			devices: Vec::new(),
		}
	}

	fn unassigned() -> Self {
		RackBucket {
			id: BucketId::Unassigned,
			name: UNASSIGNED_NAME,
			location: Some(UNASSIGNED_LOCATION),
			servers: Vec::new(),
			devices: Vec::new(),
		}
	}

	pub fn is_unassigned(&self) -> bool {
		self.id == BucketId::Unassigned
	}

	pub fn is_empty(&self) -> bool {
		self.servers.is_empty() && self.devices.is_empty()
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Partition<'a> {
	/// Racks enabled but nothing tracked yet.
	Empty,
	/// Racks disabled. Every server, in order, no devices.
	Flat(Vec<&'a Server>),
	Racks(Vec<RackBucket<'a>>),
}

impl Partition<'_> {
	pub fn buckets(&self) -> &[RackBucket<'_>] {
		match self {
			Partition::Racks(buckets) => buckets,
			_ => &[],
		}
	}
}

/// Which bucket `rack_id` lands in given the current racks.
pub fn resolve_bucket(racks: &[Rack], rack_id: Option<&str>) -> BucketId {
	match rack_id {
		Some(id) if racks.iter().any(|r| r.id == id) => BucketId::Rack(id.to_string()),
		_ => BucketId::Unassigned,
	}
}

/// Owning bucket of an entity, or `None` if the id is not in the snapshot.
pub fn bucket_of(snapshot: &Snapshot, kind: EntityKind, id: &str) -> Option<BucketId> {
	let rack_id = match kind {
		EntityKind::Server => snapshot.server(id)?.rack_id(),
		EntityKind::Device => snapshot.device(id)?.rack_id(),
	};
	Some(resolve_bucket(&snapshot.racks, rack_id))
}

pub fn partition<'a>(
	servers: &'a [Server],
	racks: &'a [Rack],
	devices: &'a [NetworkDevice],
	enable_racks: bool,
	show_network: bool,
) -> Partition<'a> {
	if !enable_racks {
		return Partition::Flat(servers.iter().collect());
	}
	if servers.is_empty() && racks.is_empty() {
		return Partition::Empty;
	}

	let mut buckets: Vec<RackBucket<'a>> = racks.iter().map(RackBucket::for_rack).collect();
	let mut unassigned = RackBucket::unassigned();

	for server in servers {
		match slot(racks, server.rack_id()) {
			Some(i) => buckets[i].servers.push(server),
			None => unassigned.servers.push(server),
		}
	}
	if show_network {
		for device in devices {
			match slot(racks, device.rack_id()) {
				Some(i) => buckets[i].devices.push(device),
				None => unassigned.devices.push(device),
			}
		}
	}

	if !unassigned.is_empty() {
		buckets.push(unassigned);
	}

	tracing::trace!(buckets = buckets.len(), "partitioned snapshot");
	Partition::Racks(buckets)
}

pub fn partition_snapshot(snapshot: &Snapshot) -> Partition<'_> {
	partition(
		&snapshot.servers,
		&snapshot.racks,
		&snapshot.network_devices,
		snapshot.settings.enable_racks(),
		snapshot.settings.show_network_in_dashboard(),
	)
}

// First rack with a matching id. Rack ids are unique after validation.
fn slot(racks: &[Rack], rack_id: Option<&str>) -> Option<usize> {
	let id = rack_id?;
	racks.iter().position(|r| r.id == id)
}
