//! Drag a server or device onto a rack group to move it.
//!
//! The controller only decides; committing is one full-record PUT, after
//! which the caller reloads the snapshot. Disabled in flat mode.

use crate::api::InventoryApi;
use crate::error::ApiError;
use crate::models::{EntityKind, NetworkDevice, Server, Snapshot};
use crate::partition::{bucket_of, BucketId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEntity {
	pub kind: EntityKind,
	pub id: String,
}

impl DragEntity {
	pub fn server(id: impl Into<String>) -> Self {
		DragEntity { kind: EntityKind::Server, id: id.into() }
	}

	pub fn device(id: impl Into<String>) -> Self {
		DragEntity { kind: EntityKind::Device, id: id.into() }
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
	#[default]
	Idle,
	Dragging(DragEntity),
	Hovering { entity: DragEntity, target: BucketId },
}

/// Full current record with only `rack_id` changed.
#[derive(Debug, Clone, PartialEq)]
pub enum Reassignment {
	Server(Server),
	Device(NetworkDevice),
}

impl Reassignment {
	pub fn id(&self) -> &str {
		match self {
			Reassignment::Server(s) => &s.id,
			Reassignment::Device(d) => &d.id,
		}
	}

	pub fn rack_id(&self) -> Option<&str> {
		match self {
			Reassignment::Server(s) => s.rack_id(),
			Reassignment::Device(d) => d.rack_id(),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropDecision {
	/// Not dragging, disabled, or the entity vanished from the snapshot.
	Ignored,
	/// Dropped on the bucket that already owns it.
	NoOp,
	Reassign(Reassignment),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReassignController {
	enabled: bool,
	state: DragState,
}

impl ReassignController {
	pub fn new(enabled: bool) -> Self {
		ReassignController { enabled, state: DragState::Idle }
	}

	pub fn for_snapshot(snapshot: &Snapshot) -> Self {
		Self::new(snapshot.settings.enable_racks())
	}

	pub fn enabled(&self) -> bool {
		self.enabled
	}

	pub fn state(&self) -> &DragState {
		&self.state
	}

	pub fn dragged(&self) -> Option<&DragEntity> {
		match &self.state {
			DragState::Idle => None,
			DragState::Dragging(e) | DragState::Hovering { entity: e, .. } => Some(e),
		}
	}

	pub fn begin(&mut self, entity: DragEntity) {
		if !self.enabled {
			return;
		}
		tracing::trace!(kind = entity.kind.as_str(), id = %entity.id, "drag start");
		self.state = DragState::Dragging(entity);
	}

	pub fn enter(&mut self, target: BucketId) {
		let state = std::mem::take(&mut self.state);
		self.state = match state {
			DragState::Dragging(entity) | DragState::Hovering { entity, .. } => {
				DragState::Hovering { entity, target }
			}
			DragState::Idle => DragState::Idle,
		};
	}

	pub fn leave(&mut self, target: &BucketId) {
		let state = std::mem::take(&mut self.state);
		self.state = match state {
			DragState::Hovering { entity, target: current } if &current == target => {
				DragState::Dragging(entity)
			}
			other => other,
		};
	}

	pub fn is_hovered(&self, target: &BucketId) -> bool {
		matches!(&self.state, DragState::Hovering { target: t, .. } if t == target)
	}

	/// Pointer released outside any group.
	pub fn cancel(&mut self) {
		self.state = DragState::Idle;
	}

	/// Always ends the gesture.
	pub fn drop(&mut self, target: &BucketId, snapshot: &Snapshot) -> DropDecision {
		let state = std::mem::take(&mut self.state);
		if !self.enabled {
			return DropDecision::Ignored;
		}
		let entity = match state {
			DragState::Dragging(e) | DragState::Hovering { entity: e, .. } => e,
			DragState::Idle => return DropDecision::Ignored,
		};

		let Some(owner) = bucket_of(snapshot, entity.kind, &entity.id) else {
			tracing::warn!(id = %entity.id, "dropped entity not in snapshot");
			return DropDecision::Ignored;
		};
		if &owner == target {
			tracing::debug!(id = %entity.id, "drop on owning bucket, nothing to do");
			return DropDecision::NoOp;
		}

		let rack_id = target.rack_id().map(str::to_string);
		let decision = match entity.kind {
			EntityKind::Server => snapshot.server(&entity.id).map(|s| {
				let mut record = s.clone();
				record.rack_id = rack_id;
				Reassignment::Server(record)
			}),
			EntityKind::Device => snapshot.device(&entity.id).map(|d| {
				let mut record = d.clone();
				record.rack_id = rack_id;
				Reassignment::Device(record)
			}),
		};
		decision.map_or(DropDecision::Ignored, DropDecision::Reassign)
	}
}

/// Single PUT of the updated record. Reload the snapshot on `Ok`.
pub async fn commit(api: &dyn InventoryApi, reassignment: &Reassignment) -> Result<(), ApiError> {
	tracing::info!(
		id = reassignment.id(),
		rack_id = reassignment.rack_id().unwrap_or("-"),
		"reassigning"
	);
	match reassignment {
		Reassignment::Server(s) => api.replace_server(s).await,
		Reassignment::Device(d) => api.replace_device(d).await,
	}
}
