//! Collaborators supplied by the embedding host.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use vigil_primitives::{Context, EntryId};

use crate::entry::{Entry, UserData};

/// Issues and reclaims entry identifiers.
pub trait IdRegistry: Send + Sync {
	fn generate(&self) -> EntryId;

	/// Returns an id that was never stored. Releasing an unknown id is a no-op.
	fn release(&self, id: EntryId);
}

/// Host queries and side effects consumed by resolution policies.
pub trait ConsoleHost {
	/// True while a long-running exclusive operation holds the host.
	fn is_locked(&self) -> bool {
		false
	}

	/// The top-level context the host is showing.
	fn primary_context(&self) -> Context;

	/// Switches the host to `context` with `entry` as payload.
	fn navigate(&mut self, _context: Context, _entry: &Entry) {}

	/// Pulls the item referenced by `data` back into edit focus.
	///
	/// Returns false when the host no longer knows the item.
	fn focus(&mut self, _data: &UserData) -> bool {
		false
	}

	/// Shows or hides the visual pointer to `entry`'s origin.
	fn trace(&mut self, _entry: &Entry, _on: bool) {}
}

/// Monotonic id registry that tracks which ids are live.
#[derive(Debug, Default)]
pub struct SequentialIds {
	next: AtomicU64,
	live: Mutex<FxHashSet<EntryId>>,
}

impl SequentialIds {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_live(&self, id: EntryId) -> bool {
		self.live.lock().contains(&id)
	}

	pub fn live_count(&self) -> usize {
		self.live.lock().len()
	}
}

impl IdRegistry for SequentialIds {
	fn generate(&self) -> EntryId {
		let id = EntryId(self.next.fetch_add(1, Ordering::Relaxed).wrapping_add(1));
		self.live.lock().insert(id);
		id
	}

	fn release(&self, id: EntryId) {
		if !self.live.lock().remove(&id) {
			tracing::debug!(%id, "console.ids.release_unknown");
		}
	}
}
