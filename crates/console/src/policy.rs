//! Resolution policies.
//!
//! A policy is attached to every entry by its producer and decides three
//! things on the producer's behalf: whether the entry may be cleared without
//! user action, how to point at its origin while selected, and where
//! following its link leads. Policies are stateless; every input comes from
//! the entry and the host.

use vigil_primitives::Context;

use crate::entry::Entry;
use crate::host::ConsoleHost;

/// Producer-defined resolution, trace and link behavior for an entry.
pub trait ResolutionPolicy: Send + Sync {
	/// Short stable name for logs and debugging.
	fn name(&self) -> &'static str;

	fn trace(&self, entry: &Entry, host: &mut dyn ConsoleHost, on: bool) {
		host.trace(entry, on);
	}

	fn has_trace(&self, _entry: &Entry, _host: &dyn ConsoleHost) -> bool {
		true
	}

	/// Navigates the host to the entry's context with the entry as payload.
	fn link(&self, entry: &Entry, host: &mut dyn ConsoleHost) {
		host.navigate(entry.context(), entry);
	}

	fn has_link(&self, _entry: &Entry, _host: &dyn ConsoleHost) -> bool {
		true
	}

	/// Whether the entry may be auto-resolved right now.
	fn can_resolve(&self, entry: &Entry, host: &dyn ConsoleHost) -> bool;
}

/// Generic and informational entries. Always resolvable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl ResolutionPolicy for Always {
	fn name(&self) -> &'static str {
		"always"
	}

	fn can_resolve(&self, _entry: &Entry, _host: &dyn ConsoleHost) -> bool {
		true
	}
}

/// Entries tied to a long-running exclusive operation.
///
/// Resolvable only once the host no longer reports the operation lock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockAware;

impl ResolutionPolicy for LockAware {
	fn name(&self) -> &'static str {
		"lock-aware"
	}

	fn can_resolve(&self, _entry: &Entry, host: &dyn ConsoleHost) -> bool {
		!host.is_locked()
	}
}

/// Critical framework and I/O failures.
///
/// Explicit resolution is always allowed, but these entries carry no time
/// limit and no navigable origin, so link and trace are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorService;

impl ResolutionPolicy for ErrorService {
	fn name(&self) -> &'static str {
		"error-service"
	}

	fn trace(&self, _entry: &Entry, _host: &mut dyn ConsoleHost, _on: bool) {}

	fn has_trace(&self, _entry: &Entry, _host: &dyn ConsoleHost) -> bool {
		false
	}

	fn link(&self, _entry: &Entry, _host: &mut dyn ConsoleHost) {}

	fn has_link(&self, _entry: &Entry, _host: &dyn ConsoleHost) -> bool {
		false
	}

	fn can_resolve(&self, _entry: &Entry, _host: &dyn ConsoleHost) -> bool {
		true
	}
}

/// Entries about a specific data item that is not currently in edit focus.
///
/// Resolvable only while the host shows `designated`, where the item can be
/// re-checked. Following the link pulls the item back into focus.
#[derive(Debug, Clone, Copy)]
pub struct ContextualFocus {
	pub designated: Context,
}

impl ContextualFocus {
	pub const fn new(designated: Context) -> Self {
		Self { designated }
	}
}

impl ResolutionPolicy for ContextualFocus {
	fn name(&self) -> &'static str {
		"contextual-focus"
	}

	fn trace(&self, entry: &Entry, host: &mut dyn ConsoleHost, on: bool) {
		if entry.user_data().is_some() {
			host.trace(entry, on);
		}
	}

	fn has_trace(&self, entry: &Entry, _host: &dyn ConsoleHost) -> bool {
		entry.user_data().is_some()
	}

	fn link(&self, entry: &Entry, host: &mut dyn ConsoleHost) {
		let Some(data) = entry.user_data() else {
			return;
		};
		host.navigate(self.designated, entry);
		if !host.focus(data) {
			tracing::debug!(id = %entry.id(), "console.policy.focus_target_missing");
		}
	}

	fn has_link(&self, entry: &Entry, _host: &dyn ConsoleHost) -> bool {
		entry.user_data().is_some()
	}

	fn can_resolve(&self, _entry: &Entry, host: &dyn ConsoleHost) -> bool {
		host.primary_context() == self.designated
	}
}
