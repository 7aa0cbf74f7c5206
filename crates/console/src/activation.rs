//! Context activation and unseen-issue indicators.
//!
//! Tracks which contexts the host shows as tabs, which one is primary, and
//! the worst severity logged into each non-primary context since the user
//! last looked at it.

use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use vigil_primitives::{Context, Severity};

#[derive(Debug, Clone)]
pub struct ContextTracker {
	default: Context,
	primary: Context,
	active: IndexSet<Context>,
	unseen: FxHashMap<Context, Severity>,
	reservations: FxHashMap<Context, usize>,
}

impl Default for ContextTracker {
	fn default() -> Self {
		Self::new(Context::Home)
	}
}

impl ContextTracker {
	/// Creates a tracker whose permanent default context is also primary.
	pub fn new(default: Context) -> Self {
		Self {
			default,
			primary: default,
			active: IndexSet::from([default]),
			unseen: FxHashMap::default(),
			reservations: FxHashMap::default(),
		}
	}

	pub fn default_context(&self) -> Context {
		self.default
	}

	pub fn primary(&self) -> Context {
		self.primary
	}

	/// Active contexts in activation order.
	pub fn active(&self) -> impl Iterator<Item = Context> + '_ {
		self.active.iter().copied()
	}

	pub fn is_active(&self, context: Context) -> bool {
		self.active.contains(&context)
	}

	pub fn activate(&mut self, context: Context) {
		self.active.insert(context);
		self.clear_unseen(context);
	}

	/// Switches the primary context, activating it and clearing its indicator.
	pub fn set_primary(&mut self, context: Context) {
		self.primary = context;
		self.activate(context);
	}

	/// True when `context` is primary or still reserved by an external holder.
	pub fn is_residual(&self, context: Context) -> bool {
		context == self.primary || self.reservations.get(&context).is_some_and(|n| *n > 0)
	}

	/// Returns true when `context` may be deactivated right now.
	pub fn can_deactivate(&self, context: Context) -> bool {
		context != self.default && !self.is_residual(context)
	}

	/// Removes `context` from the active set and makes sure `fallback` is active.
	///
	/// Refused for the default context and residual contexts; the return value
	/// says whether the removal happened.
	pub fn deactivate(&mut self, context: Context, fallback: Context) -> bool {
		if !self.can_deactivate(context) {
			tracing::debug!(%context, "console.context.deactivate_refused");
			return false;
		}
		self.active.shift_remove(&context);
		self.unseen.remove(&context);
		if fallback != context {
			self.active.insert(fallback);
		}
		true
	}

	/// Records an external hold on `context` (e.g. an open edit focus).
	pub fn reserve(&mut self, context: Context) {
		*self.reservations.entry(context).or_default() += 1;
	}

	/// Drops one hold on `context`. Extra releases are ignored.
	pub fn release(&mut self, context: Context) {
		if let Some(count) = self.reservations.get_mut(&context) {
			*count = count.saturating_sub(1);
			if *count == 0 {
				self.reservations.remove(&context);
			}
		}
	}

	/// Raises the unseen indicator for `context` unless it is primary.
	pub fn mark_unseen(&mut self, context: Context, severity: Severity) {
		if context == self.primary {
			return;
		}
		let level = self.unseen.entry(context).or_insert(severity);
		*level = level.worst(severity);
	}

	pub fn clear_unseen(&mut self, context: Context) {
		self.unseen.remove(&context);
	}

	/// Worst unseen severity for `context`, if any entries arrived unseen.
	pub fn indicator(&self, context: Context) -> Option<Severity> {
		self.unseen.get(&context).copied()
	}

	/// Returns to the freshly constructed state.
	pub fn reset(&mut self) {
		*self = Self::new(self.default);
	}
}
