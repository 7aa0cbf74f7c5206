//! Session-scoped console service.
//!
//! Owns the store, the selection, the context tracker and the sweep
//! hand-off queue for one editing session. All methods run on the control
//! thread; nothing here locks. Internal failures are logged at debug level
//! and turned into no-ops.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use vigil_primitives::{Context, ProducerId, Scope, Severity};
use vigil_worker::{GenerationClock, TokenSlot};

use crate::activation::ContextTracker;
use crate::config::ConsoleConfig;
use crate::entry::{Entry, EntryBuilder, EntryHandle};
use crate::error::Result;
use crate::host::{ConsoleHost, IdRegistry};
use crate::selection::{SelectOutcome, SelectionController};
use crate::store::{DiagnosticsStore, LogOutcome};
use crate::sweep::{HandoffAction, HandoffQueue, Sweep};

fn swallow<T>(op: &'static str, result: Result<T>) -> Option<T> {
	match result {
		Ok(value) => Some(value),
		Err(err) => {
			tracing::debug!(op, %err, "console.noop");
			None
		}
	}
}

pub struct Console {
	config: ConsoleConfig,
	ids: Arc<dyn IdRegistry>,
	store: DiagnosticsStore,
	selection: SelectionController,
	contexts: ContextTracker,
	clock: GenerationClock,
	/// Sweep generations at or below this belong to a session cleared by [`Console::reset`].
	retired: u64,
	sweeps: FxHashMap<ProducerId, TokenSlot>,
	handoffs: HandoffQueue,
}

impl Console {
	pub fn new(config: ConsoleConfig, ids: Arc<dyn IdRegistry>) -> Self {
		let mut contexts = ContextTracker::new(config.default_context);
		contexts.set_primary(config.primary_context);
		Self {
			store: DiagnosticsStore::new(config.bucket_warn_threshold),
			selection: SelectionController::new(),
			contexts,
			clock: GenerationClock::new(),
			retired: 0,
			sweeps: FxHashMap::default(),
			handoffs: HandoffQueue::new(),
			ids,
			config,
		}
	}

	pub fn config(&self) -> &ConsoleConfig {
		&self.config
	}

	pub fn store(&self) -> &DiagnosticsStore {
		&self.store
	}

	pub fn contexts(&self) -> &ContextTracker {
		&self.contexts
	}

	pub fn contexts_mut(&mut self) -> &mut ContextTracker {
		&mut self.contexts
	}

	/// Builds an entry with a freshly issued id.
	pub fn create(&self, builder: EntryBuilder) -> Entry {
		builder.build(self.ids.generate())
	}

	/// Logs `entry` using the configured dedupe setting.
	pub fn log(&mut self, entry: Entry) -> Option<EntryHandle> {
		self.log_with(entry, self.config.dedupe)
	}

	/// Logs `entry`. Returns its handle when stored; a duplicate refreshes the
	/// existing entry, releases the new id and returns `None`.
	pub fn log_with(&mut self, entry: Entry, dedupe: bool) -> Option<EntryHandle> {
		let (context, severity) = (entry.context(), entry.severity());
		match self.store.log(entry, dedupe) {
			LogOutcome::Stored(handle) => {
				if context != self.contexts.primary() {
					self.contexts.mark_unseen(context, severity);
				}
				Some(handle)
			}
			LogOutcome::Deduplicated { id, .. } => {
				self.ids.release(id);
				None
			}
		}
	}

	/// Creates and logs an entry in one step.
	pub fn submit(&mut self, builder: EntryBuilder) -> Option<EntryHandle> {
		let entry = self.create(builder);
		self.log(entry)
	}

	pub fn remove(&mut self, entry: &Entry) -> bool {
		self.store.remove(entry)
	}

	pub fn exists(&mut self, entry: &Entry, refresh_time: bool) -> bool {
		self.store.exists(entry, refresh_time)
	}

	pub fn get(&self, handle: &EntryHandle) -> Option<&Entry> {
		self.store.get(handle)
	}

	pub fn count_all(&self) -> usize {
		self.store.count_all()
	}

	pub fn count(&self, scope: impl Into<Scope>) -> usize {
		self.store.count(scope.into())
	}

	pub fn most_severe(&self, scope: impl Into<Scope>) -> Severity {
		self.store.most_severe(scope.into())
	}

	/// Live entries of the primary context, in display order.
	pub fn flatten(&self) -> Vec<&Entry> {
		self.store.flatten(self.contexts.primary())
	}

	/// Removes every entry in scope whose policy allows it. Returns how many.
	pub fn try_resolve_all(&mut self, scope: impl Into<Scope>, host: &dyn ConsoleHost) -> usize {
		self.store.try_resolve_all(scope.into(), host).len()
	}

	pub fn force_resolve_context(&mut self, context: Context) -> usize {
		self.store.force_resolve_context(context).len()
	}

	pub fn force_resolve_producer(&mut self, context: Context, producer: &ProducerId) -> usize {
		self.store.force_resolve_producer(context, producer).len()
	}

	pub fn force_resolve(&mut self, handle: &EntryHandle) -> Option<Entry> {
		swallow("force_resolve", self.store.force_resolve(handle))
	}

	pub fn force_resolve_entry(&mut self, entry: &Entry) -> bool {
		swallow("force_resolve_entry", self.store.force_resolve_entry(entry)).is_some()
	}

	pub fn selected(&self) -> Option<&Entry> {
		self.selection.selected()
	}

	/// Selects the entry at `handle`, or deselects it when already selected.
	/// Unknown handles are ignored.
	pub fn select(&mut self, handle: &EntryHandle, host: &mut dyn ConsoleHost) -> Option<SelectOutcome> {
		let Some(entry) = self.store.get(handle) else {
			tracing::debug!(?handle, "console.select.unknown");
			return None;
		};
		Some(self.selection.select(entry, host))
	}

	pub fn reset_selection(&mut self, host: &mut dyn ConsoleHost) -> bool {
		self.selection.reset(host)
	}

	/// Follows the link of the entry at `handle`. Returns false when the entry
	/// is gone or has no link.
	pub fn link(&self, handle: &EntryHandle, host: &mut dyn ConsoleHost) -> bool {
		let Some(entry) = self.store.get(handle) else {
			return false;
		};
		if !entry.has_link(host) {
			return false;
		}
		entry.link(host);
		true
	}

	/// Switches the primary context and clears its indicator.
	///
	/// Unseen indicators follow this value, while [`ContextualFocus`] reads
	/// [`ConsoleHost::primary_context`]. Hosts must call this (or
	/// [`Self::sync_primary`]) whenever their primary context changes.
	///
	/// [`ContextualFocus`]: crate::ContextualFocus
	pub fn set_primary(&mut self, context: Context) {
		self.contexts.set_primary(context);
	}

	/// Adopts the host's primary context if it differs from the tracked one.
	/// Returns true when the primary context changed.
	pub fn sync_primary(&mut self, host: &dyn ConsoleHost) -> bool {
		let context = host.primary_context();
		if context == self.contexts.primary() {
			return false;
		}
		self.set_primary(context);
		true
	}

	/// Starts a sweep for `producer`, cancelling any sweep it already runs.
	pub fn begin_sweep(&mut self, producer: impl Into<ProducerId>) -> Sweep {
		let producer = producer.into();
		let clock = self.clock.clone();
		let token = self
			.sweeps
			.entry(producer.clone())
			.or_insert_with(|| TokenSlot::new(clock))
			.supersede();
		tracing::debug!(%producer, generation = token.generation(), "console.sweep.begin");
		Sweep::new(producer, token, self.handoffs.sender(), self.config.sweep_chunk)
	}

	pub fn cancel_sweep(&mut self, producer: &ProducerId) {
		if let Some(slot) = self.sweeps.get_mut(producer) {
			slot.cancel();
		}
	}

	/// Applies every pending sweep hand-off. Returns the number of entries stored.
	///
	/// Hand-offs from generations issued before the last [`Self::reset`] are
	/// discarded.
	pub fn drain_handoffs(&mut self) -> usize {
		let mut stored = 0;
		while let Some(handoff) = self.handoffs.try_next() {
			if handoff.generation <= self.retired {
				tracing::debug!(producer = %handoff.producer, generation = handoff.generation, "console.sweep.retired");
				continue;
			}
			match handoff.action {
				HandoffAction::Clear(context) => {
					self.store.force_resolve_producer(context, &handoff.producer);
				}
				HandoffAction::Log(entries) => {
					stored += entries.into_iter().filter_map(|builder| self.submit(builder)).count();
				}
			}
		}
		stored
	}

	/// Clears the whole session: selection (tracing it off), every bucket,
	/// context state and running sweeps.
	pub fn reset(&mut self, host: &mut dyn ConsoleHost) {
		self.selection.reset(host);
		self.store.clear();
		self.contexts.reset();
		self.contexts.set_primary(self.config.primary_context);
		for slot in self.sweeps.values_mut() {
			slot.cancel();
		}
		self.sweeps.clear();
		// Senders held by old sweeps stay bound to the dropped queue.
		self.handoffs = HandoffQueue::new();
		self.retired = self.clock.last();
		tracing::debug!(retired = self.retired, "console.reset");
	}
}

impl std::fmt::Debug for Console {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Console")
			.field("config", &self.config)
			.field("entries", &self.store.count_all())
			.field("primary", &self.contexts.primary())
			.field("selected", &self.selection.selected().map(Entry::id))
			.finish_non_exhaustive()
	}
}
