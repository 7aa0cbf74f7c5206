//! Context-partitioned diagnostics store.
//!
//! Entries are bucketed by context, then by producer; each bucket is a
//! [`SlotStore`]. Two removal paths exist on purpose:
//!
//! - [`DiagnosticsStore::remove`] takes an entry value and scans its bucket for
//!   an entry describing the same issue.
//! - The `force_resolve*` family and [`DiagnosticsStore::try_resolve_all`]
//!   address slots directly through the [`EntryHandle`] cached on first store.
//!
//! The handle path is authoritative; the two are never unified.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use vigil_primitives::{Context, EntryId, ProducerId, Scope, Severity};

use crate::entry::{Entry, EntryHandle};
use crate::error::{ConsoleError, Result};
use crate::host::ConsoleHost;
use crate::slots::SlotStore;

type Buckets = IndexMap<ProducerId, SlotStore<Entry>>;

/// Result of [`DiagnosticsStore::log`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutcome {
	/// The entry was stored at `handle`.
	Stored(EntryHandle),
	/// An entry describing the same issue already exists; its time was
	/// refreshed. The caller owns `id` and must release it.
	Deduplicated { id: EntryId, existing: EntryHandle },
}

impl LogOutcome {
	/// Handle of the stored entry, whether new or pre-existing.
	pub fn handle(&self) -> &EntryHandle {
		match self {
			Self::Stored(handle) | Self::Deduplicated { existing: handle, .. } => handle,
		}
	}
}

/// Storage for every live entry, keyed by context and producer.
#[derive(Debug, Default)]
pub struct DiagnosticsStore {
	contexts: FxHashMap<Context, Buckets>,
	/// Bucket capacity above which growth is reported. Never enforced.
	warn_threshold: usize,
}

impl DiagnosticsStore {
	pub fn new(warn_threshold: usize) -> Self {
		Self {
			contexts: FxHashMap::default(),
			warn_threshold,
		}
	}

	fn bucket(&self, context: Context, producer: &ProducerId) -> Option<&SlotStore<Entry>> {
		self.contexts.get(&context)?.get(producer)
	}

	fn bucket_mut(&mut self, context: Context, producer: &ProducerId) -> Option<&mut SlotStore<Entry>> {
		self.contexts.get_mut(&context)?.get_mut(producer)
	}

	/// Buckets in scope: contexts in declaration order, producers in first-log order.
	fn buckets(&self, scope: Scope) -> impl Iterator<Item = (Context, &ProducerId, &SlotStore<Entry>)> {
		Context::all().filter(move |ctx| scope.contains(*ctx)).flat_map(move |ctx| {
			self.contexts
				.get(&ctx)
				.into_iter()
				.flat_map(move |buckets| buckets.iter().map(move |(producer, slots)| (ctx, producer, slots)))
		})
	}

	/// Stores `entry`, or refreshes the time of an existing entry for the same
	/// issue when `dedupe` is set.
	pub fn log(&mut self, mut entry: Entry, dedupe: bool) -> LogOutcome {
		let context = entry.context();
		let producer = entry.producer().clone();
		let warn_threshold = self.warn_threshold;
		let bucket = self.contexts.entry(context).or_default().entry(producer.clone()).or_default();

		if dedupe && let Some(slot) = bucket.position(|stored| stored.same_issue(&entry)) {
			if let Some(stored) = bucket.get_mut(slot) {
				stored.set_time(entry.time());
			}
			tracing::trace!(%context, %producer, index = slot.index(), "console.log.deduplicated");
			return LogOutcome::Deduplicated {
				id: entry.id(),
				existing: EntryHandle { context, producer, slot },
			};
		}

		let before = bucket.capacity();
		let slot = bucket.insert_with(|slot| {
			entry.set_origin(EntryHandle {
				context,
				producer: producer.clone(),
				slot,
			});
			entry
		});
		let after = bucket.capacity();
		if after > before && after > warn_threshold {
			tracing::warn!(%context, %producer, capacity = after, threshold = warn_threshold, "console.bucket.large");
		}
		tracing::trace!(%context, %producer, index = slot.index(), "console.log.stored");
		LogOutcome::Stored(EntryHandle { context, producer, slot })
	}

	/// Removes the stored entry describing the same issue as `entry`.
	pub fn remove(&mut self, entry: &Entry) -> bool {
		let Some(bucket) = self.bucket_mut(entry.context(), entry.producer()) else {
			return false;
		};
		let Some(slot) = bucket.position(|stored| stored.same_issue(entry)) else {
			return false;
		};
		bucket.free(slot).is_some()
	}

	/// Returns true when an entry for the same issue is stored.
	pub fn contains(&self, entry: &Entry) -> bool {
		self.bucket(entry.context(), entry.producer())
			.is_some_and(|bucket| bucket.position(|stored| stored.same_issue(entry)).is_some())
	}

	/// Like [`Self::contains`], optionally refreshing the stored time from `entry`.
	pub fn exists(&mut self, entry: &Entry, refresh_time: bool) -> bool {
		if !refresh_time {
			return self.contains(entry);
		}
		let Some(bucket) = self.bucket_mut(entry.context(), entry.producer()) else {
			return false;
		};
		let Some(slot) = bucket.position(|stored| stored.same_issue(entry)) else {
			return false;
		};
		if let Some(stored) = bucket.get_mut(slot) {
			stored.set_time(entry.time());
		}
		true
	}

	pub fn get(&self, handle: &EntryHandle) -> Option<&Entry> {
		self.bucket(handle.context, &handle.producer)?.get(handle.slot)
	}

	pub fn count_all(&self) -> usize {
		self.count(Scope::All)
	}

	pub fn count(&self, scope: Scope) -> usize {
		self.buckets(scope).map(|(_, _, slots)| slots.len()).sum()
	}

	/// Live entries in scope, in bucket order then slot order.
	pub fn iter(&self, scope: Scope) -> impl Iterator<Item = &Entry> {
		self.buckets(scope).flat_map(|(_, _, slots)| slots.values())
	}

	/// Live entries of `context` as one ordered sequence for display.
	pub fn flatten(&self, context: Context) -> Vec<&Entry> {
		self.iter(Scope::Only(context)).collect()
	}

	/// Worst severity among live entries in scope.
	pub fn most_severe(&self, scope: Scope) -> Severity {
		self.iter(scope).map(Entry::severity).fold(Severity::None, Severity::worst)
	}

	/// Length of a bucket's slot array.
	pub fn capacity(&self, context: Context, producer: &ProducerId) -> Option<usize> {
		self.bucket(context, producer).map(SlotStore::capacity)
	}

	/// Removes every entry in scope whose policy allows it.
	pub fn try_resolve_all(&mut self, scope: Scope, host: &dyn ConsoleHost) -> Vec<Entry> {
		let mut resolved = Vec::new();
		for (context, buckets) in self.contexts.iter_mut() {
			if !scope.contains(*context) {
				continue;
			}
			for slots in buckets.values_mut() {
				resolved.extend(slots.drain_where(|entry| entry.can_resolve(host)));
			}
		}
		tracing::debug!(?scope, resolved = resolved.len(), "console.try_resolve_all");
		resolved
	}

	/// Unconditionally removes every entry in `context`.
	pub fn force_resolve_context(&mut self, context: Context) -> Vec<Entry> {
		let Some(buckets) = self.contexts.get_mut(&context) else {
			return Vec::new();
		};
		buckets.values_mut().flat_map(|slots| slots.drain_where(|_| true)).collect()
	}

	/// Unconditionally removes every entry `producer` raised in `context`.
	pub fn force_resolve_producer(&mut self, context: Context, producer: &ProducerId) -> Vec<Entry> {
		self.bucket_mut(context, producer)
			.map(|slots| slots.drain_where(|_| true))
			.unwrap_or_default()
	}

	/// Unconditionally removes the entry at `handle`.
	pub fn force_resolve(&mut self, handle: &EntryHandle) -> Result<Entry> {
		let bucket = self
			.bucket_mut(handle.context, &handle.producer)
			.ok_or_else(|| ConsoleError::UnknownBucket {
				context: handle.context,
				producer: handle.producer.clone(),
			})?;
		let capacity = bucket.capacity();
		if handle.slot.index() >= capacity {
			return Err(ConsoleError::SlotOutOfRange {
				index: handle.slot.index(),
				capacity,
			});
		}
		if bucket.get(handle.slot).is_none() {
			return Err(ConsoleError::EmptySlot {
				index: handle.slot.index(),
			});
		}
		bucket.free(handle.slot).ok_or(ConsoleError::EmptySlot {
			index: handle.slot.index(),
		})
	}

	/// Unconditionally removes `entry`, through its cached origin when it has
	/// one and by structural match otherwise.
	pub fn force_resolve_entry(&mut self, entry: &Entry) -> Result<Entry> {
		if let Some(origin) = entry.origin() {
			return self.force_resolve(origin);
		}
		let bucket = self
			.bucket_mut(entry.context(), entry.producer())
			.ok_or_else(|| ConsoleError::UnknownBucket {
				context: entry.context(),
				producer: entry.producer().clone(),
			})?;
		let slot = bucket
			.position(|stored| stored.same_issue(entry))
			.ok_or(ConsoleError::NotStored(entry.id()))?;
		bucket.free(slot).ok_or(ConsoleError::NotStored(entry.id()))
	}

	/// Drops every context and bucket.
	pub fn clear(&mut self) {
		self.contexts.clear();
	}
}
