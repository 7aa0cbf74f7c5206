//! Per-bucket slot arena.
//!
//! Storage for one (context, producer) bucket. Freed slots are reused lowest
//! index first; only when no hole remains does the arena double its length,
//! starting from a single slot. The length never shrinks, and every index
//! issued stays below it.
//!
//! Each slot carries a generation that bumps when it is freed, so a
//! [`SlotKey`] minted before a reuse no longer resolves.

use std::collections::BTreeSet;

use crate::error::{ConsoleError, Result};

/// Stable address of a slot: index plus the generation it was issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
	index: usize,
	generation: u32,
}

impl SlotKey {
	pub const fn index(self) -> usize {
		self.index
	}

	pub const fn generation(self) -> u32 {
		self.generation
	}
}

#[derive(Debug, Clone)]
struct Slot<T> {
	generation: u32,
	value: Option<T>,
}

impl<T> Slot<T> {
	const fn empty() -> Self {
		Self {
			generation: 0,
			value: None,
		}
	}
}

/// Growable slot array with hole reuse.
#[derive(Debug, Clone)]
pub struct SlotStore<T> {
	slots: Vec<Slot<T>>,
	/// Indices that are neither occupied nor handed out by [`Self::allocate`].
	holes: BTreeSet<usize>,
}

impl<T> Default for SlotStore<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> SlotStore<T> {
	/// Creates an arena with capacity 1.
	pub fn new() -> Self {
		Self {
			slots: vec![Slot::empty()],
			holes: BTreeSet::from([0]),
		}
	}

	/// Current length of the slot array.
	pub fn capacity(&self) -> usize {
		self.slots.len()
	}

	/// Number of occupied slots.
	pub fn len(&self) -> usize {
		self.slots.iter().filter(|slot| slot.value.is_some()).count()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.iter().all(|slot| slot.value.is_none())
	}

	/// Reserves the lowest free slot, doubling the array when none is free.
	///
	/// The slot stays empty until [`Self::set`] fills it, but is not handed
	/// out again in the meantime.
	pub fn allocate(&mut self) -> SlotKey {
		let index = match self.holes.pop_first() {
			Some(index) => index,
			None => self.grow(),
		};
		SlotKey {
			index,
			generation: self.slots[index].generation,
		}
	}

	/// Doubles the array and returns the first new index, already claimed.
	fn grow(&mut self) -> usize {
		let first_new = self.slots.len();
		let new_len = (first_new * 2).max(1);
		self.slots.resize_with(new_len, Slot::empty);
		self.holes.extend(first_new + 1..new_len);
		tracing::trace!(from = first_new, to = new_len, "console.slots.grow");
		first_new
	}

	/// Allocates a slot and fills it with the value built from its key.
	pub fn insert_with(&mut self, build: impl FnOnce(SlotKey) -> T) -> SlotKey {
		let key = self.allocate();
		self.slots[key.index].value = Some(build(key));
		key
	}

	pub fn insert(&mut self, value: T) -> SlotKey {
		self.insert_with(|_| value)
	}

	fn check(&self, key: SlotKey) -> Result<()> {
		let slot = self.slots.get(key.index).ok_or(ConsoleError::SlotOutOfRange {
			index: key.index,
			capacity: self.slots.len(),
		})?;
		if slot.generation != key.generation {
			return Err(ConsoleError::StaleSlot {
				index: key.index,
				handle: key.generation,
				slot: slot.generation,
			});
		}
		Ok(())
	}

	/// Stores `value` at a previously allocated or occupied slot.
	pub fn set(&mut self, key: SlotKey, value: T) -> Result<()> {
		self.check(key)?;
		self.holes.remove(&key.index);
		self.slots[key.index].value = Some(value);
		Ok(())
	}

	pub fn get(&self, key: SlotKey) -> Option<&T> {
		self.check(key).ok()?;
		self.slots[key.index].value.as_ref()
	}

	pub fn get_mut(&mut self, key: SlotKey) -> Option<&mut T> {
		self.check(key).ok()?;
		self.slots[key.index].value.as_mut()
	}

	/// Empties a slot and returns its previous value.
	///
	/// Invalid or stale keys are ignored. Freeing a reserved but unfilled slot
	/// releases the reservation.
	pub fn free(&mut self, key: SlotKey) -> Option<T> {
		self.check(key).ok()?;
		if self.holes.contains(&key.index) {
			return None;
		}
		let slot = &mut self.slots[key.index];
		let value = slot.value.take();
		slot.generation = slot.generation.wrapping_add(1);
		self.holes.insert(key.index);
		value
	}

	/// Returns the key of the first occupied slot matching `pred`.
	pub fn position(&self, mut pred: impl FnMut(&T) -> bool) -> Option<SlotKey> {
		self.iter().find_map(|(key, value)| pred(value).then_some(key))
	}

	/// Occupied slots in index order.
	pub fn iter(&self) -> impl Iterator<Item = (SlotKey, &T)> {
		self.slots.iter().enumerate().filter_map(|(index, slot)| {
			let value = slot.value.as_ref()?;
			Some((
				SlotKey {
					index,
					generation: slot.generation,
				},
				value,
			))
		})
	}

	pub fn values(&self) -> impl Iterator<Item = &T> {
		self.slots.iter().filter_map(|slot| slot.value.as_ref())
	}

	/// Frees every occupied slot whose value matches `pred`, in index order.
	pub fn drain_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> Vec<T> {
		let keys: Vec<_> = self.iter().filter(|(_, value)| pred(value)).map(|(key, _)| key).collect();
		keys.into_iter().filter_map(|key| self.free(key)).collect()
	}
}
