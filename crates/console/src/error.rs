//! Internal failure taxonomy.
//!
//! None of these are fatal. The [`Console`](crate::Console) facade turns every
//! one of them into a no-op after logging it, so a broken diagnostics path
//! never interrupts the editing session.

use thiserror::Error;
use vigil_primitives::{Context, EntryId, ProducerId};

/// Errors raised by store and slot operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
	/// No bucket exists for the producer in the context.
	#[error("no bucket for producer {producer} in context {context}")]
	UnknownBucket { context: Context, producer: ProducerId },

	/// Slot index beyond the bucket's current length.
	#[error("slot {index} out of range (capacity {capacity})")]
	SlotOutOfRange { index: usize, capacity: usize },

	/// Handle refers to a slot that has since been freed and reused.
	#[error("slot {index} is stale (handle generation {handle}, slot generation {slot})")]
	StaleSlot { index: usize, handle: u32, slot: u32 },

	/// Slot is allocated but holds nothing.
	#[error("slot {index} is empty")]
	EmptySlot { index: usize },

	/// Entry value has no cached origin and no structural match.
	#[error("entry {0} is not stored")]
	NotStored(EntryId),

	/// A sweep tried to hand off after its generation was cancelled.
	#[error("sweep generation {0} was cancelled")]
	SweepCancelled(u64),

	/// The control thread dropped its hand-off receiver.
	#[error("control thread hand-off channel is closed")]
	HandoffClosed,
}

/// Result type for console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;
