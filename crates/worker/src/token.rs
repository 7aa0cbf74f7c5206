use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Monotonic generation clock for producer sweeps.
///
/// Clones share the counter, so every [`TokenSlot`] built from one clock
/// draws from the same sequence and no generation is ever issued twice.
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	next: Arc<AtomicU64>,
}

impl GenerationClock {
	/// Creates a new generation clock starting at generation 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next generation ID.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}

	/// Returns the most recently issued generation, or 0 if none was.
	pub fn last(&self) -> u64 {
		self.next.load(Ordering::Acquire)
	}
}

/// Generation-scoped cooperative cancellation signal.
///
/// Workers poll [`CancelToken::is_cancelled`] between units of work and stop
/// before their next hand-off once it flips.
#[derive(Debug, Clone)]
pub struct CancelToken {
	generation: u64,
	cancel: CancellationToken,
}

impl CancelToken {
	/// Creates a token for `generation`.
	pub fn new(generation: u64) -> Self {
		Self {
			generation,
			cancel: CancellationToken::new(),
		}
	}

	/// Returns generation ID.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true when cancellation is requested.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Requests cancellation.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}
}

/// Holds the live token for one producer; issuing a new one cancels the old.
#[derive(Debug)]
pub struct TokenSlot {
	clock: GenerationClock,
	current: Option<CancelToken>,
}

impl TokenSlot {
	/// Creates an empty slot drawing generations from `clock`.
	pub fn new(clock: GenerationClock) -> Self {
		Self { clock, current: None }
	}

	/// Cancels the running generation, if any, and issues the next one.
	pub fn supersede(&mut self) -> CancelToken {
		if let Some(prev) = self.current.take() {
			tracing::debug!(generation = prev.generation(), "worker.token.superseded");
			prev.cancel();
		}
		let token = CancelToken::new(self.clock.next());
		self.current = Some(token.clone());
		token
	}

	/// Cancels the running generation without issuing a new one.
	pub fn cancel(&mut self) {
		if let Some(prev) = self.current.take() {
			prev.cancel();
		}
	}
}
