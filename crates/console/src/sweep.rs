//! Cancellable producer sweeps.
//!
//! A sweep runs a producer's checks off the control thread and hands entries
//! back in chunks over a channel. The control thread applies them with
//! [`Console::drain_handoffs`](crate::Console::drain_handoffs); the store is
//! never touched from a worker.
//!
//! Cancellation is checked before every hand-off. Chunks already handed off
//! stay handed off, and a cancelled sweep resolves nothing, so a batch
//! interrupted halfway leaves the store exactly as far along as it got.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use vigil_primitives::{Context, ProducerId};
use vigil_worker::CancelToken;

use crate::entry::EntryBuilder;
use crate::error::{ConsoleError, Result};

/// One unit of work crossing from a sweep to the control thread.
#[derive(Debug)]
pub struct Handoff {
	pub producer: ProducerId,
	pub generation: u64,
	pub action: HandoffAction,
}

#[derive(Debug)]
pub enum HandoffAction {
	/// Drop everything the producer raised in a context before re-logging.
	Clear(Context),
	Log(Vec<EntryBuilder>),
}

/// Control-thread end of the hand-off channel.
#[derive(Debug)]
pub struct HandoffQueue {
	tx: UnboundedSender<Handoff>,
	rx: UnboundedReceiver<Handoff>,
}

impl Default for HandoffQueue {
	fn default() -> Self {
		Self::new()
	}
}

impl HandoffQueue {
	pub fn new() -> Self {
		let (tx, rx) = unbounded_channel();
		Self { tx, rx }
	}

	pub(crate) fn sender(&self) -> UnboundedSender<Handoff> {
		self.tx.clone()
	}

	/// Takes the next pending hand-off without blocking.
	pub(crate) fn try_next(&mut self) -> Option<Handoff> {
		self.rx.try_recv().ok()
	}
}

/// Summary of a finished or abandoned sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
	pub generation: u64,
	/// Items the check function ran on.
	pub checked: usize,
	/// Entries that reached the control thread.
	pub handed_off: usize,
	pub cancelled: bool,
}

/// Worker-side handle for one sweep generation.
#[derive(Debug)]
pub struct Sweep {
	producer: ProducerId,
	token: CancelToken,
	tx: UnboundedSender<Handoff>,
	chunk: usize,
	buffer: Vec<EntryBuilder>,
	report: SweepReport,
}

impl Sweep {
	pub(crate) fn new(producer: ProducerId, token: CancelToken, tx: UnboundedSender<Handoff>, chunk: usize) -> Self {
		let generation = token.generation();
		Self {
			producer,
			token,
			tx,
			chunk: chunk.max(1),
			buffer: Vec::new(),
			report: SweepReport {
				generation,
				..SweepReport::default()
			},
		}
	}

	pub fn producer(&self) -> &ProducerId {
		&self.producer
	}

	pub fn token(&self) -> &CancelToken {
		&self.token
	}

	pub fn is_cancelled(&self) -> bool {
		self.token.is_cancelled()
	}

	fn send(&mut self, action: HandoffAction) -> Result<()> {
		if self.token.is_cancelled() {
			return Err(ConsoleError::SweepCancelled(self.token.generation()));
		}
		self.tx
			.send(Handoff {
				producer: self.producer.clone(),
				generation: self.token.generation(),
				action,
			})
			.map_err(|_| ConsoleError::HandoffClosed)
	}

	/// Asks the control thread to drop this producer's entries in `context`.
	pub fn clear(&mut self, context: Context) -> Result<()> {
		self.send(HandoffAction::Clear(context))
	}

	/// Buffers an entry, handing off a chunk once the buffer is full.
	pub fn push(&mut self, entry: EntryBuilder) -> Result<()> {
		self.buffer.push(entry);
		if self.buffer.len() >= self.chunk {
			self.flush()?;
		}
		Ok(())
	}

	/// Hands off whatever is buffered. A cancelled sweep discards the buffer.
	pub fn flush(&mut self) -> Result<()> {
		if self.buffer.is_empty() {
			return Ok(());
		}
		let chunk = std::mem::take(&mut self.buffer);
		let len = chunk.len();
		self.send(HandoffAction::Log(chunk))?;
		self.report.handed_off += len;
		Ok(())
	}

	/// Runs `check` over `items`, stopping at the first cancellation check
	/// that fails, and flushes the remainder.
	pub fn run<T>(mut self, items: impl IntoIterator<Item = T>, mut check: impl FnMut(&T) -> Option<EntryBuilder>) -> SweepReport {
		for item in items {
			if self.token.is_cancelled() {
				break;
			}
			self.report.checked += 1;
			if let Some(entry) = check(&item)
				&& let Err(err) = self.push(entry)
			{
				tracing::debug!(producer = %self.producer, %err, "console.sweep.abort");
				break;
			}
		}
		self.finish()
	}

	/// Flushes and returns the report.
	pub fn finish(mut self) -> SweepReport {
		if let Err(err) = self.flush() {
			tracing::debug!(producer = %self.producer, %err, "console.sweep.discarded");
		}
		self.report.cancelled = self.token.is_cancelled();
		tracing::debug!(
			producer = %self.producer,
			generation = self.report.generation,
			checked = self.report.checked,
			handed_off = self.report.handed_off,
			cancelled = self.report.cancelled,
			"console.sweep.finish"
		);
		self.report
	}

	/// Runs [`Self::run`] on the blocking pool.
	pub fn spawn<T, I, F>(self, items: I, check: F) -> JoinHandle<SweepReport>
	where
		I: IntoIterator<Item = T> + Send + 'static,
		F: FnMut(&T) -> Option<EntryBuilder> + Send + 'static,
	{
		vigil_worker::spawn_blocking("console.sweep", move || self.run(items, check))
	}
}
