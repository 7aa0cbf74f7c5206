//! Common utilities for console integration tests.

use std::sync::Arc;

use vigil_console::{Console, ConsoleConfig, ConsoleHost, Entry, EntryBuilder, UserData};
use vigil_primitives::{Context, EntryId, Severity};

/// Side effect observed by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
	Navigate(Context, EntryId),
	Focus(String),
	Trace(EntryId, bool),
}

/// Host that records every side effect in call order.
#[derive(Debug, Default)]
pub struct RecordingHost {
	pub primary: Context,
	pub locked: bool,
	pub known: Vec<String>,
	pub calls: Vec<Call>,
}

impl RecordingHost {
	pub fn new(primary: Context) -> Self {
		Self {
			primary,
			..Self::default()
		}
	}

	pub fn traces(&self) -> Vec<(EntryId, bool)> {
		self.calls
			.iter()
			.filter_map(|call| match call {
				Call::Trace(id, on) => Some((*id, *on)),
				_ => None,
			})
			.collect()
	}
}

impl ConsoleHost for RecordingHost {
	fn is_locked(&self) -> bool {
		self.locked
	}

	fn primary_context(&self) -> Context {
		self.primary
	}

	fn navigate(&mut self, context: Context, entry: &Entry) {
		self.calls.push(Call::Navigate(context, entry.id()));
	}

	fn focus(&mut self, data: &UserData) -> bool {
		let Some(item) = data.downcast_ref::<String>() else {
			return false;
		};
		self.calls.push(Call::Focus(item.clone()));
		self.known.contains(item)
	}

	fn trace(&mut self, entry: &Entry, on: bool) {
		self.calls.push(Call::Trace(entry.id(), on));
	}
}

/// Builds a console with default configuration and a shared id registry.
pub fn console() -> (Console, Arc<vigil_console::SequentialIds>) {
	console_with(ConsoleConfig::default())
}

pub fn console_with(config: ConsoleConfig) -> (Console, Arc<vigil_console::SequentialIds>) {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	let ids = Arc::new(vigil_console::SequentialIds::new());
	(Console::new(config, ids.clone()), ids)
}

/// A warning raised by the validator about `message`.
pub fn warning(context: Context, message: &str) -> EntryBuilder {
	Entry::builder(context, "validator")
		.severity(Severity::Warn)
		.focus(context.to_string())
		.message(message)
}
