//! Console-wide selection and trace dispatch.
//!
//! At most one entry is selected at a time. Every transition fires the
//! outgoing entry's `trace(false)` before the incoming entry's `trace(true)`,
//! each exactly once, so hosts can drive exclusive highlighting from it.

use crate::entry::Entry;
use crate::host::ConsoleHost;

/// What a call to [`SelectionController::select`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
	Selected,
	/// The entry was already selected; selection was reset instead.
	Deselected,
}

/// Two-state selection machine: nothing selected, or one entry.
///
/// The controller keeps its own snapshot of the selected entry, so the
/// matching `trace(false)` still fires after the entry leaves the store.
#[derive(Debug, Default)]
pub struct SelectionController {
	selected: Option<Entry>,
}

impl SelectionController {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn selected(&self) -> Option<&Entry> {
		self.selected.as_ref()
	}

	pub fn is_selected(&self, entry: &Entry) -> bool {
		self.selected.as_ref().is_some_and(|current| current.id() == entry.id())
	}

	/// Selects `entry`, or resets when it is already the selection.
	pub fn select(&mut self, entry: &Entry, host: &mut dyn ConsoleHost) -> SelectOutcome {
		if self.is_selected(entry) {
			self.reset(host);
			return SelectOutcome::Deselected;
		}
		if let Some(previous) = self.selected.take() {
			previous.trace(host, false);
		}
		entry.trace(host, true);
		tracing::trace!(id = %entry.id(), "console.select");
		self.selected = Some(entry.clone());
		SelectOutcome::Selected
	}

	/// Clears the selection. Returns true when something was selected.
	pub fn reset(&mut self, host: &mut dyn ConsoleHost) -> bool {
		let Some(previous) = self.selected.take() else {
			return false;
		};
		previous.trace(host, false);
		tracing::trace!(id = %previous.id(), "console.select.reset");
		true
	}
}
