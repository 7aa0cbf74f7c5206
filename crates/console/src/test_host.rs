use vigil_primitives::{Context, EntryId};

use crate::entry::{Entry, UserData};
use crate::host::ConsoleHost;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HostCall {
	Navigate(Context, EntryId),
	Focus(&'static str),
	Trace(EntryId, bool),
}

/// Host double that records every side effect in call order.
#[derive(Debug)]
pub(crate) struct TestHost {
	pub primary: Context,
	pub locked: bool,
	pub items: Vec<&'static str>,
	pub calls: Vec<HostCall>,
}

impl TestHost {
	pub fn new(primary: Context) -> Self {
		Self {
			primary,
			locked: false,
			items: Vec::new(),
			calls: Vec::new(),
		}
	}

	pub fn locked(mut self, locked: bool) -> Self {
		self.locked = locked;
		self
	}

	pub fn knows(mut self, item: &'static str) -> Self {
		self.items.push(item);
		self
	}

	pub fn traces(&self) -> Vec<(EntryId, bool)> {
		self.calls
			.iter()
			.filter_map(|call| match call {
				HostCall::Trace(id, on) => Some((*id, *on)),
				_ => None,
			})
			.collect()
	}
}

impl ConsoleHost for TestHost {
	fn is_locked(&self) -> bool {
		self.locked
	}

	fn primary_context(&self) -> Context {
		self.primary
	}

	fn navigate(&mut self, context: Context, entry: &Entry) {
		self.calls.push(HostCall::Navigate(context, entry.id()));
	}

	fn focus(&mut self, data: &UserData) -> bool {
		let Some(item) = data.downcast_ref::<&'static str>() else {
			return false;
		};
		self.calls.push(HostCall::Focus(*item));
		self.items.contains(item)
	}

	fn trace(&mut self, entry: &Entry, on: bool) {
		self.calls.push(HostCall::Trace(entry.id(), on));
	}
}
