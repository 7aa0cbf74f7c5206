//! Diagnostic entries.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use vigil_primitives::{Context, EntryId, Priority, ProducerId, Severity};

use crate::host::ConsoleHost;
use crate::policy::{Always, ResolutionPolicy};
use crate::slots::SlotKey;

/// Opaque producer payload, e.g. a reference to the data node an entry is about.
pub type UserData = Arc<dyn Any + Send + Sync>;

/// Authoritative address of a stored entry: its bucket and slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryHandle {
	pub context: Context,
	pub producer: ProducerId,
	pub slot: SlotKey,
}

/// Fields that decide whether two entries describe the same issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryKey<'a> {
	pub context: Context,
	pub severity: Severity,
	pub focus: &'a str,
	pub message: &'a str,
	pub description: &'a str,
	pub producer: &'a ProducerId,
	pub tooltip: &'a str,
}

/// One diagnostic record.
///
/// Entries are immutable once built. The store may refresh [`Entry::time`] on
/// deduplication and caches the storage origin on first insert; nothing else
/// changes for the entry's lifetime.
#[derive(Clone)]
pub struct Entry {
	id: EntryId,
	context: Context,
	severity: Severity,
	priority: Priority,
	producer: ProducerId,
	focus: String,
	message: String,
	description: String,
	tooltip: String,
	user_data: Option<UserData>,
	time: DateTime<Utc>,
	policy: Arc<dyn ResolutionPolicy>,
	origin: Option<EntryHandle>,
}

impl Entry {
	/// Starts building an entry for `producer` in `context`.
	pub fn builder(context: Context, producer: impl Into<ProducerId>) -> EntryBuilder {
		EntryBuilder::new(context, producer)
	}

	pub fn id(&self) -> EntryId {
		self.id
	}

	pub fn context(&self) -> Context {
		self.context
	}

	pub fn severity(&self) -> Severity {
		self.severity
	}

	pub fn priority(&self) -> Priority {
		self.priority
	}

	pub fn producer(&self) -> &ProducerId {
		&self.producer
	}

	pub fn focus(&self) -> &str {
		&self.focus
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	pub fn tooltip(&self) -> &str {
		&self.tooltip
	}

	/// Last time this issue was raised.
	pub fn time(&self) -> DateTime<Utc> {
		self.time
	}

	pub fn user_data(&self) -> Option<&UserData> {
		self.user_data.as_ref()
	}

	/// Downcasts the attached payload.
	pub fn user_data_as<T: Any>(&self) -> Option<&T> {
		self.user_data.as_deref()?.downcast_ref::<T>()
	}

	/// Where the store put this entry, if it has been stored.
	pub fn origin(&self) -> Option<&EntryHandle> {
		self.origin.as_ref()
	}

	pub fn policy_name(&self) -> &'static str {
		self.policy.name()
	}

	pub fn key(&self) -> EntryKey<'_> {
		EntryKey {
			context: self.context,
			severity: self.severity,
			focus: &self.focus,
			message: &self.message,
			description: &self.description,
			producer: &self.producer,
			tooltip: &self.tooltip,
		}
	}

	/// Returns true when both entries describe the same issue.
	pub fn same_issue(&self, other: &Entry) -> bool {
		self.key() == other.key()
	}

	pub(crate) fn set_time(&mut self, time: DateTime<Utc>) {
		self.time = time;
	}

	pub(crate) fn set_origin(&mut self, origin: EntryHandle) {
		self.origin = Some(origin);
	}

	/// Turns the visual pointer to this entry's origin on or off.
	pub fn trace(&self, host: &mut dyn ConsoleHost, on: bool) {
		self.policy.trace(self, host, on);
	}

	pub fn has_trace(&self, host: &dyn ConsoleHost) -> bool {
		self.policy.has_trace(self, host)
	}

	/// Navigates the host to this entry's origin.
	pub fn link(&self, host: &mut dyn ConsoleHost) {
		self.policy.link(self, host);
	}

	pub fn has_link(&self, host: &dyn ConsoleHost) -> bool {
		self.policy.has_link(self, host)
	}

	/// Asks the entry's policy whether it may be cleared without user action.
	pub fn can_resolve(&self, host: &dyn ConsoleHost) -> bool {
		self.policy.can_resolve(self, host)
	}
}

impl fmt::Debug for Entry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Entry")
			.field("id", &self.id)
			.field("context", &self.context)
			.field("severity", &self.severity)
			.field("priority", &self.priority)
			.field("producer", &self.producer)
			.field("focus", &self.focus)
			.field("message", &self.message)
			.field("time", &self.time)
			.field("policy", &self.policy.name())
			.field("origin", &self.origin)
			.finish_non_exhaustive()
	}
}

/// Producer-side constructor for [`Entry`].
///
/// Builders carry no id, so validation workers can assemble them off the
/// control thread; the id is attached when the console accepts the entry.
#[derive(Clone)]
pub struct EntryBuilder {
	context: Context,
	producer: ProducerId,
	severity: Severity,
	priority: Priority,
	focus: String,
	message: String,
	description: String,
	tooltip: String,
	user_data: Option<UserData>,
	time: Option<DateTime<Utc>>,
	policy: Option<Arc<dyn ResolutionPolicy>>,
}

impl EntryBuilder {
	pub fn new(context: Context, producer: impl Into<ProducerId>) -> Self {
		Self {
			context,
			producer: producer.into(),
			severity: Severity::None,
			priority: Priority::Default,
			focus: String::new(),
			message: String::new(),
			description: String::new(),
			tooltip: String::new(),
			user_data: None,
			time: None,
			policy: None,
		}
	}

	pub fn severity(mut self, severity: Severity) -> Self {
		self.severity = severity;
		self
	}

	pub fn priority(mut self, priority: Priority) -> Self {
		self.priority = priority;
		self
	}

	pub fn focus(mut self, focus: impl Into<String>) -> Self {
		self.focus = focus.into();
		self
	}

	pub fn message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}

	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
		self.tooltip = tooltip.into();
		self
	}

	pub fn user_data(mut self, data: impl Any + Send + Sync) -> Self {
		self.user_data = Some(Arc::new(data));
		self
	}

	pub fn shared_user_data(mut self, data: UserData) -> Self {
		self.user_data = Some(data);
		self
	}

	/// Overrides the raise time (defaults to the moment of [`Self::build`]).
	pub fn at(mut self, time: DateTime<Utc>) -> Self {
		self.time = Some(time);
		self
	}

	/// Attaches the resolution policy. Defaults to [`Always`].
	pub fn policy(mut self, policy: Arc<dyn ResolutionPolicy>) -> Self {
		self.policy = Some(policy);
		self
	}

	pub fn context(&self) -> Context {
		self.context
	}

	pub fn producer(&self) -> &ProducerId {
		&self.producer
	}

	pub fn build(self, id: EntryId) -> Entry {
		Entry {
			id,
			context: self.context,
			severity: self.severity,
			priority: self.priority,
			producer: self.producer,
			focus: self.focus,
			message: self.message,
			description: self.description,
			tooltip: self.tooltip,
			user_data: self.user_data,
			time: self.time.unwrap_or_else(Utc::now),
			policy: self.policy.unwrap_or_else(|| Arc::new(Always)),
			origin: None,
		}
	}
}

impl fmt::Debug for EntryBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EntryBuilder")
			.field("context", &self.context)
			.field("producer", &self.producer)
			.field("severity", &self.severity)
			.field("message", &self.message)
			.finish_non_exhaustive()
	}
}
