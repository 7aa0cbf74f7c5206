use std::borrow::Cow;
use std::fmt;

/// Identifier of a diagnostic entry, issued by the host's id registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Opaque identity of the subsystem that raised an entry.
///
/// Entries from different producers never share storage, even when they land
/// in the same context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProducerId(Cow<'static, str>);

impl ProducerId {
	/// Creates a producer identity from a static name.
	pub const fn from_static(name: &'static str) -> Self {
		Self(Cow::Borrowed(name))
	}

	/// Creates a producer identity from a runtime name (e.g. a plugin id).
	pub fn new(name: impl Into<String>) -> Self {
		Self(Cow::Owned(name.into()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ProducerId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&'static str> for ProducerId {
	fn from(name: &'static str) -> Self {
		Self::from_static(name)
	}
}
