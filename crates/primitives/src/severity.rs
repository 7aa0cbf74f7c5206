use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Diagnostic level of an entry.
///
/// Variants are declared in ascending order so `Ord` yields the "most severe"
/// aggregation directly: `None < Ok < Warn < Error`.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
	/// Non-diagnostic or system entry.
	#[default]
	None,
	Ok,
	Warn,
	Error,
}

impl Severity {
	/// Returns the worse of two severities.
	pub fn worst(self, other: Self) -> Self {
		self.max(other)
	}

	/// Returns true for levels that represent an actual issue.
	pub const fn is_issue(self) -> bool {
		matches!(self, Self::Warn | Self::Error)
	}
}

/// Display priority of an entry. Never part of the dedup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
	#[default]
	Default,
	/// Raised by the host itself rather than a content producer.
	System,
}
