use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};
use thiserror::Error;

/// Major host mode an entry belongs to.
///
/// Every stored entry lives in exactly one context. Queries spanning all of
/// them go through [`Scope::All`], which has no storage representation.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Context {
	/// Landing context; the permanent default tab.
	#[default]
	Home,
	/// Ability and data authoring.
	Creator,
	Analytics,
	Develop,
	/// Validation sweeps and their reports.
	Validate,
	Settings,
}

impl Context {
	/// Returns every storage context in declaration order.
	pub fn all() -> impl Iterator<Item = Context> {
		Self::iter()
	}
}

/// Error returned when a context name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown context: {0}")]
pub struct ParseContextError(pub String);

impl FromStr for Context {
	type Err = ParseContextError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::iter()
			.find(|ctx| ctx.as_ref().eq_ignore_ascii_case(s))
			.ok_or_else(|| ParseContextError(s.to_string()))
	}
}

/// Query scope over the diagnostics store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
	/// Every context.
	#[default]
	All,
	/// A single context.
	Only(Context),
}

impl Scope {
	/// Returns true when `context` falls inside this scope.
	pub fn contains(self, context: Context) -> bool {
		match self {
			Self::All => true,
			Self::Only(only) => only == context,
		}
	}
}

impl From<Context> for Scope {
	fn from(context: Context) -> Self {
		Self::Only(context)
	}
}
