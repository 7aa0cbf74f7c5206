//! Core diagnostic vocabulary shared by the console engine and its producers.

/// Host contexts and query scopes.
pub mod context;
/// Entry and producer identifiers.
pub mod ids;
/// Ordered severity levels and entry priority.
pub mod severity;

pub use context::{Context, ParseContextError, Scope};
pub use ids::{EntryId, ProducerId};
pub use severity::{Priority, Severity};
