//! Context-scoped diagnostics console.
//!
//! Producers (validators, services, the host itself) raise [`Entry`] values
//! into a [`Console`]. Entries are partitioned by [`Context`] and producer,
//! deduplicated on their content, and cleared either unconditionally or
//! through the [`ResolutionPolicy`] each producer attaches.
//!
//! The console is single-threaded. Producers that sweep off the control
//! thread go through [`Sweep`], which hands entries back over a channel the
//! console drains with [`Console::drain_handoffs`].
//!
//! [`Context`]: vigil_primitives::Context

pub mod activation;
pub mod config;
mod console;
pub mod entry;
pub mod error;
pub mod host;
pub mod policy;
pub mod selection;
pub mod slots;
pub mod store;
pub mod sweep;
#[cfg(test)]
mod test_host;

pub use activation::ContextTracker;
pub use config::{ConfigError, ConsoleConfig};
pub use console::Console;
pub use entry::{Entry, EntryBuilder, EntryHandle, EntryKey, UserData};
pub use error::{ConsoleError, Result};
pub use host::{ConsoleHost, IdRegistry, SequentialIds};
pub use policy::{Always, ContextualFocus, ErrorService, LockAware, ResolutionPolicy};
pub use selection::{SelectOutcome, SelectionController};
pub use slots::{SlotKey, SlotStore};
pub use store::{DiagnosticsStore, LogOutcome};
pub use sweep::{Handoff, HandoffAction, HandoffQueue, Sweep, SweepReport};
#[cfg(test)]
use tracing_subscriber as _;
