//! Worker primitives for diagnostic producers.
//!
//! Producers that run expensive validation off the control thread use these
//! helpers to spawn their work and to observe cooperative cancellation. The
//! console itself never runs here; results always travel back to the control
//! thread before they touch the store.

mod spawn;
mod token;

pub use spawn::spawn_blocking;
pub use token::{CancelToken, GenerationClock, TokenSlot};
