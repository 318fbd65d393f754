//! Edit session: state machine plus the controller that drives it.
//!
//! - `state`: The pure state machine (`Idle`, `HasImage`, `Processing`, `Errored`).
//! - `controller`: Shared, lock-guarded session wired to an [`ImageEditor`](crate::gemini::ImageEditor).
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod controller;
pub mod state;

pub use controller::{HistoryItem, SessionController, SessionSnapshot};
pub use state::{Completion, EditHistoryEntry, EditSession, EditTicket, SessionState, SessionStatus};
