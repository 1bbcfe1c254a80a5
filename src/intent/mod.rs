//! Incoming voice requests
//!
//! IntentRequest (envelope) -> IntentKind (static action mapping)

pub mod envelope;
pub mod kind;

pub use envelope::{Intent, IntentRequest, Session, SessionAttributes, Slot};
pub use kind::IntentKind;
