//! Command pipeline
//!
//! Turns an IntentRequest into a spoken response:
//! IntentRequest -> IntentRouter -> PlayerResolver -> CommandExecutor -> ResponseEnvelope

pub mod executor;
pub mod playlist;
pub mod resolver;
pub mod router;

pub use executor::{CommandExecutor, ExecutionResult};
pub use playlist::{build_query, PlaylistQuery, PlaylistSlots};
pub use resolver::{MatchReason, PlayerMatch, PlayerResolver};
pub use router::IntentRouter;
