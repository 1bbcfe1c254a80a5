//! Cross-session state

pub mod persist;

pub use persist::{FilePlayerStore, MemoryPlayerStore, PlayerStore};
