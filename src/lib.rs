//! squeeze-voice - Voice intent router for Logitech Media Server players

pub mod command;
pub mod core;
pub mod intent;
pub mod server;
pub mod session;
pub mod speech;
