//! Remote media server access

pub mod client;

pub use client::{CallReply, LmsClient, MediaServer, MethodCall};
