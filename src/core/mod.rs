pub mod config;
pub mod error;
pub mod text;
pub mod types;

pub use config::SkillConfig;
pub use error::{Result, SkillError};
