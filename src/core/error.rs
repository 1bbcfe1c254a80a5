use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillError {
    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Failed to get list of players: {0}")]
    UpstreamListFailure(String),

    #[error("Remote call failed: {0}")]
    RemoteCallFailure(String),

    #[error("{0} is not a valid request")]
    UnknownIntent(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Persistence error: {0}")]
    Persist(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SkillError>;
