//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Server-assigned player identifier (usually the device MAC address)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A player device known to the media server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PlayerId(id.into()),
            name: name.into(),
        }
    }

    /// Players are identified by name, ignoring case
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Players as reported by the server, in server order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSet(Vec<Player>);

impl PlayerSet {
    pub fn new(players: Vec<Player>) -> Self {
        Self(players)
    }

    /// First player whose name matches `name` case-insensitively
    pub fn find_by_name(&self, name: &str) -> Option<&Player> {
        self.0.iter().find(|p| p.is_named(name))
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Player>> for PlayerSet {
    fn from(players: Vec<Player>) -> Self {
        Self(players)
    }
}

impl<'a> IntoIterator for &'a PlayerSet {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
