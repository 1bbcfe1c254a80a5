//! Static mapping from intent names to actions

use crate::core::error::SkillError;
use std::str::FromStr;

/// Actions the skill knows how to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    /// End the dialogue
    Close,
    /// Explain what can be said
    Help,
    /// List the players on the server
    NamePlayers,
    /// Sync one player to another
    Sync,
    Pause,
    Resume,
    Stop,
    /// Loop the current playlist on or off
    Repeat { on: bool },
    /// Repeat the current track (not supported by the server CLI)
    RepeatTrack,
    NextTrack,
    PreviousTrack,
    Shuffle { on: bool },
    /// Start playback, or a random mix when configured
    Start,
    Randomize,
    /// Play a playlist, genre, artist, album or title
    PlayPlaylist,
    Unsync,
    SetVolume,
    /// Relative volume change in percent
    ChangeVolume { delta: i32 },
    WhatsPlaying,
    /// Remember a player for the following requests
    Select,
}

/// Volume step for increase/decrease requests
pub const VOLUME_STEP: i32 = 10;

impl IntentKind {
    /// Map an intent name to its action, `None` for unknown names
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "Close" => Self::Close,
            "AMAZON.HelpIntent" => Self::Help,
            "NamePlayers" => Self::NamePlayers,
            "SyncPlayers" => Self::Sync,
            "AMAZON.PauseIntent" => Self::Pause,
            "AMAZON.ResumeIntent" => Self::Resume,
            "AMAZON.StopIntent" | "AMAZON.CancelIntent" | "StopPlayer" => Self::Stop,
            "AMAZON.LoopOnIntent" => Self::Repeat { on: true },
            "AMAZON.LoopOffIntent" => Self::Repeat { on: false },
            "AMAZON.RepeatIntent" => Self::RepeatTrack,
            "AMAZON.NextIntent" | "NextTrack" => Self::NextTrack,
            "AMAZON.PreviousIntent" | "AMAZON.StartOverIntent" | "PreviousTrack" => {
                Self::PreviousTrack
            }
            "AMAZON.ShuffleOnIntent" => Self::Shuffle { on: true },
            "AMAZON.ShuffleOffIntent" => Self::Shuffle { on: false },
            "StartPlayer" => Self::Start,
            "RandomizePlayer" => Self::Randomize,
            "PlayPlaylist" => Self::PlayPlaylist,
            "UnsyncPlayer" => Self::Unsync,
            "SetVolume" => Self::SetVolume,
            "IncreaseVolume" => Self::ChangeVolume { delta: VOLUME_STEP },
            "DecreaseVolume" => Self::ChangeVolume { delta: -VOLUME_STEP },
            "WhatsPlaying" => Self::WhatsPlaying,
            "SelectPlayer" => Self::Select,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether the action runs before the server is contacted
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Close | Self::Help)
    }

    /// Whether the action targets a single resolved player
    pub fn targets_player(&self) -> bool {
        !matches!(
            self,
            Self::Close | Self::Help | Self::NamePlayers | Self::Sync
        )
    }
}

impl FromStr for IntentKind {
    type Err = SkillError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_name(name).ok_or_else(|| SkillError::UnknownIntent(name.to_string()))
    }
}
