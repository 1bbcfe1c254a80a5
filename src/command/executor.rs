//! Command execution - runs a player-targeting intent against the server
//!
//! Each intent is first planned (pure: which command, which sentences), then
//! executed with at most one remote call. Failures never retry.

use crate::command::playlist::{self, PlaylistSlots};
use crate::core::config::SkillConfig;
use crate::core::types::Player;
use crate::intent::{Intent, IntentKind};
use crate::server::{MediaServer, MethodCall};
use serde_json::Value;

/// Executes intents on a resolved player
pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute `kind` on `player`, returning the sentence to speak
    pub async fn execute(
        server: &dyn MediaServer,
        config: &SkillConfig,
        kind: IntentKind,
        intent: &Intent,
        player: &Player,
    ) -> ExecutionResult {
        match plan(kind, intent, player, config) {
            Plan::Reply { title, text } => ExecutionResult {
                title,
                text,
                acknowledged: None,
            },
            Plan::Call {
                title,
                call,
                success,
                failure,
            } => {
                let acknowledged = call_player(server, player, &call).await.is_some();
                let text = if acknowledged { success } else { failure };
                ExecutionResult {
                    title,
                    text,
                    acknowledged: Some(acknowledged),
                }
            }
            Plan::PlayPlaylist { call, confirmation } => {
                let acknowledged = call_player(server, player, &call).await.is_some();
                ExecutionResult {
                    title: "Play Playlist".into(),
                    text: playlist::reply_text(acknowledged, &confirmation),
                    acknowledged: Some(acknowledged),
                }
            }
            Plan::WhatsPlaying { call } => {
                let reply = call_player(server, player, &call).await;
                let text = match &reply {
                    Some(result) => describe_now_playing(result, &player.name),
                    None => format!("Failed to get the current song on {}", player.name),
                };
                ExecutionResult {
                    title: "Whats Playing".into(),
                    text,
                    acknowledged: Some(reply.is_some()),
                }
            }
        }
    }
}

/// Result of executing a command
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub title: String,
    pub text: String,
    /// Whether the server acknowledged the command; `None` when none was sent
    pub acknowledged: Option<bool>,
}

/// What an intent will do, decided before anything is sent
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// Answer without contacting the server
    Reply { title: String, text: String },
    /// Send one command and pick a sentence by its outcome
    Call {
        title: String,
        call: MethodCall,
        success: String,
        failure: String,
    },
    PlayPlaylist { call: MethodCall, confirmation: String },
    WhatsPlaying { call: MethodCall },
}

/// Plan a player-targeting intent
pub fn plan(kind: IntentKind, intent: &Intent, player: &Player, config: &SkillConfig) -> Plan {
    let name = &player.name;

    match kind {
        IntentKind::Pause => simple(
            "Pause Player",
            MethodCall::new("pause", &["1"]),
            format!("Paused {}", name),
            format!("Failed to pause {}", name),
        ),
        IntentKind::Resume => simple(
            "Resume Player",
            MethodCall::new("pause", &["0"]),
            format!("Resumed {}", name),
            format!("Failed to resume {}", name),
        ),
        IntentKind::Stop => simple(
            "Stop Player",
            MethodCall::new("stop", &[]),
            format!("Stopped {}", name),
            format!("Failed to stop {}", name),
        ),
        IntentKind::Repeat { on } => simple(
            "Repeat",
            MethodCall::new("playlist", &["repeat", if on { "2" } else { "0" }]),
            format!("Repeat turned {} for {}", on_off(on), name),
            format!("Failed to change repeat on {}", name),
        ),
        IntentKind::RepeatTrack => Plan::Reply {
            title: "Repeat".into(),
            text: "Repeating the current track is not supported".into(),
        },
        IntentKind::NextTrack => simple(
            "Next Track",
            MethodCall::new("playlist", &["index", "+1"]),
            format!("Skipped to the next track on {}", name),
            format!("Failed to skip to the next track on {}", name),
        ),
        IntentKind::PreviousTrack => simple(
            "Previous Track",
            MethodCall::new("playlist", &["index", "-1"]),
            format!("Went back to the previous track on {}", name),
            format!("Failed to go back to the previous track on {}", name),
        ),
        IntentKind::Shuffle { on } => simple(
            "Shuffle",
            MethodCall::new("playlist", &["shuffle", if on { "1" } else { "0" }]),
            format!("Shuffle turned {} for {}", on_off(on), name),
            format!("Failed to change shuffle on {}", name),
        ),
        IntentKind::Start if config.randomize_on_play => randomize(name),
        IntentKind::Start => simple(
            "Start Player",
            MethodCall::new("play", &[]),
            format!("Playing {}", name),
            format!("Failed to start {}", name),
        ),
        IntentKind::Randomize => randomize(name),
        IntentKind::PlayPlaylist => {
            let (query, confirmation) = playlist::build_query(&PlaylistSlots::from_intent(intent));
            Plan::PlayPlaylist {
                call: query.method_call(),
                confirmation,
            }
        }
        IntentKind::Unsync => simple(
            "Unsync Player",
            MethodCall::new("sync", &["-"]),
            format!("Unsynced {}", name),
            format!("Failed to unsync {}", name),
        ),
        IntentKind::SetVolume => match parse_volume(intent.slot("Volume").as_deref()) {
            Some(volume) => {
                let level = volume.to_string();
                simple(
                    "Set Volume",
                    MethodCall::new("mixer", &["volume", level.as_str()]),
                    format!("Volume set to {} on {}", volume, name),
                    format!("Failed to set the volume on {}", name),
                )
            }
            None => Plan::Reply {
                title: "Set Volume".into(),
                text: "Volume must be a number between 0 and 100".into(),
            },
        },
        IntentKind::ChangeVolume { delta } => {
            let step = format!("{:+}", delta);
            let (title, verb) = if delta >= 0 {
                ("Increase Volume", "increased")
            } else {
                ("Decrease Volume", "decreased")
            };
            simple(
                title,
                MethodCall::new("mixer", &["volume", step.as_str()]),
                format!("Volume {} on {}", verb, name),
                format!("Failed to change the volume on {}", name),
            )
        }
        IntentKind::WhatsPlaying => Plan::WhatsPlaying {
            call: MethodCall::new("status", &["-", "1", "tags:al"]),
        },
        IntentKind::Select => Plan::Reply {
            title: "Select Player".into(),
            text: format!("Selected player {}", name),
        },
        IntentKind::Close | IntentKind::Help | IntentKind::NamePlayers | IntentKind::Sync => {
            // Routed before a single player is resolved
            Plan::Reply {
                title: "Invalid Request".into(),
                text: format!("{} is not a valid request", intent.name),
            }
        }
    }
}

fn simple(title: &str, call: MethodCall, success: String, failure: String) -> Plan {
    Plan::Call {
        title: title.to_string(),
        call,
        success,
        failure,
    }
}

fn randomize(name: &str) -> Plan {
    simple(
        "Randomize Player",
        MethodCall::new("randomplay", &["tracks"]),
        format!("Playing a random mix on {}", name),
        format!("Failed to start a random mix on {}", name),
    )
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

/// Parse a spoken volume level, accepting whole numbers from 0 to 100
fn parse_volume(value: Option<&str>) -> Option<u8> {
    let volume: f64 = value?.trim().parse().ok()?;
    if volume.is_finite() && (0.0..=100.0).contains(&volume) {
        Some(volume.round() as u8)
    } else {
        None
    }
}

/// Issue one command; `Some(result)` only when the server acknowledged it
async fn call_player(server: &dyn MediaServer, player: &Player, call: &MethodCall) -> Option<Value> {
    match server.call_method(player, call).await {
        Ok(reply) if reply.ok => Some(reply.result),
        Ok(_) => {
            tracing::warn!(player = %player.name, method = %call.method, "Server rejected command");
            None
        }
        Err(e) => {
            tracing::warn!(player = %player.name, method = %call.method, "Remote call failed: {}", e);
            None
        }
    }
}

/// Sentence for a `status` query result
fn describe_now_playing(result: &Value, player_name: &str) -> String {
    match result.get("mode").and_then(|v| v.as_str()) {
        Some("play") => {}
        Some("pause") => return format!("{} is paused", player_name),
        _ => return format!("Nothing is playing on {}", player_name),
    }

    let track = result
        .get("playlist_loop")
        .and_then(|v| v.as_array())
        .and_then(|tracks| tracks.first());

    match (track_field(track, "title"), track_field(track, "artist")) {
        (Some(title), Some(artist)) => format!("Now playing {} by {}", title, artist),
        (Some(title), None) => format!("Now playing {}", title),
        _ => format!("Nothing is playing on {}", player_name),
    }
}

fn track_field<'a>(track: Option<&'a Value>, name: &str) -> Option<&'a str> {
    track
        .and_then(|t| t.get(name))
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
