//! Intent routing - one voice request in, one speech response out
//!
//! IntentRequest -> IntentKind -> player list -> PlayerResolver ->
//! CommandExecutor -> ResponseEnvelope. Every failure along the way becomes
//! a spoken response; nothing is raised past `on_intent`.

use crate::command::executor::CommandExecutor;
use crate::command::resolver::PlayerResolver;
use crate::core::config::SkillConfig;
use crate::core::types::{Player, PlayerSet};
use crate::intent::{Intent, IntentKind, IntentRequest, Session};
use crate::server::{MediaServer, MethodCall};
use crate::session::PlayerStore;
use crate::speech::{build_speech_response, ResponseEnvelope, SpeechResponse};

const HELP_TEXT: &str = "You can ask me to play a playlist, genre, artist, album or song title, \
to pause, resume or stop, to skip tracks, to change the volume, to shuffle, or what is playing. \
Add a player name to control a specific player.";

const HELP_REPROMPT: &str = "What would you like to do?";

/// Routes intent requests to their handlers
pub struct IntentRouter<S, P> {
    server: S,
    store: P,
    config: SkillConfig,
}

impl<S: MediaServer, P: PlayerStore> IntentRouter<S, P> {
    pub fn new(server: S, store: P, config: SkillConfig) -> Self {
        Self {
            server,
            store,
            config,
        }
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// Handle one voice request
    pub async fn on_intent(&self, request: IntentRequest) -> ResponseEnvelope {
        let IntentRequest {
            request_id,
            intent,
            mut session,
        } = request;

        tracing::info!(
            request_id = %request_id,
            session_id = %session.session_id,
            intent = %intent.name,
            "Intent received"
        );

        let response = match intent.name.parse::<IntentKind>() {
            Ok(kind) => self.route(kind, &intent, &mut session).await,
            Err(e) => {
                tracing::warn!("Rejecting request: {}", e);
                build_speech_response("Invalid Request", &e.to_string(), None, session.new)
            }
        };

        ResponseEnvelope::new(session.attributes, response)
    }

    async fn route(&self, kind: IntentKind, intent: &Intent, session: &mut Session) -> SpeechResponse {
        if kind.is_local() {
            return local_response(kind);
        }

        // Every other request needs the player list
        let players = match self.server.get_players().await {
            Ok(players) => players,
            Err(e) => {
                tracing::warn!("Failed to get list of players: {}", e);
                return build_speech_response(
                    "Get Players",
                    "Failed to get list of players",
                    None,
                    true,
                );
            }
        };

        let last_used = self.last_used_player().await;
        self.dispatch_intent(kind, intent, session, &players, &last_used)
            .await
    }

    /// Dispatch an intent once the player list and remembered player are known
    async fn dispatch_intent(
        &self,
        kind: IntentKind,
        intent: &Intent,
        session: &mut Session,
        players: &PlayerSet,
        last_used: &str,
    ) -> SpeechResponse {
        tracing::debug!(?kind, slots = intent.slots.len(), "Dispatching intent");

        if kind.targets_player() {
            return self
                .dispatch_player_intent(kind, intent, session, players, last_used)
                .await;
        }

        match kind {
            IntentKind::Sync => self.sync_players(intent, session, players, last_used).await,
            IntentKind::NamePlayers => {
                build_speech_response("Name Players", &describe_players(players), None, false)
            }
            _ => local_response(kind),
        }
    }

    /// Intents that target one player named in the request or remembered
    async fn dispatch_player_intent(
        &self,
        kind: IntentKind,
        intent: &Intent,
        session: &mut Session,
        players: &PlayerSet,
        last_used: &str,
    ) -> SpeechResponse {
        let requested = requested_player(intent, session);

        let Some(found) = PlayerResolver::new(players).resolve(&requested, last_used) else {
            tracing::info!("Player not found: {:?}", requested);
            return build_speech_response(&intent.name, "Player not found", None, session.new);
        };

        tracing::info!(player = %found.player, reason = ?found.match_reason, "Player resolved");
        self.remember(session, found.player).await;

        let result =
            CommandExecutor::execute(&self.server, &self.config, kind, intent, found.player).await;
        build_speech_response(&result.title, &result.text, None, false)
    }

    /// Sync the requested (or remembered) player with `OtherPlayer`
    async fn sync_players(
        &self,
        intent: &Intent,
        session: &mut Session,
        players: &PlayerSet,
        last_used: &str,
    ) -> SpeechResponse {
        const TITLE: &str = "Sync Players";

        let requested = requested_player(intent, session);
        let target = PlayerResolver::new(players)
            .resolve(&requested, last_used)
            .map(|m| m.player);
        let other = intent
            .slot("OtherPlayer")
            .and_then(|name| players.find_by_name(&name));

        let (Some(target), Some(other)) = (target, other) else {
            return build_speech_response(TITLE, "Player not found", None, session.new);
        };

        if target.id == other.id {
            let text = format!("Cannot sync {} with itself", target.name);
            return build_speech_response(TITLE, &text, None, false);
        }

        self.remember(session, target).await;

        let call = MethodCall::new("sync", &[other.id.as_str()]);
        let text = match self.server.call_method(target, &call).await {
            Ok(reply) if reply.ok => format!("Synced {} with {}", other.name, target.name),
            Ok(_) | Err(_) => {
                tracing::warn!("Failed to sync {} with {}", other.name, target.name);
                format!("Failed to sync {} with {}", other.name, target.name)
            }
        };
        build_speech_response(TITLE, &text, None, false)
    }

    /// Remembered player name, empty when nothing usable is stored
    async fn last_used_player(&self) -> String {
        match self.store.retrieve().await {
            Ok(Some(name)) => name,
            Ok(None) => String::new(),
            Err(e) => {
                tracing::warn!("Could not retrieve last used player: {}", e);
                String::new()
            }
        }
    }

    /// Make `player` the last used player for this session and later ones
    async fn remember(&self, session: &mut Session, player: &Player) {
        let name = player.name.to_lowercase();
        session.attributes.player = Some(name.clone());

        if let Err(e) = self.store.store(&name).await {
            tracing::warn!("Could not persist last used player {}: {}", name, e);
        }
    }
}

/// Responses for intents that never reach the server
fn local_response(kind: IntentKind) -> SpeechResponse {
    match kind {
        IntentKind::Help => build_speech_response("Help", HELP_TEXT, Some(HELP_REPROMPT), false),
        _ => build_speech_response("Close", "Goodbye.", None, true),
    }
}

/// Player name from the `Player` slot, else from the session
fn requested_player(intent: &Intent, session: &Session) -> String {
    intent
        .slot("Player")
        .or_else(|| session.attributes.player.clone())
        .unwrap_or_default()
}

fn describe_players(players: &PlayerSet) -> String {
    let names = players.names();
    match names.as_slice() {
        [] => "No players were found".to_string(),
        [only] => format!("You have one player: {}", only),
        [rest @ .., last] => format!(
            "You have {} players: {} and {}",
            names.len(),
            rest.join(", "),
            last
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{Result, SkillError};
    use crate::intent::SessionAttributes;
    use crate::server::CallReply;
    use crate::session::MemoryPlayerStore;
    use async_trait::async_trait;

    struct OfflineServer;

    #[async_trait]
    impl MediaServer for OfflineServer {
        async fn get_players(&self) -> Result<PlayerSet> {
            Err(SkillError::UpstreamListFailure("offline".into()))
        }

        async fn call_method(&self, _player: &Player, _call: &MethodCall) -> Result<CallReply> {
            Err(SkillError::RemoteCallFailure("offline".into()))
        }
    }

    fn offline_router() -> IntentRouter<OfflineServer, MemoryPlayerStore> {
        IntentRouter::new(OfflineServer, MemoryPlayerStore::new(), SkillConfig::default())
    }

    #[tokio::test]
    async fn test_dispatch_keeps_local_intents_local() {
        let router = offline_router();
        let players = PlayerSet::new(vec![Player::new("a", "Kitchen")]);
        let mut session = Session::default();

        let help = router
            .dispatch_intent(
                IntentKind::Help,
                &Intent::new("AMAZON.HelpIntent"),
                &mut session,
                &players,
                "",
            )
            .await;
        assert_eq!(help.title(), "Help");
        assert!(!help.should_end_session);

        let close = router
            .dispatch_intent(IntentKind::Close, &Intent::new("Close"), &mut session, &players, "")
            .await;
        assert_eq!(close.text(), "Goodbye.");
        assert!(close.should_end_session);

        let names = router
            .dispatch_intent(
                IntentKind::NamePlayers,
                &Intent::new("NamePlayers"),
                &mut session,
                &players,
                "",
            )
            .await;
        assert_eq!(names.title(), "Name Players");
        assert_eq!(names.text(), "You have one player: Kitchen");
    }

    #[test]
    fn test_describe_players() {
        assert_eq!(describe_players(&PlayerSet::default()), "No players were found");

        let one = PlayerSet::new(vec![Player::new("a", "Kitchen")]);
        assert_eq!(describe_players(&one), "You have one player: Kitchen");

        let three = PlayerSet::new(vec![
            Player::new("a", "Kitchen"),
            Player::new("b", "Study"),
            Player::new("c", "Bedroom"),
        ]);
        assert_eq!(
            describe_players(&three),
            "You have 3 players: Kitchen, Study and Bedroom"
        );
    }

    #[test]
    fn test_requested_player_prefers_slot() {
        let session = Session {
            attributes: SessionAttributes {
                player: Some("kitchen".into()),
            },
            ..Session::default()
        };

        let intent = Intent::new("AMAZON.PauseIntent").with_slot("Player", "Study");
        assert_eq!(requested_player(&intent, &session), "Study");

        let intent = Intent::new("AMAZON.PauseIntent");
        assert_eq!(requested_player(&intent, &session), "kitchen");

        assert_eq!(requested_player(&intent, &Session::default()), "");
    }
}
