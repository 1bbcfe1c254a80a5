//! Async media server client
//!
//! Talks to Logitech Media Server over its JSON-RPC endpoint. Every CLI
//! command is a `slim.request` whose params are `[playerid, [command...]]`;
//! server-wide queries use an empty player id.
//! Command reference: http://HOST:9000/html/docs/cli-api.html

use crate::core::config::SkillConfig;
use crate::core::error::{Result, SkillError};
use crate::core::types::{Player, PlayerSet};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

/// Maximum number of players requested from the server
const PLAYER_PAGE_SIZE: u32 = 100;

/// A CLI command addressed to one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    pub params: Vec<String>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, params: &[&str]) -> Self {
        Self {
            method: method.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// The command as the server expects it: method followed by its params
    pub fn command(&self) -> Vec<Value> {
        std::iter::once(&self.method)
            .chain(self.params.iter())
            .map(|s| Value::String(s.clone()))
            .collect()
    }
}

/// Acknowledgment of a remote method call
#[derive(Debug, Clone, PartialEq)]
pub struct CallReply {
    pub ok: bool,
    pub result: Value,
}

impl CallReply {
    pub fn success(result: Value) -> Self {
        Self { ok: true, result }
    }

    pub fn failure() -> Self {
        Self {
            ok: false,
            result: Value::Null,
        }
    }
}

/// The remote media server, as seen by the intent router
#[async_trait]
pub trait MediaServer: Send + Sync {
    /// Enumerate the players known to the server
    async fn get_players(&self) -> Result<PlayerSet>;

    /// Run one command on a player
    async fn call_method(&self, player: &Player, call: &MethodCall) -> Result<CallReply>;
}

/// JSON-RPC client for Logitech Media Server
pub struct LmsClient {
    client: Client,
    endpoint: String,
    username: Option<String>,
    password: Option<String>,
}

impl LmsClient {
    /// Create a client for the server described by `config`
    pub fn new(config: &SkillConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SkillError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one `slim.request` and return its `result` member
    async fn execute(&self, player_id: &str, command: Vec<Value>) -> std::result::Result<Value, String> {
        let body = json!({
            "id": 1,
            "method": "slim.request",
            "params": [player_id, command]
        });

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(&body);

        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await.map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("server returned {}", response.status()));
        }

        let data: Value = response.json().await.map_err(|e| e.to_string())?;
        rpc_result(data)
    }
}

#[async_trait]
impl MediaServer for LmsClient {
    async fn get_players(&self) -> Result<PlayerSet> {
        let command = vec![json!("players"), json!("0"), json!(PLAYER_PAGE_SIZE.to_string())];
        let result = self
            .execute("", command)
            .await
            .map_err(SkillError::UpstreamListFailure)?;

        let players = parse_players(&result);
        tracing::debug!("Server reported {} players", players.len());
        Ok(players)
    }

    async fn call_method(&self, player: &Player, call: &MethodCall) -> Result<CallReply> {
        tracing::debug!(player = %player.name, method = %call.method, params = ?call.params, "Calling player");

        let result = self
            .execute(player.id.as_str(), call.command())
            .await
            .map_err(SkillError::RemoteCallFailure)?;

        Ok(CallReply::success(result))
    }
}

/// Extract `result` from a JSON-RPC response, failing on a non-null `error`
fn rpc_result(data: Value) -> std::result::Result<Value, String> {
    if let Some(error) = data.get("error") {
        if !error.is_null() {
            return Err(format!("server error: {}", error));
        }
    }
    Ok(data.get("result").cloned().unwrap_or(Value::Null))
}

/// Read `players_loop` from a `players` query result
///
/// Entries without a player id cannot be addressed and are skipped.
fn parse_players(result: &Value) -> PlayerSet {
    let players = result
        .get("players_loop")
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|p| {
                    let id = p.get("playerid").and_then(|v| v.as_str())?;
                    let name = p.get("name").and_then(|v| v.as_str()).unwrap_or(id);
                    Some(Player::new(id, name))
                })
                .collect()
        })
        .unwrap_or_default();

    PlayerSet::new(players)
}
