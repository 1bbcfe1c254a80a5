//! squeeze-voice - Entry Point
//!
//! Routes one voice intent request to the media server and prints the speech
//! response as JSON. The request is read from a file, from stdin, or built
//! from command-line flags.

use clap::Parser;
use squeeze_voice::command::IntentRouter;
use squeeze_voice::core::config::SkillConfig;
use squeeze_voice::core::error::{Result, SkillError};
use squeeze_voice::intent::{Intent, IntentRequest, Session, SessionAttributes};
use squeeze_voice::server::LmsClient;
use squeeze_voice::session::FilePlayerStore;

use std::io::{self, Read};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Voice intent router for Logitech Media Server players
#[derive(Parser, Debug)]
#[command(name = "squeeze-voice")]
#[command(about = "Route a voice intent to a media server player and print the spoken response")]
struct Args {
    /// TOML config file (defaults plus SQUEEZE_* environment variables if omitted)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Intent request JSON file, or - for stdin
    #[arg(long, short = 'r', conflicts_with = "intent", required_unless_present = "intent")]
    request: Option<String>,

    /// Intent name, e.g. PlayPlaylist or AMAZON.PauseIntent
    #[arg(long, short = 'i')]
    intent: Option<String>,

    /// Slot value as KEY=VALUE (repeatable)
    #[arg(long = "slot", short = 's', value_parser = parse_slot, requires = "intent")]
    slots: Vec<(String, String)>,

    /// Player remembered by the current dialogue session
    #[arg(long, requires = "intent")]
    session_player: Option<String>,

    /// Mark the request as the first of a new dialogue session
    #[arg(long, requires = "intent")]
    new_session: bool,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout only carries the response
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("squeeze_voice=info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => SkillConfig::load(path)?,
        None => SkillConfig::from_env()?,
    };
    tracing::debug!("Using media server at {}", config.endpoint());

    let request = read_request(&args)?;

    let server = LmsClient::new(&config)?;
    let store = FilePlayerStore::new(config.state_file.clone());
    let router = IntentRouter::new(server, store, config);

    let rt = Runtime::new()?;
    let envelope = rt.block_on(router.on_intent(request));

    let json = if args.pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    println!("{}", json);
    Ok(())
}

/// Load the request from --request, or build it from --intent and friends
fn read_request(args: &Args) -> Result<IntentRequest> {
    if let Some(source) = &args.request {
        let content = if source == "-" {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            std::fs::read_to_string(source)?
        };
        return Ok(serde_json::from_str(&content)?);
    }

    let name = args
        .intent
        .as_deref()
        .ok_or_else(|| SkillError::Config("either --request or --intent is required".into()))?;

    let intent = args
        .slots
        .iter()
        .fold(Intent::new(name), |intent, (key, value)| {
            intent.with_slot(key.as_str(), value.as_str())
        });

    Ok(IntentRequest {
        request_id: format!("cli.request.{}", Uuid::new_v4()),
        intent,
        session: Session {
            session_id: format!("cli.session.{}", Uuid::new_v4()),
            new: args.new_session,
            attributes: SessionAttributes {
                player: args.session_player.clone(),
            },
        },
    })
}

fn parse_slot(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty slot name in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}
