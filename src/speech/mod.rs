//! Speech responses returned to the voice platform

use crate::intent::SessionAttributes;
use serde::{Deserialize, Serialize};

/// Response format version understood by the platform
pub const RESPONSE_VERSION: &str = "1.0";

/// Top-level response: the speech plus the attributes for the next turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    pub session_attributes: SessionAttributes,
    pub response: SpeechResponse,
}

impl ResponseEnvelope {
    pub fn new(session_attributes: SessionAttributes, response: SpeechResponse) -> Self {
        Self {
            version: RESPONSE_VERSION.to_string(),
            session_attributes,
            response,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechResponse {
    pub output_speech: OutputSpeech,
    pub card: Card,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

impl SpeechResponse {
    /// The spoken text
    pub fn text(&self) -> &str {
        &self.output_speech.text
    }

    pub fn title(&self) -> &str {
        &self.card.title
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: "PlainText".into(),
            text: text.into(),
        }
    }
}

/// Card shown in the companion app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// Build a plain-text speech response with a matching simple card
pub fn build_speech_response(
    title: &str,
    text: &str,
    reprompt: Option<&str>,
    should_end_session: bool,
) -> SpeechResponse {
    SpeechResponse {
        output_speech: OutputSpeech::plain(text),
        card: Card {
            kind: "Simple".into(),
            title: title.to_string(),
            content: text.to_string(),
        },
        reprompt: reprompt.map(|r| Reprompt {
            output_speech: OutputSpeech::plain(r),
        }),
        should_end_session,
    }
}
