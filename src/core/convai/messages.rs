//! ElevenLabs Conversational AI WebSocket message types.
//!
//! All events are JSON-encoded text frames.
//!
//! # Protocol Overview
//!
//! Server events (received from the agent):
//! - conversation_initiation_metadata - Conversation established
//! - audio - Agent speech chunk (base64)
//! - interruption - User barged in, pending playback must be dropped
//! - ping - Keep-alive, must be answered with a pong
//! - user_transcript - Transcription of the caller
//! - agent_response - Text of the agent reply
//!
//! Client events (sent to the agent):
//! - user_audio_chunk - Caller audio chunk (base64)
//! - pong - Keep-alive reply

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Server Events
// =============================================================================

/// Events received from the Conversational AI service.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvaiServerEvent {
    ConversationInitiationMetadata {
        #[serde(default)]
        conversation_initiation_metadata_event: Option<InitiationMetadata>,
    },

    Audio {
        #[serde(default)]
        audio_event: Option<AudioEvent>,
    },

    Interruption {
        #[serde(default)]
        interruption_event: Option<Value>,
    },

    Ping {
        #[serde(default)]
        ping_event: Option<PingEvent>,
    },

    UserTranscript {
        #[serde(default)]
        user_transcription_event: Option<UserTranscriptionEvent>,
    },

    AgentResponse {
        #[serde(default)]
        agent_response_event: Option<AgentResponseEvent>,
    },

    /// Any event type this bridge has no use for
    #[serde(other)]
    Unknown,
}

impl ConvaiServerEvent {
    /// Event type name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConversationInitiationMetadata { .. } => "conversation_initiation_metadata",
            Self::Audio { .. } => "audio",
            Self::Interruption { .. } => "interruption",
            Self::Ping { .. } => "ping",
            Self::UserTranscript { .. } => "user_transcript",
            Self::AgentResponse { .. } => "agent_response",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct InitiationMetadata {
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub agent_output_audio_format: Option<String>,
    #[serde(default)]
    pub user_input_audio_format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AudioEvent {
    /// Base64 encoded audio, passed through untouched
    #[serde(default)]
    pub audio_base_64: Option<String>,
    #[serde(default)]
    pub event_id: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PingEvent {
    /// Identifier that must be echoed in the pong. A JSON `null` counts as absent.
    #[serde(default)]
    pub event_id: Option<Value>,
    #[serde(default)]
    pub ping_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UserTranscriptionEvent {
    #[serde(default)]
    pub user_transcript: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AgentResponseEvent {
    #[serde(default)]
    pub agent_response: Option<String>,
}

// =============================================================================
// Client Events
// =============================================================================

/// Events sent to the Conversational AI service.
///
/// Audio chunks carry no `type` discriminant on the wire, hence `untagged`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ConvaiClientEvent {
    UserAudioChunk {
        user_audio_chunk: String,
    },
    Pong {
        #[serde(rename = "type")]
        event_type: &'static str,
        event_id: Value,
    },
}

impl ConvaiClientEvent {
    pub fn user_audio_chunk(audio_base64: impl Into<String>) -> Self {
        Self::UserAudioChunk {
            user_audio_chunk: audio_base64.into(),
        }
    }

    pub fn pong(event_id: Value) -> Self {
        Self::Pong {
            event_type: "pong",
            event_id,
        }
    }
}
