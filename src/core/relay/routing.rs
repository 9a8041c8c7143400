//! Protocol translation between the two channels of a relay session.
//!
//! Both directions are pure functions from a parsed inbound event to the
//! single action it causes, so the session loops only perform I/O.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use crate::core::convai::messages::{AudioEvent, PingEvent};
use crate::core::convai::{ConvaiClientEvent, ConvaiServerEvent};
use crate::core::telephony::messages::{OutboundMedia, StreamStart};
use crate::core::telephony::{MediaStreamCommand, MediaStreamEvent};
use crate::errors::relay_error::RelayResult;

/// Decoding rules for caller audio: padding optional, stray trailing bits
/// tolerated
const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// What an inbound Conversational AI event asks the session to do
#[derive(Debug, Clone, PartialEq)]
pub enum ConvaiAction {
    /// Send a command to Twilio
    ToMedia(MediaStreamCommand),
    /// Reply on the Conversational AI channel
    ToConvai(ConvaiClientEvent),
    Nothing,
}

/// What an inbound Twilio event asks the session to do
#[derive(Debug, Clone, PartialEq)]
pub enum MediaAction {
    /// Remember the stream identifier for outbound frames
    StreamStarted(StreamStart),
    /// Forward caller audio to the agent, if its channel is open
    ForwardAudio(ConvaiClientEvent),
    /// Close the Conversational AI channel
    CloseConvai,
    /// Log and move on
    Ignore(&'static str),
}

/// Translate a Conversational AI event.
///
/// `stream_sid` is the identifier known at the time the event is handled. It
/// may still be unset when the agent speaks before Twilio's `start` arrives;
/// the frame is sent anyway with a `null` identifier.
pub fn route_convai_event(event: ConvaiServerEvent, stream_sid: Option<String>) -> ConvaiAction {
    match event {
        ConvaiServerEvent::ConversationInitiationMetadata {
            conversation_initiation_metadata_event,
        } => {
            let metadata = conversation_initiation_metadata_event.unwrap_or_default();
            info!(
                conversation_id = ?metadata.conversation_id,
                agent_output_audio_format = ?metadata.agent_output_audio_format,
                user_input_audio_format = ?metadata.user_input_audio_format,
                "[II] Received conversation initiation metadata."
            );
            ConvaiAction::Nothing
        }

        ConvaiServerEvent::Audio {
            audio_event:
                Some(AudioEvent {
                    audio_base_64: Some(payload),
                    ..
                }),
        } if !payload.is_empty() => ConvaiAction::ToMedia(MediaStreamCommand::Media {
            stream_sid,
            media: OutboundMedia { payload },
        }),

        ConvaiServerEvent::Audio { .. } => {
            debug!("[II] Audio event without payload");
            ConvaiAction::Nothing
        }

        ConvaiServerEvent::Interruption { .. } => {
            ConvaiAction::ToMedia(MediaStreamCommand::Clear { stream_sid })
        }

        ConvaiServerEvent::Ping {
            ping_event:
                Some(PingEvent {
                    event_id: Some(event_id),
                    ..
                }),
        } if is_present_id(&event_id) => {
            ConvaiAction::ToConvai(ConvaiClientEvent::pong(event_id))
        }

        ConvaiServerEvent::Ping { .. } => {
            debug!("[II] Ping without event id, not answering");
            ConvaiAction::Nothing
        }

        ConvaiServerEvent::UserTranscript {
            user_transcription_event,
        } => {
            debug!(
                transcript = ?user_transcription_event.and_then(|e| e.user_transcript),
                "[II] User transcript"
            );
            ConvaiAction::Nothing
        }

        ConvaiServerEvent::AgentResponse {
            agent_response_event,
        } => {
            debug!(
                response = ?agent_response_event.and_then(|e| e.agent_response),
                "[II] Agent response"
            );
            ConvaiAction::Nothing
        }

        ConvaiServerEvent::Unknown => ConvaiAction::Nothing,
    }
}

/// Translate a Twilio media stream event.
///
/// # Errors
/// Returns an error when a `media` payload is not valid base64.
pub fn route_media_event(event: MediaStreamEvent) -> RelayResult<MediaAction> {
    let action = match event {
        MediaStreamEvent::Start { start } => MediaAction::StreamStarted(start),
        MediaStreamEvent::Media { media } => {
            let audio = decode_caller_audio(&media.payload)?;
            MediaAction::ForwardAudio(ConvaiClientEvent::user_audio_chunk(
                BASE64_STANDARD.encode(audio),
            ))
        }
        MediaStreamEvent::Stop => MediaAction::CloseConvai,
        event @ (MediaStreamEvent::Connected { .. }
        | MediaStreamEvent::Mark
        | MediaStreamEvent::Dtmf
        | MediaStreamEvent::Unknown) => MediaAction::Ignore(event.name()),
    };
    Ok(action)
}

/// Decode a Twilio audio payload, accepting unpadded, whitespace-split and
/// URL-safe base64.
fn decode_caller_audio(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: Vec<u8> = payload
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    LENIENT_STANDARD
        .decode(&compact)
        .or_else(|e| LENIENT_URL_SAFE.decode(&compact).map_err(|_| e))
}

/// Ping ids of `null`, `false`, `0` or `""` are treated as missing.
fn is_present_id(event_id: &Value) -> bool {
    match event_id {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
