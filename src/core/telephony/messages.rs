//! Twilio Media Streams WebSocket message types.
//!
//! Inbound events are tagged by an `event` field:
//! - connected - Socket established, sent before `start`
//! - start - Stream metadata, carries the `streamSid`
//! - media - Caller audio chunk (base64 μ-law 8kHz)
//! - mark - Playback reached a previously sent mark
//! - dtmf - Keypad digit pressed
//! - stop - Stream ended
//!
//! Outbound commands are `media` (agent audio) and `clear` (flush playback).

use serde::{Deserialize, Serialize};

// =============================================================================
// Inbound Events (Twilio -> Bridge)
// =============================================================================

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MediaStreamEvent {
    Connected {
        #[serde(default)]
        protocol: Option<String>,
        #[serde(default)]
        version: Option<String>,
    },

    Start { start: StreamStart },

    Media { media: MediaChunk },

    Mark,

    Dtmf,

    Stop,

    #[serde(other)]
    Unknown,
}

impl MediaStreamEvent {
    /// Event name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::Start { .. } => "start",
            Self::Media { .. } => "media",
            Self::Mark => "mark",
            Self::Dtmf => "dtmf",
            Self::Stop => "stop",
            Self::Unknown => "unknown",
        }
    }
}

/// Payload of the `start` event
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamStart {
    pub stream_sid: String,
    #[serde(default)]
    pub call_sid: Option<String>,
    #[serde(default)]
    pub account_sid: Option<String>,
    #[serde(default)]
    pub media_format: Option<MediaFormat>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaFormat {
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub sample_rate: Option<u32>,
    #[serde(default)]
    pub channels: Option<u16>,
}

/// Payload of the `media` event
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MediaChunk {
    /// Base64 encoded audio
    pub payload: String,
    #[serde(default)]
    pub track: Option<String>,
}

// =============================================================================
// Outbound Commands (Bridge -> Twilio)
// =============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MediaStreamCommand {
    /// Queue agent audio for playback
    Media {
        /// `null` until the stream has started
        #[serde(rename = "streamSid")]
        stream_sid: Option<String>,
        media: OutboundMedia,
    },

    /// Drop all audio queued for playback
    Clear {
        #[serde(rename = "streamSid")]
        stream_sid: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutboundMedia {
    pub payload: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_start_event() {
        let event: MediaStreamEvent = serde_json::from_str(
            r#"{
                "event": "start",
                "sequenceNumber": "1",
                "start": {
                    "accountSid": "AC123",
                    "streamSid": "MZ123",
                    "callSid": "CA123",
                    "tracks": ["inbound"],
                    "mediaFormat": {"encoding": "audio/x-mulaw", "sampleRate": 8000, "channels": 1}
                },
                "streamSid": "MZ123"
            }"#,
        )
        .unwrap();

        match event {
            MediaStreamEvent::Start { start } => {
                assert_eq!(start.stream_sid, "MZ123");
                assert_eq!(start.call_sid.as_deref(), Some("CA123"));
                let format = start.media_format.unwrap();
                assert_eq!(format.sample_rate, Some(8000));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_parse_media_event() {
        let event: MediaStreamEvent = serde_json::from_str(
            r#"{"event":"media","sequenceNumber":"3","media":{"track":"inbound","chunk":"1","timestamp":"5","payload":"AAEC"},"streamSid":"MZ123"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            MediaStreamEvent::Media {
                media: MediaChunk {
                    payload: "AAEC".to_string(),
                    track: Some("inbound".to_string()),
                }
            }
        );
    }

    #[test]
    fn test_parse_media_without_payload_fails() {
        assert!(serde_json::from_str::<MediaStreamEvent>(r#"{"event":"media","media":{}}"#).is_err());
    }

    #[test]
    fn test_parse_stop_with_extra_fields() {
        let event: MediaStreamEvent = serde_json::from_str(
            r#"{"event":"stop","stop":{"accountSid":"AC123","callSid":"CA123"},"streamSid":"MZ123"}"#,
        )
        .unwrap();
        assert_eq!(event, MediaStreamEvent::Stop);
    }

    #[test]
    fn test_parse_ignored_events() {
        let connected: MediaStreamEvent =
            serde_json::from_str(r#"{"event":"connected","protocol":"Call","version":"1.0.0"}"#)
                .unwrap();
        assert_eq!(connected.name(), "connected");

        let mark: MediaStreamEvent =
            serde_json::from_str(r#"{"event":"mark","mark":{"name":"greeting"}}"#).unwrap();
        assert_eq!(mark, MediaStreamEvent::Mark);

        let unknown: MediaStreamEvent =
            serde_json::from_str(r#"{"event":"something_new"}"#).unwrap();
        assert_eq!(unknown, MediaStreamEvent::Unknown);
    }

    #[test]
    fn test_serialize_commands() {
        let media = MediaStreamCommand::Media {
            stream_sid: Some("SID123".to_string()),
            media: OutboundMedia {
                payload: "QUJD".to_string(),
            },
        };
        assert_eq!(
            serde_json::to_value(&media).unwrap(),
            json!({"event": "media", "streamSid": "SID123", "media": {"payload": "QUJD"}})
        );

        let clear = MediaStreamCommand::Clear { stream_sid: None };
        assert_eq!(
            serde_json::to_value(&clear).unwrap(),
            json!({"event": "clear", "streamSid": null})
        );
    }
}
