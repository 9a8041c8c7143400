//! Twilio-facing handlers
//!
//! Twilio first requests the call webhook, which answers with TwiML pointing
//! at the media stream endpoint. Twilio then upgrades `/media-stream` to a
//! WebSocket and a relay session takes over for the rest of the call.

mod media_stream;
mod webhook;

pub use media_stream::media_stream_handler;
pub use webhook::incoming_call_handler;
