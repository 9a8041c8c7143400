//! Twilio telephony side of the bridge.
//!
//! - `messages` - Media Streams WebSocket protocol
//! - `twiml` - call webhook responses

pub mod messages;
mod twiml;

pub use messages::{MediaStreamCommand, MediaStreamEvent};
pub use twiml::{MEDIA_STREAM_PATH, connect_stream_twiml};
