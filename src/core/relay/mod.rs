//! Relay sessions between Twilio media streams and Conversational AI.
//!
//! One [`RelaySession`] is created per accepted media stream WebSocket. It
//! has no registry and shares nothing with other sessions.

pub mod routing;
mod session;

pub use routing::{ConvaiAction, MediaAction, route_convai_event, route_media_event};
pub use session::{RelaySession, SessionPhase};
