//! HTTP and WebSocket request handlers
//!
//! - `api` - Health check and landing page
//! - `telephony` - Twilio call webhook and media stream WebSocket

pub mod api;
pub mod telephony;

// Re-export commonly used handlers for convenient access
pub use telephony::{incoming_call_handler, media_stream_handler};
