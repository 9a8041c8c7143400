//! Twilio route configuration
//!
//! # Endpoints
//!
//! - `GET|POST /incoming-call-eleven` - call webhook, returns TwiML
//! - `GET /media-stream` - WebSocket upgrade for the Media Streams protocol
//!
//! # Media Stream Protocol
//!
//! Twilio sends `start`, `media` and `stop` events as JSON text frames. The
//! server sends back `media` frames with agent audio and `clear` frames when
//! the caller interrupts the agent.

use axum::{
    Router,
    routing::{any, get},
};
use tower_http::trace::TraceLayer;

use crate::core::telephony::MEDIA_STREAM_PATH;
use crate::handlers::telephony::{incoming_call_handler, media_stream_handler};
use crate::state::AppState;
use std::sync::Arc;

/// Path of the Twilio call webhook
pub const INCOMING_CALL_PATH: &str = "/incoming-call-eleven";

/// Create the Twilio router
pub fn create_telephony_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(INCOMING_CALL_PATH, any(incoming_call_handler))
        .route(MEDIA_STREAM_PATH, get(media_stream_handler))
        .layer(TraceLayer::new_for_http())
}
