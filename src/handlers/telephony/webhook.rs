use axum::{
    http::{HeaderMap, header},
    response::IntoResponse,
};
use tracing::info;

use crate::core::telephony::connect_stream_twiml;

/// Fallback when the webhook request carries no usable `Host` header
const DEFAULT_HOST: &str = "localhost";

/// Twilio incoming call webhook
///
/// Answers with TwiML that connects the call to the media stream WebSocket on
/// the host Twilio used to reach this server.
pub async fn incoming_call_handler(headers: HeaderMap) -> impl IntoResponse {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_HOST);

    info!(host, "Incoming call, connecting media stream");

    (
        [(header::CONTENT_TYPE, "text/xml")],
        connect_stream_twiml(host),
    )
}
