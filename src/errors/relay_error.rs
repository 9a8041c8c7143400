use thiserror::Error;

/// Errors raised inside a relay session.
///
/// None of these end a call on their own: the session logs them and carries
/// on, or tears down the Conversational AI side when a transport fails.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid Conversational AI URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Conversational AI WebSocket error: {0}")]
    ConvaiTransport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Media stream WebSocket error: {0}")]
    MediaTransport(#[from] axum::Error),

    #[error("Malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),

    #[error("Invalid base64 audio payload: {0}")]
    InvalidAudio(#[from] base64::DecodeError),

    #[error("Conversational AI channel is not open")]
    ConvaiNotOpen,
}

pub type RelayResult<T> = Result<T, RelayError>;
