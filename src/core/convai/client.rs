//! Conversational AI WebSocket connection.
//!
//! Opens the agent conversation socket and splits it into the halves the
//! relay session drives independently.

use futures_util::StreamExt;
use futures_util::stream::{SplitSink, SplitStream};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};
use tracing::debug;

use super::config::ConvaiConfig;
use crate::errors::relay_error::RelayResult;

/// Raw Conversational AI socket
pub type ConvaiSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of the Conversational AI socket
pub type ConvaiSink = SplitSink<ConvaiSocket, Message>;

/// Read half of the Conversational AI socket
pub type ConvaiStream = SplitStream<ConvaiSocket>;

/// Perform the WebSocket handshake with the Conversational AI endpoint.
///
/// No retries are attempted: a failed handshake leaves the session without an
/// AI channel and caller audio is dropped until the call ends.
pub async fn connect(config: &ConvaiConfig) -> RelayResult<(ConvaiSink, ConvaiStream)> {
    let url = config.conversation_url()?;
    debug!(host = ?url.host_str(), "Opening Conversational AI socket");

    let (socket, response) = tokio_tungstenite::connect_async(url.as_str()).await?;
    debug!(status = %response.status(), "Conversational AI handshake complete");

    Ok(socket.split())
}
