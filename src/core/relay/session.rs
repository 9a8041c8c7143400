//! Per-call relay session.
//!
//! A session owns the Twilio media stream socket it was created for and the
//! Conversational AI socket it opens on start. Two receive loops run
//! concurrently, one per socket, and each sends directly on the other side:
//!
//! ```text
//! Twilio ──media loop──▶ route_media_event ──▶ Conversational AI
//! Twilio ◀── route_convai_event ◀──convai loop── Conversational AI
//! ```
//!
//! Teardown is one-directional. When the media socket closes or fails the
//! Conversational AI socket is closed. When the agent hangs up first the
//! media socket is left to Twilio and later caller audio is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::ws::{Message as MediaMessage, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message as ConvaiMessage;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use super::routing::{ConvaiAction, MediaAction, route_convai_event, route_media_event};
use crate::core::convai::{self, ConvaiClientEvent, ConvaiConfig, ConvaiServerEvent, ConvaiSink};
use crate::core::telephony::{MediaStreamCommand, MediaStreamEvent};
use crate::errors::relay_error::{RelayError, RelayResult};

type MediaSink = SplitSink<WebSocket, MediaMessage>;

/// Lifecycle of a relay session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Conversational AI channel opening, stream identifier unknown
    Init,
    /// Twilio `start` received, stream identifier known
    Streaming,
    /// Teardown requested, Conversational AI channel closing
    Closing,
    /// Both loops finished
    Closed,
}

/// State shared by the two loops of one session
struct SessionState {
    session_id: String,
    stream_sid: RwLock<Option<String>>,
    convai_tx: Mutex<Option<ConvaiSink>>,
    convai_open: AtomicBool,
    shutdown: CancellationToken,
    closed: AtomicBool,
}

/// Relays one Twilio call to one Conversational AI conversation.
pub struct RelaySession {
    convai: ConvaiConfig,
    state: Arc<SessionState>,
}

impl RelaySession {
    pub fn new(convai: ConvaiConfig) -> Self {
        Self {
            convai,
            state: Arc::new(SessionState::new(uuid::Uuid::new_v4().to_string())),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.state.session_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    /// Drive the session until the media stream socket closes.
    ///
    /// The Conversational AI handshake starts immediately and races with
    /// Twilio's `start` event.
    pub async fn run(self, socket: WebSocket) {
        let session_id = self.state.session_id.clone();
        info!(session_id = %session_id, "[Server] Twilio connected to media stream.");

        let (media_tx, mut media_rx) = socket.split();
        let convai_task = tokio::spawn(run_convai_loop(
            self.state.clone(),
            self.convai.clone(),
            media_tx,
        ));

        while let Some(frame) = media_rx.next().await {
            match frame {
                Ok(MediaMessage::Text(text)) => self.state.handle_media_frame(text.as_str()).await,
                Ok(MediaMessage::Binary(data)) => {
                    debug!(session_id = %session_id, bytes = data.len(), "[Twilio] Ignoring binary frame");
                }
                Ok(MediaMessage::Ping(_)) | Ok(MediaMessage::Pong(_)) => {}
                Ok(MediaMessage::Close(_)) => {
                    info!(session_id = %session_id, "[Twilio] Close frame received");
                    break;
                }
                Err(e) => {
                    error!(session_id = %session_id, error = %RelayError::from(e), "[Twilio] WebSocket error");
                    break;
                }
            }
        }

        info!(session_id = %session_id, phase = ?self.state.phase(), "[Twilio] Client disconnected");
        self.state.close_convai();

        if let Err(e) = convai_task.await {
            error!(session_id = %session_id, "Conversational AI task failed: {}", e);
        }

        self.state.closed.store(true, Ordering::SeqCst);
        info!(session_id = %session_id, phase = ?self.state.phase(), "Relay session terminated");
    }
}

impl SessionState {
    fn new(session_id: String) -> Self {
        Self {
            session_id,
            stream_sid: RwLock::new(None),
            convai_tx: Mutex::new(None),
            convai_open: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
            closed: AtomicBool::new(false),
        }
    }

    fn phase(&self) -> SessionPhase {
        if self.closed.load(Ordering::SeqCst) {
            SessionPhase::Closed
        } else if self.shutdown.is_cancelled() {
            SessionPhase::Closing
        } else if self.stream_sid.read().is_some() {
            SessionPhase::Streaming
        } else {
            SessionPhase::Init
        }
    }

    fn is_convai_open(&self) -> bool {
        self.convai_open.load(Ordering::SeqCst) && !self.shutdown.is_cancelled()
    }

    /// Request the Conversational AI socket to close. Safe to call repeatedly.
    fn close_convai(&self) {
        if !self.shutdown.is_cancelled() {
            debug!(session_id = %self.session_id, "Closing Conversational AI channel");
        }
        self.shutdown.cancel();
    }

    async fn handle_media_frame(&self, text: &str) {
        let action = serde_json::from_str::<MediaStreamEvent>(text)
            .map_err(RelayError::from)
            .and_then(route_media_event);

        let action = match action {
            Ok(action) => action,
            Err(e) => {
                error!(session_id = %self.session_id, error = %e, "[Twilio] Error processing message");
                return;
            }
        };

        match action {
            MediaAction::StreamStarted(start) => {
                info!(
                    session_id = %self.session_id,
                    stream_sid = %start.stream_sid,
                    call_sid = ?start.call_sid,
                    "[Twilio] Stream started"
                );
                *self.stream_sid.write() = Some(start.stream_sid);
            }
            MediaAction::ForwardAudio(chunk) => match self.send_convai(&chunk).await {
                Ok(()) => {}
                Err(RelayError::ConvaiNotOpen) => {
                    trace!(session_id = %self.session_id, "Conversational AI not open, dropping caller audio");
                }
                Err(e) => {
                    warn!(session_id = %self.session_id, error = %e, "Failed to forward caller audio");
                }
            },
            MediaAction::CloseConvai => {
                info!(session_id = %self.session_id, "[Twilio] Stream stopped");
                self.close_convai();
            }
            MediaAction::Ignore(event) => {
                info!(session_id = %self.session_id, event, "[Twilio] Received unhandled event");
            }
        }
    }

    async fn handle_convai_frame(&self, text: &str, media_tx: &mut MediaSink) {
        let event = match serde_json::from_str::<ConvaiServerEvent>(text) {
            Ok(event) => event,
            Err(e) => {
                error!(session_id = %self.session_id, error = %e, "[II] Error parsing message");
                return;
            }
        };

        trace!(session_id = %self.session_id, event = event.name(), "[II] Received event");

        let stream_sid = self.stream_sid.read().clone();
        match route_convai_event(event, stream_sid) {
            ConvaiAction::ToMedia(command) => {
                if let Err(e) = send_media(media_tx, &command).await {
                    warn!(session_id = %self.session_id, error = %e, "Failed to send to media stream");
                }
            }
            ConvaiAction::ToConvai(reply) => {
                if let Err(e) = self.send_convai(&reply).await {
                    warn!(session_id = %self.session_id, error = %e, "Failed to reply to Conversational AI");
                }
            }
            ConvaiAction::Nothing => {}
        }
    }

    async fn send_convai(&self, event: &ConvaiClientEvent) -> RelayResult<()> {
        if !self.is_convai_open() {
            return Err(RelayError::ConvaiNotOpen);
        }

        let json = serde_json::to_string(event)?;
        let mut convai_tx = self.convai_tx.lock().await;
        let sink = convai_tx.as_mut().ok_or(RelayError::ConvaiNotOpen)?;
        sink.send(ConvaiMessage::Text(json.into())).await?;
        Ok(())
    }
}

async fn send_media(media_tx: &mut MediaSink, command: &MediaStreamCommand) -> RelayResult<()> {
    let json = serde_json::to_string(command)?;
    media_tx.send(MediaMessage::Text(json.into())).await?;
    Ok(())
}

/// Open the Conversational AI socket and pump its events to Twilio until
/// either the agent disconnects or the session asks for shutdown.
async fn run_convai_loop(state: Arc<SessionState>, config: ConvaiConfig, mut media_tx: MediaSink) {
    let connected = tokio::select! {
        _ = state.shutdown.cancelled() => {
            info!(session_id = %state.session_id, "[II] Call ended before Conversational AI handshake completed");
            return;
        }
        result = convai::connect(&config) => result,
    };

    let (sink, mut stream) = match connected {
        Ok(halves) => halves,
        Err(e) => {
            error!(session_id = %state.session_id, error = %e, "[II] WebSocket error");
            return;
        }
    };

    *state.convai_tx.lock().await = Some(sink);
    state.convai_open.store(true, Ordering::SeqCst);
    info!(session_id = %state.session_id, "[II] Connected to Conversational AI.");

    loop {
        tokio::select! {
            _ = state.shutdown.cancelled() => break,
            frame = stream.next() => match frame {
                Some(Ok(ConvaiMessage::Text(text))) => {
                    state.handle_convai_frame(text.as_str(), &mut media_tx).await;
                }
                Some(Ok(ConvaiMessage::Close(frame))) => {
                    info!(session_id = %state.session_id, close_frame = ?frame, "[II] Disconnected.");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!(session_id = %state.session_id, error = %RelayError::from(e), "[II] WebSocket error");
                    break;
                }
                None => {
                    info!(session_id = %state.session_id, "[II] Disconnected.");
                    break;
                }
            }
        }
    }

    state.convai_open.store(false, Ordering::SeqCst);
    let sink = state.convai_tx.lock().await.take();
    if let Some(mut sink) = sink
        && let Err(e) = sink.close().await
    {
        debug!(session_id = %state.session_id, error = %e, "Conversational AI socket already closed");
    }
}
