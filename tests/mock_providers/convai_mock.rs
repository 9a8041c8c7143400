//! WebSocket Mock Server for the Conversational AI provider
//!
//! Simulates the ElevenLabs conversation endpoint. Each accepted connection is
//! handed to the test as a [`MockConvaiConnection`] that records every frame
//! the bridge sends and lets the test push server events back.

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_hdr_async,
    tungstenite::{
        Message,
        handshake::server::{ErrorResponse, Request, Response},
    },
};

use super::RECV_TIMEOUT;

/// Mock Conversational AI server
pub struct MockConvaiServer {
    pub addr: SocketAddr,
    connections: mpsc::UnboundedReceiver<MockConvaiConnection>,
}

/// One Conversational AI socket opened by a relay session
pub struct MockConvaiConnection {
    /// Request URI of the WebSocket handshake (path and query)
    pub request_uri: String,
    to_bridge: mpsc::UnboundedSender<Message>,
    from_bridge: mpsc::UnboundedReceiver<Message>,
}

impl MockConvaiServer {
    /// Start a mock that completes handshakes immediately
    pub async fn start() -> Self {
        Self::start_with_handshake_delay(Duration::ZERO).await
    }

    /// Start a mock that holds every accepted TCP connection for `delay`
    /// before answering the WebSocket handshake
    pub async fn start_with_handshake_delay(delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (conn_tx, connections) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let conn_tx = conn_tx.clone();
                tokio::spawn(async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    if let Err(e) = handle_connection(stream, conn_tx).await {
                        eprintln!("Mock Conversational AI connection error: {}", e);
                    }
                });
            }
        });

        Self { addr, connections }
    }

    /// Base URL to configure the bridge with
    pub fn base_url(&self) -> String {
        format!("ws://{}/v1/convai/conversation", self.addr)
    }

    /// Wait for the next relay session to connect
    pub async fn next_connection(&mut self) -> MockConvaiConnection {
        timeout(RECV_TIMEOUT, self.connections.recv())
            .await
            .expect("timed out waiting for Conversational AI connection")
            .expect("mock server stopped")
    }
}

impl MockConvaiConnection {
    /// Send a JSON server event to the bridge
    pub fn send_json(&self, value: Value) {
        self.send(Message::Text(value.to_string().into()));
    }

    pub fn send(&self, message: Message) {
        self.to_bridge.send(message).expect("mock connection closed");
    }

    /// Next frame received from the bridge, `None` once the socket is gone
    pub async fn recv(&mut self) -> Option<Message> {
        timeout(RECV_TIMEOUT, self.from_bridge.recv())
            .await
            .expect("timed out waiting for a frame from the bridge")
    }

    /// Next text frame from the bridge, parsed as JSON
    pub async fn recv_json(&mut self) -> Value {
        match self.recv().await {
            Some(Message::Text(text)) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("expected a text frame, got {other:?}"),
        }
    }

    /// Wait until the bridge closes the socket, returning the text frames seen
    /// on the way
    pub async fn recv_until_closed(&mut self) -> (Vec<Value>, bool) {
        let mut frames = Vec::new();
        loop {
            match self.recv().await {
                Some(Message::Text(text)) => frames.push(serde_json::from_str(text.as_str()).unwrap()),
                Some(Message::Close(_)) => return (frames, true),
                Some(_) => {}
                None => return (frames, false),
            }
        }
    }

    /// Assert that no text frame arrives within `window`
    pub async fn assert_no_text_within(&mut self, window: Duration) {
        let deadline = tokio::time::Instant::now() + window;
        loop {
            match tokio::time::timeout_at(deadline, self.from_bridge.recv()).await {
                Err(_) | Ok(None) => return,
                Ok(Some(Message::Text(text))) => panic!("unexpected frame from bridge: {text}"),
                Ok(Some(_)) => {}
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    conn_tx: mpsc::UnboundedSender<MockConvaiConnection>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut request_uri = String::new();
    let ws_stream = accept_hdr_async(
        stream,
        |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
            request_uri = request.uri().to_string();
            Ok(response)
        },
    )
    .await?;

    let (mut write, mut read) = ws_stream.split();
    let (to_bridge, mut outgoing) = mpsc::unbounded_channel::<Message>();
    let (incoming, from_bridge) = mpsc::unbounded_channel::<Message>();

    let connection = MockConvaiConnection {
        request_uri,
        to_bridge,
        from_bridge,
    };
    if conn_tx.send(connection).is_err() {
        return Ok(());
    }

    loop {
        tokio::select! {
            Some(message) = outgoing.recv() => {
                if write.send(message).await.is_err() {
                    break;
                }
            }
            frame = read.next() => match frame {
                Some(Ok(message)) => {
                    let _ = incoming.send(message);
                }
                Some(Err(_)) | None => break,
            }
        }
    }

    Ok(())
}
