//! Twilio Media Streams client
//!
//! Plays Twilio's part of a call against the bridge's `/media-stream`
//! endpoint.

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use super::RECV_TIMEOUT;

pub struct TwilioClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TwilioClient {
    pub async fn connect(bridge: SocketAddr) -> Self {
        let (socket, _) = connect_async(format!("ws://{}/media-stream", bridge))
            .await
            .expect("failed to connect to media stream endpoint");
        Self { socket }
    }

    pub async fn send_json(&mut self, value: Value) {
        self.send_text(&value.to_string()).await;
    }

    pub async fn send_text(&mut self, text: &str) {
        self.socket
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("failed to send to bridge");
    }

    pub async fn start(&mut self, stream_sid: &str) {
        self.send_json(serde_json::json!({
            "event": "start",
            "sequenceNumber": "1",
            "start": {
                "streamSid": stream_sid,
                "callSid": "CA0000",
                "accountSid": "AC0000",
                "mediaFormat": {"encoding": "audio/x-mulaw", "sampleRate": 8000, "channels": 1}
            },
            "streamSid": stream_sid
        }))
        .await;
    }

    pub async fn media(&mut self, payload: &str) {
        self.send_json(serde_json::json!({
            "event": "media",
            "media": {"track": "inbound", "chunk": "1", "timestamp": "20", "payload": payload}
        }))
        .await;
    }

    pub async fn stop(&mut self) {
        self.send_json(serde_json::json!({"event": "stop", "stop": {"callSid": "CA0000"}}))
            .await;
    }

    /// Next JSON frame sent by the bridge
    pub async fn recv_json(&mut self) -> Value {
        loop {
            let frame = timeout(RECV_TIMEOUT, self.socket.next())
                .await
                .expect("timed out waiting for a frame from the bridge");
            match frame {
                Some(Ok(Message::Text(text))) => return serde_json::from_str(text.as_str()).unwrap(),
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                other => panic!("expected a text frame, got {other:?}"),
            }
        }
    }

    /// Assert the bridge neither sends anything nor closes within `window`
    pub async fn assert_idle_within(&mut self, window: Duration) {
        if let Ok(frame) = timeout(window, self.socket.next()).await {
            panic!("unexpected activity from bridge: {frame:?}");
        }
    }

    /// Close the socket with a proper close handshake
    pub async fn close(mut self) {
        let _ = self.socket.close(None).await;
    }

    /// Drop the TCP connection without a close handshake
    pub fn disconnect_abruptly(self) {
        drop(self.socket);
    }
}
