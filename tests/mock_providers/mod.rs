//! Mock endpoints for relay session tests
//!
//! - `convai_mock` - Conversational AI WebSocket server
//! - `twilio_client` - Twilio Media Streams client
//!
//! Both sides of a call are driven by the test while the real bridge router
//! runs in between on an ephemeral port.

// Allow dead code in test infrastructure - not every test file uses every helper
#![allow(dead_code)]

pub mod convai_mock;
pub mod twilio_client;

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;

use waav_phone_bridge::{ServerConfig, routes, state::AppState};

pub use convai_mock::{MockConvaiConnection, MockConvaiServer};
pub use twilio_client::TwilioClient;

/// Upper bound for any single expected frame
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Agent id every test bridge is configured with
pub const TEST_AGENT_ID: &str = "test-agent";

/// Configuration pointing the bridge at a mock Conversational AI endpoint
pub fn bridge_config(convai_url: String) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        tls: None,
        elevenlabs_agent_id: TEST_AGENT_ID.to_string(),
        elevenlabs_convai_url: convai_url,
    }
}

/// Serve the bridge on an ephemeral port and return its address
pub async fn spawn_bridge(convai_url: String) -> SocketAddr {
    let app = routes::create_app(AppState::new(bridge_config(convai_url)));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("Bridge server error: {}", e);
        }
    });

    addr
}
