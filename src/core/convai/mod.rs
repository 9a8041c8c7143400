//! ElevenLabs Conversational AI channel.
//!
//! The agent side of a relay session: connection setup and the JSON event
//! protocol spoken over the socket.
//!
//! # Audio Format
//!
//! Audio is exchanged as base64 strings in whatever format the agent is
//! configured for (μ-law 8kHz for telephony). The bridge never decodes it.

mod client;
mod config;
pub mod messages;

pub use client::{ConvaiSink, ConvaiSocket, ConvaiStream, connect};
pub use config::{ConvaiConfig, ELEVENLABS_CONVAI_URL};
pub use messages::{ConvaiClientEvent, ConvaiServerEvent};
