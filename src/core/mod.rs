pub mod convai;
pub mod relay;
pub mod telephony;

// Re-export commonly used types for convenience
pub use convai::{ConvaiClientEvent, ConvaiConfig, ConvaiServerEvent};
pub use relay::{RelaySession, SessionPhase};
pub use telephony::{MediaStreamCommand, MediaStreamEvent};
