//! ElevenLabs Conversational AI endpoint configuration.

use url::Url;

/// ElevenLabs Conversational AI WebSocket endpoint.
pub const ELEVENLABS_CONVAI_URL: &str = "wss://api.elevenlabs.io/v1/convai/conversation";

/// Where a relay session opens its Conversational AI channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvaiConfig {
    /// Base WebSocket URL, without query parameters
    pub base_url: String,
    /// Agent the conversation is started with
    pub agent_id: String,
}

impl Default for ConvaiConfig {
    fn default() -> Self {
        Self {
            base_url: ELEVENLABS_CONVAI_URL.to_string(),
            agent_id: String::new(),
        }
    }
}

impl ConvaiConfig {
    /// Build the conversation URL with the `agent_id` query parameter.
    pub fn conversation_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.base_url)?;
        url.query_pairs_mut().append_pair("agent_id", &self.agent_id);
        Ok(url)
    }
}
