//! TwiML documents returned to Twilio's call webhook.

/// Path Twilio opens the media stream WebSocket on
pub const MEDIA_STREAM_PATH: &str = "/media-stream";

/// Build the TwiML that connects an answered call to this server's media
/// stream endpoint over `wss://`, addressed through the webhook's `Host`.
pub fn connect_stream_twiml(host: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
  <Connect>
    <Stream url="wss://{host}{MEDIA_STREAM_PATH}" />
  </Connect>
</Response>"#
    )
}
