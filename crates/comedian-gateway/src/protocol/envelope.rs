//! Socket Mode envelopes

use serde::Deserialize;
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message;

use crate::error::GatewayResult;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeKind {
    Hello,
    Disconnect,
    EventsApi,
    SlashCommands,
    Interactive,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    /// Missing on `hello` and `disconnect`
    #[serde(default)]
    pub envelope_id: Option<String>,
    #[serde(default)]
    pub payload: Value,
    /// Why Slack is about to drop the connection
    #[serde(default)]
    pub reason: Option<String>,
}

/// `Ok(None)` for control frames
pub fn parse_frame(message: &Message) -> GatewayResult<Option<Envelope>> {
    let envelope = match message {
        Message::Text(text) => serde_json::from_str(text)?,
        Message::Binary(bytes) => serde_json::from_slice(bytes)?,
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => {
            return Ok(None)
        }
    };
    Ok(Some(envelope))
}

/// Acknowledgement frame for an envelope
pub fn ack(envelope_id: &str) -> Message {
    Message::Text(json!({ "envelope_id": envelope_id }).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_api_envelope() {
        let frame = Message::Text(
            json!({
                "envelope_id": "e1",
                "type": "events_api",
                "accepts_response_payload": false,
                "payload": { "type": "event_callback", "team_id": "T1", "event": { "type": "message" } }
            })
            .to_string(),
        );
        let envelope = parse_frame(&frame).unwrap().unwrap();
        assert_eq!(envelope.kind, EnvelopeKind::EventsApi);
        assert_eq!(envelope.envelope_id.as_deref(), Some("e1"));
        assert_eq!(envelope.payload["team_id"], "T1");
    }

    #[test]
    fn test_control_envelopes() {
        let hello = Message::Text(r#"{"type":"hello","num_connections":1}"#.to_string());
        let envelope = parse_frame(&hello).unwrap().unwrap();
        assert_eq!(envelope.kind, EnvelopeKind::Hello);
        assert!(envelope.envelope_id.is_none());

        let disconnect = Message::Binary(br#"{"type":"disconnect","reason":"refresh_requested"}"#.to_vec());
        let envelope = parse_frame(&disconnect).unwrap().unwrap();
        assert_eq!(envelope.kind, EnvelopeKind::Disconnect);
        assert_eq!(envelope.reason.as_deref(), Some("refresh_requested"));

        let future = Message::Text(r#"{"type":"brand_new","envelope_id":"e9"}"#.to_string());
        assert_eq!(parse_frame(&future).unwrap().unwrap().kind, EnvelopeKind::Unknown);

        assert!(parse_frame(&Message::Ping(vec![1])).unwrap().is_none());
        assert!(parse_frame(&Message::Text("not json".to_string())).is_err());
    }

    #[test]
    fn test_ack_frame() {
        let Message::Text(text) = ack("e1") else {
            panic!("ack must be a text frame");
        };
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!({ "envelope_id": "e1" }));
    }
}
