//! Socket Mode wire protocol
//!
//! Slack pushes JSON envelopes over the WebSocket; every envelope carrying an
//! `envelope_id` must be acknowledged within three seconds or it is retried.

mod envelope;

pub use envelope::{ack, parse_frame, Envelope, EnvelopeKind};
