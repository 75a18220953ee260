//! Gateway error types

use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Malformed Socket Mode frame: {0}")]
    Frame(#[from] serde_json::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;
