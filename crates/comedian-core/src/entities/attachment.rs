//! Message attachments used by reports

use serde::{Deserialize, Serialize};

/// Slack attachment color band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentColor {
    Good,
    Warning,
    Danger,
}

impl AttachmentColor {
    /// Color for a score out of `max` points
    pub fn for_points(points: u8, max: u8) -> Self {
        if points == 0 {
            Self::Danger
        } else if points >= max {
            Self::Good
        } else {
            Self::Warning
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub text: String,
    pub color: AttachmentColor,
    /// Plain-text summary for clients that cannot render attachments
    pub fallback: String,
}

impl Attachment {
    pub fn new(text: String, color: AttachmentColor) -> Self {
        Self {
            fallback: text.clone(),
            text,
            color,
        }
    }
}
