//! Role a standuper plays inside a channel

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelRole {
    #[default]
    Developer,
    Pm,
    Designer,
    /// Stored as an empty string
    #[serde(rename = "")]
    Unassigned,
}

impl ChannelRole {
    pub const ASSIGNABLE: [ChannelRole; 3] = [Self::Developer, Self::Pm, Self::Designer];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::Pm => "pm",
            Self::Designer => "designer",
            Self::Unassigned => "",
        }
    }

    /// PMs and designers are not expected to commit code
    #[inline]
    pub fn exempt_from_commits(self) -> bool {
        matches!(self, Self::Pm | Self::Designer)
    }
}

impl fmt::Display for ChannelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "developer" | "dev" | "developers" | "разработчик" => Ok(Self::Developer),
            "pm" | "pms" | "manager" | "менеджер" => Ok(Self::Pm),
            "designer" | "designers" | "дизайнер" => Ok(Self::Designer),
            "" => Ok(Self::Unassigned),
            other => Err(other.to_string()),
        }
    }
}

impl From<&str> for ChannelRole {
    /// Lenient conversion for values coming back from storage
    fn from(value: &str) -> Self {
        value.parse().unwrap_or(Self::Unassigned)
    }
}
