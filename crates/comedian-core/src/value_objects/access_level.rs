//! Access levels for slash commands
//!
//! Lower numbers are more privileged: `Admin (2) < Pm (3) < Other (4)`.
//! A caller is allowed to run a command when its level is numerically
//! less than or equal to the level the command requires.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i16)]
pub enum AccessLevel {
    /// Workspace admin or owner
    Admin = 2,
    /// Project manager of the invoking channel
    Pm = 3,
    /// Everybody else
    Other = 4,
}

impl AccessLevel {
    #[inline]
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    /// Whether this level satisfies `required`
    #[inline]
    pub fn permits(self, required: AccessLevel) -> bool {
        self.as_i16() <= required.as_i16()
    }
}

impl TryFrom<i16> for AccessLevel {
    type Error = i16;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Admin),
            3 => Ok(Self::Pm),
            4 => Ok(Self::Other),
            other => Err(other),
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i16())
    }
}
