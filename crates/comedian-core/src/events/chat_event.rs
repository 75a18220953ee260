//! Chat events - inbound workspace activity the bot reacts to
//!
//! The gateway translates raw Slack payloads into these variants; the
//! service layer never sees Slack's envelope format.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatEvent {
    MessageCreated(MessagePayload),
    MessageEdited(MessagePayload),
    MessageDeleted(MessageDeletedPayload),
    MemberJoinedChannel(MembershipPayload),
    MemberLeftChannel(MembershipPayload),
    BotRemovedFromChannel(ChannelPayload),
}

impl ChatEvent {
    /// Channel the event happened in
    pub fn channel_id(&self) -> &str {
        match self {
            Self::MessageCreated(p) | Self::MessageEdited(p) => &p.channel_id,
            Self::MessageDeleted(p) => &p.channel_id,
            Self::MemberJoinedChannel(p) | Self::MemberLeftChannel(p) => &p.channel_id,
            Self::BotRemovedFromChannel(p) => &p.channel_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub team_id: String,
    pub channel_id: String,
    pub user_id: String,
    pub text: String,
    pub ts: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDeletedPayload {
    pub team_id: String,
    pub channel_id: String,
    pub deleted_ts: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipPayload {
    pub team_id: String,
    pub channel_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPayload {
    pub team_id: String,
    pub channel_id: String,
}
