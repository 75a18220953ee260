//! Events API callback payloads
//!
//! Only the fields the bot reads are modelled; anything else Slack sends is
//! ignored during deserialization.

use comedian_core::events::{
    ChannelPayload, ChatEvent, MembershipPayload, MessageDeletedPayload, MessagePayload,
};
use serde::Deserialize;

/// `payload` of an `events_api` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct EventCallback {
    #[serde(default)]
    pub team_id: String,
    pub event: SlackEvent,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlackEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub deleted_ts: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    /// New state of an edited message
    #[serde(default)]
    pub message: Option<EditedMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditedMessage {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
}

impl EventCallback {
    /// Translate into a chat event; `None` for events the bot does not act on
    pub fn into_chat_event(self, default_team: &str) -> Option<ChatEvent> {
        let team_id = if self.team_id.is_empty() {
            default_team.to_string()
        } else {
            self.team_id
        };
        let event = self.event;
        let channel_id = event.channel?;

        match event.kind.as_str() {
            "message" => match event.subtype.as_deref() {
                None | Some("thread_broadcast") if event.bot_id.is_none() => {
                    Some(ChatEvent::MessageCreated(MessagePayload {
                        team_id,
                        channel_id,
                        user_id: event.user?,
                        text: event.text.unwrap_or_default(),
                        ts: event.ts?,
                    }))
                }
                Some("message_changed") => {
                    let message = event.message?;
                    if message.bot_id.is_some() {
                        return None;
                    }
                    Some(ChatEvent::MessageEdited(MessagePayload {
                        team_id,
                        channel_id,
                        user_id: message.user?,
                        text: message.text.unwrap_or_default(),
                        ts: message.ts?,
                    }))
                }
                Some("message_deleted") => Some(ChatEvent::MessageDeleted(MessageDeletedPayload {
                    team_id,
                    channel_id,
                    deleted_ts: event.deleted_ts?,
                })),
                _ => None,
            },
            "member_joined_channel" => Some(ChatEvent::MemberJoinedChannel(MembershipPayload {
                team_id,
                channel_id,
                user_id: event.user?,
            })),
            "member_left_channel" => Some(ChatEvent::MemberLeftChannel(MembershipPayload {
                team_id,
                channel_id,
                user_id: event.user?,
            })),
            "channel_left" | "group_left" => {
                Some(ChatEvent::BotRemovedFromChannel(ChannelPayload { team_id, channel_id }))
            }
            _ => None,
        }
    }
}
