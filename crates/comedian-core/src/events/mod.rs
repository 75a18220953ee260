//! Inbound chat events

mod chat_event;

pub use chat_event::{
    ChannelPayload, ChatEvent, MembershipPayload, MessageDeletedPayload, MessagePayload,
};
