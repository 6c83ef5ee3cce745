use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Channel identifier as written in the configuration.
///
/// Supergroups and channels are usually copied from clients in the
/// `-100<id>` form, basic groups as `-<id>` and users as a plain positive id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId(pub i64);

impl Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Peer reference handed to the messaging session for entity resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerRef {
    /// Canonical channel or supergroup id, with the `-100` marker stripped.
    Channel(i64),

    /// Id passed through as configured.
    Bare(i64),
}

/// Channel resolved by the messaging session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelHandle {
    /// Identifier of the resolved chat on the platform side.
    pub id: i64,

    /// Display title, if the platform returned a non-empty one.
    pub title: Option<String>,
}

/// Text message read from a channel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Message {
    pub id: i32,
    pub text: String,
    pub entities: Vec<TextSpan>,
    pub posted_at: Option<DateTime<Utc>>,
}

/// Rich text annotation describing a link inside a message.
///
/// `offset` and `length` count UTF-16 code units of `Message::text`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextSpan {
    pub explicit_url: Option<String>,
    pub offset: Option<usize>,
    pub length: Option<usize>,
}

/// Dialog entry of the authenticated account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogInfo {
    pub name: String,
    pub id: i64,
    pub is_broadcast: bool,
    pub is_supergroup: bool,
}

/// A single extracted link together with where it came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub url: String,
    pub source_channel_id: i64,
    pub source_channel_name: String,
    pub message_text: String,
    pub posted_time: Option<String>,
}

/// Document consumed by the frontend. Field order is the serialized key order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDocument {
    pub timestamp: String,
    pub links: Vec<LinkRecord>,
}
