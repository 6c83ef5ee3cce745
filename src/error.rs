use std::{io, path::PathBuf};

/// Failures of a harvesting run.
///
/// Only `Configuration`, `Authentication` and the persistence variants abort
/// the run. Per-channel variants are logged by the harvester and the channel
/// is skipped.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration:\n{0}")]
    Configuration(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("failed to resolve channel {channel_id}: {reason}")]
    ChannelResolution { channel_id: i64, reason: String },

    #[error("failed to fetch messages from channel {channel_id}: {reason}")]
    MessageFetch { channel_id: i64, reason: String },

    #[error("failed to write '{}'", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize result document")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
