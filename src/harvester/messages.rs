use crate::{
    domain::{ChannelHandle, ChannelId, Message},
    error::Error,
    tg_api::Session,
};
use chrono::{DateTime, Duration, Utc};

/// Reads up to `limit` latest messages and keeps those posted within the last
/// `window`. Failures are logged and yield no messages.
pub async fn fetch_recent(
    session: &mut dyn Session,
    id: ChannelId,
    handle: &ChannelHandle,
    window: Duration,
    limit: usize,
) -> Vec<Message> {
    let messages = match session.fetch_messages(handle, limit).await {
        Ok(messages) => messages,
        Err(err) => {
            let err = Error::MessageFetch {
                channel_id: id.0,
                reason: format!("{err:#}"),
            };
            log::warn!("{err}");
            return Vec::new();
        }
    };

    let fetched = messages.len();
    let recent = retain_recent(messages, Utc::now(), window);

    log::info!(
        "Channel {id}: {kept} of {fetched} messages posted within {hours}h",
        kept = recent.len(),
        hours = window.num_hours(),
    );

    recent
}

/// Keeps messages with `now - window <= posted_at <= now`, dropping undated ones.
pub fn retain_recent(messages: Vec<Message>, now: DateTime<Utc>, window: Duration) -> Vec<Message> {
    let cutoff = now - window;

    messages
        .into_iter()
        .filter(|message| {
            message
                .posted_at
                .is_some_and(|posted_at| cutoff <= posted_at && posted_at <= now)
        })
        .collect()
}
