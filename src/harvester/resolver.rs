use crate::{
    domain::{ChannelHandle, ChannelId, PeerRef},
    error::{Error, Result},
    tg_api::Session,
};

/// Marker clients prepend to channel and supergroup ids.
const CHANNEL_PREFIX: &str = "100";

/// Turns a configured id into the canonical positive channel id.
///
/// `-1002292758419` becomes `2292758419`, negative ids without the marker lose
/// only their sign and non-negative ids are already canonical.
pub fn normalize(raw_id: i64) -> i64 {
    if raw_id >= 0 {
        return raw_id;
    }

    let abs = raw_id.saturating_abs();
    let digits = abs.to_string();

    digits
        .strip_prefix(CHANNEL_PREFIX)
        .filter(|rest| !rest.is_empty())
        .and_then(|rest| rest.parse().ok())
        .unwrap_or(abs)
}

/// Peer to ask the session for. Negative ids are looked up as channels.
pub fn peer_ref(id: ChannelId) -> PeerRef {
    if id.0 < 0 {
        PeerRef::Channel(normalize(id.0))
    } else {
        PeerRef::Bare(id.0)
    }
}

pub async fn resolve(session: &mut dyn Session, id: ChannelId) -> Result<ChannelHandle> {
    let peer = peer_ref(id);

    let handle = session
        .resolve_entity(peer)
        .await
        .map_err(|err| Error::ChannelResolution {
            channel_id: id.0,
            reason: format!("{err:#}"),
        })?;

    log::debug!("Channel {id} resolved as {peer:?} to chat {}", handle.id);

    Ok(handle)
}
