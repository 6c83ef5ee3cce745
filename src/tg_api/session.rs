use crate::domain::{ChannelHandle, DialogInfo, Message, PeerRef};
use async_trait::async_trait;

/// Authenticated connection to the messaging platform.
///
/// The harvester only talks to the platform through this trait. A session is
/// used by one run at a time, so methods take `&mut self`.
#[async_trait]
pub trait Session: Send {
    /// Looks up a chat the account can read.
    async fn resolve_entity(&mut self, peer: PeerRef) -> anyhow::Result<ChannelHandle>;

    /// Returns up to `limit` most recent messages of the chat, newest first.
    async fn fetch_messages(
        &mut self,
        handle: &ChannelHandle,
        limit: usize,
    ) -> anyhow::Result<Vec<Message>>;

    /// Lists every dialog of the account.
    async fn list_dialogs(&mut self) -> anyhow::Result<Vec<DialogInfo>>;

    /// Releases the session. Called once, after the last request.
    async fn disconnect(&mut self) -> anyhow::Result<()>;
}
