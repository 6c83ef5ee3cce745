mod extractor;
mod messages;
mod persist;
mod resolver;

pub use extractor::extract;
pub use persist::persist;

use crate::{
    config::Config,
    domain::{ChannelId, LinkRecord, ResultDocument},
    error::Result,
    tg_api::{self, Session},
};
use chrono::{Duration, SecondsFormat, Utc};
use std::path::Path;

/// Parameters of a single harvesting run.
#[derive(Clone, Debug)]
pub struct Params {
    /// How far back from now messages are considered.
    pub window: Duration,

    /// How many latest messages are read per channel.
    pub limit: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            window: Duration::hours(24),
            limit: 100,
        }
    }
}

/// Logs in, collects links from every configured channel and releases the
/// session, whatever the outcome of the collection.
pub async fn run(config: &Config, params: &Params, session_path: &Path) -> Result<ResultDocument> {
    let mut client = tg_api::Client::authenticate(config, session_path).await?;

    Ok(run_with(&mut client, &config.channel_ids, params).await)
}

/// Collects links over an authenticated session and releases it afterwards.
pub async fn run_with(
    session: &mut dyn Session,
    channel_ids: &[ChannelId],
    params: &Params,
) -> ResultDocument {
    let document = collect(session, channel_ids, params).await;

    if let Err(err) = session.disconnect().await {
        log::warn!("Failed to release session: {err:#}");
    }

    document
}

/// Walks the channels in order. A channel that can not be read is skipped.
pub async fn collect(
    session: &mut dyn Session,
    channel_ids: &[ChannelId],
    params: &Params,
) -> ResultDocument {
    let mut links = Vec::new();

    for &id in channel_ids {
        match collect_channel(session, id, params).await {
            Ok(records) => {
                log::info!("Channel {id}: collected {} links", records.len());
                links.extend(records);
            }
            Err(err) => {
                log::warn!("Skipping channel {id}: {err}");
            }
        }
    }

    ResultDocument {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        links,
    }
}

async fn collect_channel(
    session: &mut dyn Session,
    id: ChannelId,
    params: &Params,
) -> Result<Vec<LinkRecord>> {
    let handle = resolver::resolve(session, id).await?;
    let messages = messages::fetch_recent(session, id, &handle, params.window, params.limit).await;

    let channel_name = handle.title.clone().unwrap_or_else(|| id.to_string());

    let mut records = Vec::new();

    for message in messages {
        let urls = extract(&message);
        if urls.is_empty() {
            continue;
        }

        log::debug!(
            "Channel {id}: message {message_id} has {count} links",
            message_id = message.id,
            count = urls.len(),
        );

        let posted_time = message.posted_at.map(|posted_at| posted_at.to_rfc3339());

        records.extend(urls.into_iter().map(|url| LinkRecord {
            url,
            source_channel_id: id.0,
            source_channel_name: channel_name.clone(),
            message_text: message.text.clone(),
            posted_time: posted_time.clone(),
        }));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChannelHandle, DialogInfo, Message, PeerRef};
    use anyhow::anyhow;
    use async_trait::async_trait;

    struct FakeChannel {
        peer: PeerRef,
        handle: ChannelHandle,
        messages: anyhow::Result<Vec<Message>>,
    }

    #[derive(Default)]
    struct FakeSession {
        channels: Vec<FakeChannel>,
        requested_limits: Vec<usize>,
        disconnects: usize,
    }

    impl FakeSession {
        fn with_channel(
            mut self,
            peer: PeerRef,
            id: i64,
            title: Option<&str>,
            messages: Vec<Message>,
        ) -> Self {
            self.channels.push(FakeChannel {
                peer,
                handle: ChannelHandle {
                    id,
                    title: title.map(str::to_owned),
                },
                messages: Ok(messages),
            });
            self
        }

        fn with_broken_history(mut self, peer: PeerRef, id: i64) -> Self {
            self.channels.push(FakeChannel {
                peer,
                handle: ChannelHandle { id, title: None },
                messages: Err(anyhow!("CHANNEL_PRIVATE")),
            });
            self
        }
    }

    #[async_trait]
    impl Session for FakeSession {
        async fn resolve_entity(&mut self, peer: PeerRef) -> anyhow::Result<ChannelHandle> {
            self.channels
                .iter()
                .find(|channel| channel.peer == peer)
                .map(|channel| channel.handle.clone())
                .ok_or_else(|| anyhow!("no channel matching {peer:?}"))
        }

        async fn fetch_messages(
            &mut self,
            handle: &ChannelHandle,
            limit: usize,
        ) -> anyhow::Result<Vec<Message>> {
            self.requested_limits.push(limit);

            let channel = self
                .channels
                .iter()
                .find(|channel| channel.handle.id == handle.id)
                .ok_or_else(|| anyhow!("unknown chat {}", handle.id))?;

            match &channel.messages {
                Ok(messages) => Ok(messages.iter().take(limit).cloned().collect()),
                Err(err) => Err(anyhow!("{err}")),
            }
        }

        async fn list_dialogs(&mut self) -> anyhow::Result<Vec<DialogInfo>> {
            Ok(Vec::new())
        }

        async fn disconnect(&mut self) -> anyhow::Result<()> {
            self.disconnects += 1;
            Ok(())
        }
    }

    fn recent(text: &str) -> Message {
        Message {
            text: text.to_owned(),
            posted_at: Some(Utc::now() - Duration::minutes(10)),
            ..Default::default()
        }
    }

    fn urls(document: &ResultDocument) -> Vec<(i64, &str)> {
        document
            .links
            .iter()
            .map(|link| (link.source_channel_id, link.url.as_str()))
            .collect()
    }

    #[tokio::test]
    async fn skips_channel_that_fails_to_resolve() {
        let mut session = FakeSession::default()
            .with_channel(
                PeerRef::Channel(111),
                111,
                Some("First"),
                vec![recent("https://one.com")],
            )
            .with_channel(
                PeerRef::Bare(333),
                333,
                Some("Third"),
                vec![recent("https://three.com")],
            );

        let channels = [ChannelId(-100111), ChannelId(-100222), ChannelId(333)];
        let document = collect(&mut session, &channels, &Params::default()).await;

        assert_eq!(
            urls(&document),
            vec![(-100111, "https://one.com"), (333, "https://three.com")]
        );
        assert_eq!(document.links[0].source_channel_name, "First");
        assert_eq!(document.links[1].source_channel_name, "Third");
    }

    #[tokio::test]
    async fn skips_channel_with_unreadable_history() {
        let mut session = FakeSession::default()
            .with_broken_history(PeerRef::Channel(111), 111)
            .with_channel(PeerRef::Channel(222), 222, None, vec![recent("https://two.com")]);

        let channels = [ChannelId(-100111), ChannelId(-100222)];
        let document = collect(&mut session, &channels, &Params::default()).await;

        assert_eq!(urls(&document), vec![(-100222, "https://two.com")]);
    }

    #[tokio::test]
    async fn falls_back_to_id_as_channel_name() {
        let mut session = FakeSession::default().with_channel(
            PeerRef::Channel(222),
            222,
            None,
            vec![recent("https://two.com")],
        );

        let document = collect(&mut session, &[ChannelId(-100222)], &Params::default()).await;

        assert_eq!(document.links[0].source_channel_name, "-100222");
    }

    #[tokio::test]
    async fn emits_record_per_link_and_deduplicates_per_message_only() {
        let first = recent("https://a.com https://b.com https://a.com");
        let second = recent("again https://a.com");
        let posted_time = first.posted_at.map(|posted_at| posted_at.to_rfc3339());

        let mut session = FakeSession::default().with_channel(
            PeerRef::Bare(7),
            7,
            Some("Seven"),
            vec![first, recent("no links here"), second],
        );

        let document = collect(&mut session, &[ChannelId(7)], &Params::default()).await;

        assert_eq!(
            urls(&document),
            vec![(7, "https://a.com"), (7, "https://b.com"), (7, "https://a.com")]
        );
        assert_eq!(
            document.links[0].message_text,
            "https://a.com https://b.com https://a.com"
        );
        assert_eq!(document.links[0].posted_time, posted_time);
        assert_eq!(document.links[2].message_text, "again https://a.com");
    }

    #[tokio::test]
    async fn ignores_messages_outside_window() {
        let stale = Message {
            text: "https://old.com".to_owned(),
            posted_at: Some(Utc::now() - Duration::hours(30)),
            ..Default::default()
        };
        let undated = Message {
            text: "https://undated.com".to_owned(),
            ..Default::default()
        };

        let mut session = FakeSession::default().with_channel(
            PeerRef::Bare(7),
            7,
            None,
            vec![recent("https://new.com"), stale, undated],
        );

        let document = collect(&mut session, &[ChannelId(7)], &Params::default()).await;

        assert_eq!(urls(&document), vec![(7, "https://new.com")]);
    }

    #[tokio::test]
    async fn passes_limit_to_session() {
        let mut session = FakeSession::default().with_channel(
            PeerRef::Bare(7),
            7,
            None,
            vec![recent("https://a.com"), recent("https://b.com")],
        );
        let params = Params {
            limit: 1,
            ..Default::default()
        };

        let document = collect(&mut session, &[ChannelId(7)], &params).await;

        assert_eq!(session.requested_limits, vec![1]);
        assert_eq!(urls(&document), vec![(7, "https://a.com")]);
    }

    #[tokio::test]
    async fn releases_session_after_collecting() {
        let mut session = FakeSession::default().with_channel(
            PeerRef::Bare(7),
            7,
            None,
            vec![recent("https://a.com")],
        );

        let document = run_with(&mut session, &[ChannelId(7)], &Params::default()).await;

        assert_eq!(urls(&document), vec![(7, "https://a.com")]);
        assert_eq!(session.disconnects, 1);
    }

    #[tokio::test]
    async fn releases_session_when_every_channel_fails() {
        let mut session = FakeSession::default().with_broken_history(PeerRef::Channel(111), 111);

        let channels = [ChannelId(-100111), ChannelId(-100222)];
        let document = run_with(&mut session, &channels, &Params::default()).await;

        assert!(document.links.is_empty());
        assert_eq!(session.disconnects, 1);
    }

    #[tokio::test]
    async fn timestamp_is_taken_after_collection() {
        let before = Utc::now();
        let mut session = FakeSession::default();

        let document = collect(&mut session, &[], &Params::default()).await;

        let timestamp = chrono::DateTime::parse_from_rfc3339(&document.timestamp).unwrap();
        assert!(timestamp.with_timezone(&Utc) >= before - Duration::microseconds(1));
        assert!(document.links.is_empty());
    }
}
