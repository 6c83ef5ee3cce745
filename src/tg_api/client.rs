use super::{converter, Session};
use crate::{
    config::Config,
    domain::{ChannelHandle, DialogInfo, Message, PeerRef},
    error::{Error, Result},
};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use grammers_client::{types::Chat, Client as TgClient, Config as TgConfig, InitParams, SignInError};
use grammers_session::Session as TgSession;
use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

/// Telegram user client backed by `grammers`.
pub struct Client {
    client: TgClient,
    session_path: PathBuf,

    /// Chats of the account in dialog order, loaded on first use.
    chats: Vec<Chat>,
    chats_loaded: bool,
}

impl Client {
    /// Connects with the session stored at `session_path` and logs in if the
    /// session is not authorized yet.
    ///
    /// The first login is interactive: the login code and, when two-step
    /// verification is enabled, the password are read from stdin.
    pub async fn authenticate(config: &Config, session_path: &Path) -> Result<Self> {
        let dpath = session_path.display();

        let session = TgSession::load_file_or_create(session_path)
            .map_err(|err| Error::Authentication(format!("loading session '{dpath}': {err}")))?;

        let client = TgClient::connect(TgConfig {
            session,
            api_id: config.api_id,
            api_hash: config.api_hash.clone(),
            params: InitParams::default(),
        })
        .await
        .map_err(|err| Error::Authentication(format!("connecting to Telegram: {err}")))?;

        let is_authorized = client
            .is_authorized()
            .await
            .map_err(|err| Error::Authentication(format!("checking authorization: {err}")))?;

        if !is_authorized {
            log::info!("Session '{dpath}' is not authorized, signing in...");

            sign_in(&client, &config.phone_number).await?;

            client.session().save_to_file(session_path).map_err(|err| {
                Error::Authentication(format!("saving session to '{dpath}': {err}"))
            })?;

            log::info!("Signed in, session saved to '{dpath}'");
        }

        Ok(Self {
            client,
            session_path: session_path.to_owned(),
            chats: Vec::new(),
            chats_loaded: false,
        })
    }

    async fn load_chats(&mut self) -> anyhow::Result<()> {
        if self.chats_loaded {
            return Ok(());
        }

        let mut dialogs = self.client.iter_dialogs();
        while let Some(dialog) = dialogs.next().await.context("listing dialogs")? {
            self.chats.push(dialog.chat().clone());
        }

        log::debug!("Loaded {} dialogs", self.chats.len());

        self.chats_loaded = true;
        Ok(())
    }

    fn find_chat(&self, id: i64) -> Option<&Chat> {
        self.chats.iter().find(|chat| chat.id() == id)
    }
}

#[async_trait]
impl Session for Client {
    async fn resolve_entity(&mut self, peer: PeerRef) -> anyhow::Result<ChannelHandle> {
        self.load_chats().await?;

        let chat = match peer {
            PeerRef::Channel(id) => self
                .chats
                .iter()
                .find(|chat| chat.id() == id && is_broadcast_or_supergroup(chat)),
            PeerRef::Bare(id) => self.find_chat(id),
        };

        let Some(chat) = chat else {
            return Err(anyhow!(
                "no channel matching {peer:?} among the account's dialogs, \
                 is the account a member?"
            ));
        };

        let title = Some(chat.name().to_owned()).filter(|title| !title.is_empty());

        Ok(ChannelHandle {
            id: chat.id(),
            title,
        })
    }

    async fn fetch_messages(
        &mut self,
        handle: &ChannelHandle,
        limit: usize,
    ) -> anyhow::Result<Vec<Message>> {
        let chat = self
            .find_chat(handle.id)
            .ok_or_else(|| anyhow!("chat {} is not resolved", handle.id))?
            .pack();

        let mut messages = Vec::new();
        let mut iter = self.client.iter_messages(chat).limit(limit);

        while let Some(message) = iter
            .next()
            .await
            .with_context(|| format!("reading history of chat {}", handle.id))?
        {
            messages.push(converter::message(&message));
        }

        Ok(messages)
    }

    async fn list_dialogs(&mut self) -> anyhow::Result<Vec<DialogInfo>> {
        self.load_chats().await?;

        Ok(self
            .chats
            .iter()
            .map(|chat| DialogInfo {
                name: chat.name().to_owned(),
                id: chat.id(),
                is_broadcast: matches!(chat, Chat::Channel(_)),
                is_supergroup: matches!(chat, Chat::Group(group) if group.is_megagroup()),
            })
            .collect())
    }

    async fn disconnect(&mut self) -> anyhow::Result<()> {
        let dpath = self.session_path.display();

        self.client
            .session()
            .save_to_file(&self.session_path)
            .with_context(|| format!("saving session to '{dpath}'"))?;

        log::debug!("Session saved to '{dpath}'");

        Ok(())
    }
}

fn is_broadcast_or_supergroup(chat: &Chat) -> bool {
    match chat {
        Chat::Channel(_) => true,
        Chat::Group(group) => group.is_megagroup(),
        Chat::User(_) => false,
    }
}

async fn sign_in(client: &TgClient, phone_number: &str) -> Result<()> {
    let token = client
        .request_login_code(phone_number)
        .await
        .map_err(|err| Error::Authentication(format!("requesting login code: {err}")))?;

    let code = prompt("Enter the code you received: ")?;

    match client.sign_in(&token, &code).await {
        Ok(_) => Ok(()),
        Err(SignInError::PasswordRequired(password_token)) => {
            let hint = password_token.hint().unwrap_or("none").to_owned();
            let password = prompt(&format!("Enter the password (hint: {hint}): "))?;

            client
                .check_password(password_token, password)
                .await
                .map(|_| ())
                .map_err(|err| Error::Authentication(format!("checking password: {err}")))
        }
        Err(err) => Err(Error::Authentication(format!("signing in: {err}"))),
    }
}

fn prompt(message: &str) -> Result<String> {
    let read = || -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(message.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_owned())
    };

    read().map_err(|err| Error::Authentication(format!("reading from terminal: {err}")))
}
