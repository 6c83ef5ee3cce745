use crate::{
    config_validators as validators,
    domain::ChannelId,
    error::{Error, Result},
};
use garde::Validate;
use std::env;

pub const API_ID: &str = "API_ID";
pub const API_HASH: &str = "API_HASH";
pub const PHONE_NUMBER: &str = "PHONE_NUMBER";
pub const CHANNELS: &str = "CHANNELS";

/// Settings required to log in and pick the channels to read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Application id from https://my.telegram.org.
    pub api_id: i32,

    /// Application hash paired with `api_id`.
    pub api_hash: String,

    /// Phone number of the account, E.164 format is recommended.
    pub phone_number: String,

    /// Channels to scrape, in processing order.
    pub channel_ids: Vec<ChannelId>,
}

/// Values read from the environment. Numeric fields are parsed on read and
/// their failures are reported through validation.
#[derive(Debug, Validate)]
struct RawConfig {
    #[garde(custom(validators::is_parsed))]
    api_id: std::result::Result<i32, String>,

    #[garde(custom(validators::is_set))]
    api_hash: String,

    #[garde(custom(validators::is_set))]
    phone_number: String,

    #[garde(custom(validators::is_parsed))]
    channels: std::result::Result<Vec<i64>, String>,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Config> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, reporting every missing or
    /// malformed variable at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = RawConfig {
            api_id: validators::parse_api_id(lookup(API_ID).as_deref()),
            api_hash: lookup(API_HASH).unwrap_or_default(),
            phone_number: lookup(PHONE_NUMBER).unwrap_or_default(),
            channels: validators::parse_channel_list(lookup(CHANNELS).as_deref()),
        };

        if let Err(errors) = raw.validate(&()) {
            return Err(Error::Configuration(format!(
                "check variables {API_ID}, {API_HASH}, {PHONE_NUMBER}, {CHANNELS}:\n{errors}"
            )));
        }

        let (Ok(api_id), Ok(channels)) = (raw.api_id, raw.channels) else {
            unreachable!("parse failures should be reported by validation");
        };

        Ok(Config {
            api_id,
            api_hash: raw.api_hash.trim().to_owned(),
            phone_number: raw.phone_number.trim().to_owned(),
            channel_ids: channels.into_iter().map(ChannelId).collect(),
        })
    }
}
