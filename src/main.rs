mod channels;
mod config;
mod config_validators;
mod domain;
mod error;
mod harvester;
mod tg_api;
mod utils;

use argh::FromArgs;
use config::Config;
use std::{path::PathBuf, process};
use utils::PrintErrorChain;

/// Collects links posted in Telegram channels during the last hours.
#[derive(FromArgs)]
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Fetch(FetchArgs),
    Channels(ChannelsArgs),
}

/// Read the configured channels and write the links to a JSON file.
#[derive(FromArgs)]
#[argh(subcommand, name = "fetch")]
struct FetchArgs {
    /// output file, replaced on every run
    #[argh(option, default = "PathBuf::from(\"data.json\")")]
    output: PathBuf,

    /// session file of the Telegram login
    #[argh(option, default = "default_session_path()")]
    session: PathBuf,

    /// how many hours back messages are considered
    #[argh(option, default = "24")]
    window_hours: u32,

    /// how many latest messages are read per channel
    #[argh(option, default = "100")]
    limit: usize,
}

/// List channels and supergroups of the account with their ids.
#[derive(FromArgs)]
#[argh(subcommand, name = "channels")]
struct ChannelsArgs {
    /// session file of the Telegram login
    #[argh(option, default = "default_session_path()")]
    session: PathBuf,
}

fn default_session_path() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_PKG_NAME"), ".session"))
}

#[tokio::main]
async fn main() {
    init_logger();
    hello();

    let args: Args = argh::from_env();

    match run(args).await {
        Ok(()) => {
            process::exit(0);
        }
        Err(err) => {
            log::error!("Fatal error: {err}", err = PrintErrorChain(&err));
            process::exit(1);
        }
    }
}

fn init_logger() {
    let logger = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env();

    if let Err(err) = logger.init() {
        eprintln!("Failed to initialize logger: {err}");
    }
}

fn hello() {
    log::info!(
        "{name} version {version}",
        name = env!("CARGO_BIN_NAME"),
        version = env!("CARGO_PKG_VERSION")
    );
}

async fn run(args: Args) -> error::Result<()> {
    load_dotenv();

    let config = Config::from_env()?;

    match args.command {
        Command::Fetch(args) => fetch(&config, args).await,
        Command::Channels(args) => channels::run(&config, &args.session).await,
    }
}

async fn fetch(config: &Config, args: FetchArgs) -> error::Result<()> {
    if args.window_hours == 0 || args.limit == 0 {
        return Err(error::Error::Configuration(
            "--window-hours and --limit must be greater than zero".to_owned(),
        ));
    }

    log::info!(
        "Configuration loaded, {count} channels to scrape",
        count = config.channel_ids.len()
    );

    let params = harvester::Params {
        window: chrono::Duration::hours(i64::from(args.window_hours)),
        limit: args.limit,
    };

    let document = harvester::run(config, &params, &args.session).await?;
    harvester::persist(&document, &args.output)?;

    log::info!(
        "Fetched {links} links from {channels} channels at {timestamp}",
        links = document.links.len(),
        channels = config.channel_ids.len(),
        timestamp = document.timestamp,
    );

    Ok(())
}

fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => log::debug!("Loaded environment from '{}'", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => log::warn!("Failed to load .env file: {err}"),
    }
}
