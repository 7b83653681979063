#![forbid(unsafe_code)]
#![warn(clippy::default_trait_access)]

mod config;
mod defaults;

use std::path::PathBuf;

use anyhow::{Context, Result};
use client::Client;
use structopt::StructOpt;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use config::{Config, Settings};

const DEFAULT_CONFIG_FILENAME: &str = ".tinymqtt_pub.yaml";

/// Publish one message to an MQTT broker.
#[derive(StructOpt)]
struct Options {
    /// Path of the config file
    #[structopt(short, long)]
    pub config: Option<PathBuf>,

    /// mqtt host to connect to.
    #[structopt(short, long)]
    pub host: Option<String>,

    /// network port to connect to.
    #[structopt(long)]
    pub port: Option<u16>,

    /// user name for the broker.
    #[structopt(short, long)]
    pub username: Option<String>,

    /// password for the broker.
    #[structopt(short, long)]
    pub password: Option<String>,

    /// topic to publish to.
    #[structopt(short, long)]
    pub topic: Option<String>,

    /// message to publish.
    #[structopt(short, long)]
    pub value: Option<String>,

    /// client identifier.
    #[structopt(short = "i", long)]
    pub client_id: Option<String>,

    /// keep alive in seconds.
    #[structopt(short, long)]
    pub keep_alive: Option<u16>,
}

impl Options {
    fn overrides(&self) -> Config {
        Config {
            host: self.host.clone(),
            port: self.port,
            client_id: self.client_id.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            topic: self.topic.clone(),
            value: self.value.clone(),
            keep_alive: self.keep_alive,
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn usage() -> String {
    let mut help = Vec::new();
    if Options::clap().write_help(&mut help).is_err() {
        return String::new();
    }
    String::from_utf8_lossy(&help).into_owned()
}

fn load_config(options: &Options) -> Result<Config> {
    let config_filename = match &options.config {
        Some(config_filename) => Some(config_filename.clone()),
        None => dirs::home_dir()
            .map(|home_dir| home_dir.join(DEFAULT_CONFIG_FILENAME))
            .filter(|path| path.exists()),
    };

    match config_filename {
        Some(config_filename) => {
            tracing::info!(filename = %config_filename.display(), "load config file");
            Config::load(&config_filename)
        }
        None => Ok(Config::default()),
    }
}

async fn run() -> Result<()> {
    let options: Options = Options::from_args();
    let config = options.overrides().or(load_config(&options)?);
    let settings = Settings::resolve(config).map_err(|err| {
        eprintln!("{}", usage());
        err
    })?;

    let mut client = Client::new((settings.host.as_str(), settings.port))
        .client_id(settings.client_id.clone())
        .login(settings.username.clone(), settings.password.clone())
        .keep_alive(settings.keep_alive)
        .build()
        .await
        .with_context(|| format!("connect to {}:{}", settings.host, settings.port))?;

    client
        .publish(settings.topic.clone())
        .payload(settings.value.clone())
        .send()
        .await
        .with_context(|| format!("publish to '{}'", settings.topic))?;
    println!("Published: {}", settings.value);

    client.disconnect().await;
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        tracing::error!(
            error = %format!("{:#}", err),
            "failed to publish message",
        );
        std::process::exit(1);
    }
}
