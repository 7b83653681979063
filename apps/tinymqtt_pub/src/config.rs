use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::defaults;

/// Publisher settings as they appear in the config file or on the command
/// line; anything left out falls back to the next source.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub client_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub topic: Option<String>,
    pub value: Option<String>,
    pub keep_alive: Option<u16>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("load config file '{}'.", path.display()))?;
        Self::parse(&data).with_context(|| format!("parse config file '{}'.", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(data)?)
    }

    /// Fields set in `self` win over those in `other`.
    pub fn or(self, other: Config) -> Config {
        Config {
            host: self.host.or(other.host),
            port: self.port.or(other.port),
            client_id: self.client_id.or(other.client_id),
            username: self.username.or(other.username),
            password: self.password.or(other.password),
            topic: self.topic.or(other.topic),
            value: self.value.or(other.value),
            keep_alive: self.keep_alive.or(other.keep_alive),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub username: String,
    pub password: String,
    pub topic: String,
    pub value: String,
    pub keep_alive: u16,
}

impl Settings {
    pub fn resolve(config: Config) -> Result<Self> {
        let username = config.username.unwrap_or_default();
        let password = config.password.unwrap_or_default();
        if username.is_empty() || password.is_empty() {
            anyhow::bail!("username and password are required");
        }

        Ok(Self {
            host: config.host.unwrap_or_else(|| defaults::HOST.to_string()),
            port: config.port.unwrap_or(defaults::PORT),
            client_id: config
                .client_id
                .unwrap_or_else(|| defaults::CLIENT_ID.to_string()),
            username,
            password,
            topic: config.topic.unwrap_or_else(|| defaults::TOPIC.to_string()),
            value: config.value.unwrap_or_else(|| defaults::VALUE.to_string()),
            keep_alive: config.keep_alive.unwrap_or(defaults::KEEP_ALIVE),
        })
    }
}
