use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub public_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("TRACKER_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("TRACKER_PORT is not a valid port: {}", raw))?,
            None => 3000,
        };

        Ok(Self {
            host: lookup("TRACKER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: lookup("TRACKER_DB_PATH").unwrap_or_else(|| "tracker.db".into()).into(),
            public_dir: lookup("TRACKER_PUBLIC_DIR").unwrap_or_else(|| "public".into()).into(),
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().with_context(|| format!("invalid listen address {}", addr))
    }
}
