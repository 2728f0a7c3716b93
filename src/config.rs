//! Client configuration: TOML file plus command-line overrides.

use std::path::Path;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::error::BoardError;

pub const DEFAULT_HOST: &str = "127.0.0.1:8080";
pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// `host[:port]` of the board server, without scheme.
    pub host: String,
    /// Use https/wss instead of http/ws.
    pub secure: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            secure: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Load a config file. Missing sections and keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, BoardError> {
        let raw = std::fs::read_to_string(path).map_err(|source| BoardError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| BoardError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build the effective config: the file named by `--config` (or defaults),
    /// then any host/scheme flags given on the command line.
    pub fn resolve(args: &Args) -> Result<Self, BoardError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(host) = &args.host {
            config.server.host = host.clone();
        }
        if args.secure {
            config.server.secure = true;
        }
        Ok(config)
    }

    pub fn endpoints(&self) -> Result<Endpoints, BoardError> {
        Endpoints::new(&self.server.host, self.server.secure)
    }
}

/// Fully resolved URLs of every endpoint the client talks to.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub send: Url,
    pub login: Url,
    pub register: Url,
    /// Push endpoint, `ws://<host>/subscribe` or `wss://<host>/subscribe`.
    pub subscribe: String,
}

impl Endpoints {
    pub fn new(host: &str, secure: bool) -> Result<Self, BoardError> {
        let host = host.trim().trim_end_matches('/');
        if host.is_empty() || host.contains('/') || host.contains(char::is_whitespace) {
            return Err(BoardError::InvalidHost(host.to_string()));
        }
        let (http, ws) = if secure { ("https", "wss") } else { ("http", "ws") };
        let base = Url::parse(&format!("{http}://{host}/"))
            .map_err(|_| BoardError::InvalidHost(host.to_string()))?;
        let join = |path: &str| {
            base.join(path)
                .map_err(|_| BoardError::InvalidHost(host.to_string()))
        };

        Ok(Self {
            send: join("send")?,
            login: join("login")?,
            register: join("register")?,
            subscribe: format!("{ws}://{host}/subscribe"),
        })
    }
}
