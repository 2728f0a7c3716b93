//! Crate-level error type.

use std::path::PathBuf;

/// Errors that can occur while talking to the board server or loading config.
///
/// Each variant carries the URL or path involved so a log line is enough to
/// diagnose the failure.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// The request could not be sent or the response body could not be read.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// The response body was not the JSON shape the form expects.
    #[error("could not decode response from {url}: {detail}")]
    Decode { url: String, detail: String },
    /// A submission was redirected more times than the client follows.
    #[error("too many redirects starting from {url}")]
    TooManyRedirects { url: String },
    /// The push endpoint refused the WebSocket handshake.
    #[error("subscription to {url} failed: {source}")]
    Subscribe {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
    /// The configured host does not form a valid URL.
    #[error("invalid server address '{0}'")]
    InvalidHost(String),
    #[error("could not read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// The request body could not be serialized.
    #[error("could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}
