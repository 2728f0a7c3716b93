//! JSON bodies exchanged with the board server.

use serde::{Deserialize, Serialize};

/// Body of `POST /send`.
#[derive(Debug, Serialize)]
pub struct MessagePayload<'a> {
    pub msg: &'a str,
}

/// Body of `POST /login` and `POST /register`.
#[derive(Debug, Serialize)]
pub struct CredentialPayload<'a> {
    pub username: &'a str,
}

/// Reply to `POST /send`.
///
/// `err` is kept as raw JSON: the page treats `null`, `false`, `0` and `""` as
/// "no error" and shows any other value as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendReply {
    #[serde(default)]
    pub err: serde_json::Value,
}

impl SendReply {
    /// Text written to the error element. Strings are shown bare, `null` as
    /// empty, everything else as its JSON text.
    pub fn error_text(&self) -> String {
        match &self.err {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// The server accepted the message: `err` is absent or falsy.
    pub fn is_accepted(&self) -> bool {
        match &self.err {
            serde_json::Value::Null => true,
            serde_json::Value::Bool(b) => !b,
            serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
            serde_json::Value::String(s) => s.is_empty(),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => false,
        }
    }
}

/// Decode a login/registration failure body.
///
/// The server replies with a bare JSON string; any other JSON value is shown
/// as its JSON text.
pub fn decode_error_body(body: &str) -> Result<String, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}
