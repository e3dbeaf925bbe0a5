use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Requests understood by the background service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Request {
    #[serde(rename = "translate")]
    Translate { text: String },
    #[serde(rename = "pronounce")]
    Pronounce { text: String },
    #[serde(rename = "pronounce-partial")]
    PronouncePartial { text: String },
    #[serde(rename = "getPluginState")]
    GetPluginState,
    #[serde(rename = "updatePluginState")]
    UpdatePluginState { enabled: bool },
}

impl Request {
    pub const ACTIONS: [&'static str; 5] = [
        "translate",
        "pronounce",
        "pronounce-partial",
        "getPluginState",
        "updatePluginState",
    ];

    pub fn action(&self) -> &'static str {
        match self {
            Request::Translate { .. } => "translate",
            Request::Pronounce { .. } => "pronounce",
            Request::PronouncePartial { .. } => "pronounce-partial",
            Request::GetPluginState => "getPluginState",
            Request::UpdatePluginState { .. } => "updatePluginState",
        }
    }

    /// Parse a raw message into a request or a ready failure response.
    ///
    /// Only a missing or unrecognised `action` is an unknown action; a known
    /// action with the wrong fields is a malformed request.
    pub fn from_json(raw: &str) -> Result<Self, Response> {
        let value: Value = serde_json::from_str(raw).map_err(malformed)?;

        let known = value
            .get("action")
            .and_then(Value::as_str)
            .is_some_and(|action| Self::ACTIONS.iter().any(|known| *known == action));
        if !known {
            return Err(Response::failure("Unknown action", None));
        }

        serde_json::from_value(value).map_err(malformed)
    }
}

fn malformed(e: serde_json::Error) -> Response {
    Response::failure(format!("Malformed request: {e}"), Some(ErrorKind::Schema))
}

/// Error classes preserved across the message boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Configuration,
    Transport,
    Protocol,
    Schema,
}

/// Exactly one of these answers every request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl Response {
    pub fn ok(data: Value) -> Self {
        Self {
            success: Some(true),
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>, kind: Option<ErrorKind>) -> Self {
        Self {
            success: Some(false),
            error: Some(error.into()),
            kind,
            ..Default::default()
        }
    }

    pub fn plugin_state(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }
}
