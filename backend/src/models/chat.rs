use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// ============================================================================
// Completion API message list
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One element of the message list sent to the completion API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }
}

/// A prior conversation turn that passed validation.
///
/// Only `user` and `assistant` turns with string content are kept; anything
/// else coming from the client is dropped rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: ChatRole,
    pub content: String,
}

impl HistoryEntry {
    /// Validate one raw history item. Returns `None` for anything malformed.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let role = match raw.get("role")?.as_str()? {
            "user" => ChatRole::User,
            "assistant" => ChatRole::Assistant,
            _ => return None,
        };
        let content = raw.get("content")?.as_str()?;
        Some(Self { role, content: content.to_string() })
    }
}

impl From<HistoryEntry> for ChatMessage {
    fn from(entry: HistoryEntry) -> Self {
        Self { role: entry.role, content: entry.content }
    }
}

// ============================================================================
// POST /ask
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AskRequest {
    /// The learner's message; required to be non-blank
    #[serde(default)]
    pub message: String,
    /// `dialog` (default), `explain`; anything else selects a plain assistant
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub mode: Option<Value>,
    /// Target language code (default `en`); unknown codes mean English
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub language: Option<Value>,
    /// Prior turns as `{role, content}` objects; malformed items are ignored
    #[serde(default)]
    #[schema(value_type = Option<Vec<Object>>)]
    pub history: Option<Value>,
}

impl AskRequest {
    /// Mode tag, or `default` when absent or null.
    pub fn mode_or<'a>(&'a self, default: &'a str) -> &'a str {
        lenient_text(self.mode.as_ref(), default)
    }

    /// Language code, or `default` when absent or null.
    pub fn language_or<'a>(&'a self, default: &'a str) -> &'a str {
        lenient_text(self.language.as_ref(), default)
    }

    /// Raw history items. A `history` value that is not an array counts as no history.
    pub fn history_items(&self) -> &[Value] {
        self.history.as_ref().and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
    }
}

// Non-string values resolve to "", which no mode or language matches, so the
// prompt builder falls back instead of the request failing.
fn lenient_text<'a>(field: Option<&'a Value>, default: &'a str) -> &'a str {
    match field {
        None | Some(Value::Null) => default,
        Some(Value::String(s)) => s.as_str(),
        Some(_) => "",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AskResponse {
    pub answer: String,
}

// ============================================================================
// Auxiliary endpoints
// ============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusResponse {
    pub credential_configured: bool,
    pub model: String,
}
