//! Prompt construction for the tutor
//!
//! Pure functions only: template selection from (mode, language) and the
//! assembly of the message list sent to the completion API.

use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;

use crate::models::{ChatMessage, HistoryEntry};

/// Display name used for codes missing from the catalog.
pub const DEFAULT_LANGUAGE_NAME: &str = "English";
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Supported target languages in the order the chat page lists them.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("de", "German"),
    ("fr", "French"),
    ("es", "Spanish"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("pl", "Polish"),
    ("tr", "Turkish"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
];

static LANGUAGE_INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| LANGUAGES.iter().copied().collect());

/// Resolve a language code to the display name used in prompts.
///
/// Unknown codes fall back to [`DEFAULT_LANGUAGE_NAME`].
pub fn language_name(code: &str) -> &'static str {
    LANGUAGE_INDEX.get(code).copied().unwrap_or(DEFAULT_LANGUAGE_NAME)
}

// ============================================================================
// Mode
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Conversation practice with a short Czech critique
    Dialog,
    /// Grammar / vocabulary explanation in Czech
    Explain,
    /// Plain assistant, no tutoring behaviour
    Generic,
}

impl Mode {
    pub const DEFAULT_TAG: &'static str = "dialog";

    /// Exact, case-sensitive match; every unrecognized tag is `Generic`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "dialog" => Self::Dialog,
            "explain" => Self::Explain,
            _ => Self::Generic,
        }
    }

    pub fn system_prompt(&self, language_name: &str) -> String {
        match self {
            Self::Dialog => format!(
                "You are a friendly {language_name} teacher for a Czech-speaking student. \
                 The student is practicing the target language. \
                 Your answer should follow this format:\n\
                 1) First, answer in the target language (2–5 short sentences).\n\
                 2) Then, in Czech, briefly explain mistakes and give 1–2 tips.\n\
                 Use simple vocabulary, A2–B1 level."
            ),
            Self::Explain => format!(
                "You are a {language_name} teacher for a Czech-speaking student. \
                 Explain the requested words or grammar in Czech with examples. \
                 Give several short example sentences in the target language with Czech translation."
            ),
            Self::Generic => GENERIC_PROMPT.to_string(),
        }
    }
}

pub const GENERIC_PROMPT: &str = "You are a helpful assistant.";

// ============================================================================
// Message list
// ============================================================================

/// Build the message list for one completion call.
///
/// Layout: one `system` template, then the valid history turns in their
/// original order, then `message` as the final `user` turn. `message` is
/// used as given; blank-checking belongs to the caller.
pub fn build_messages(
    message: &str,
    mode: &str,
    language_code: &str,
    history: &[Value],
) -> Vec<ChatMessage> {
    let system_prompt = Mode::from_tag(mode).system_prompt(language_name(language_code));

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend(history.iter().filter_map(HistoryEntry::from_value).map(ChatMessage::from));
    messages.push(ChatMessage::user(message));
    messages
}
