//! Tutor Service Module
//!
//! Turns a learner's chat message into one completion call.
//!
//! # Architecture
//! ```text
//! POST /ask ──▶ TutorService ──▶ prompt::build_messages
//!                    │
//!                    ▼
//!           ┌──────────────────┐
//!           │ CompletionClient │  ← Trait (generic interface)
//!           └────────┬─────────┘
//!                    ▼
//!              ┌────────────┐
//!              │OpenAIClient│
//!              └────────────┘
//! ```

mod client;
pub mod prompt;
mod service;

pub use client::{CompletionClient, CompletionError, MODEL, OpenAIClient, TEMPERATURE};
pub use prompt::{LANGUAGES, Mode, build_messages, language_name};
pub use service::TutorService;

#[cfg(test)]
mod tests;
