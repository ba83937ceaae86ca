use std::sync::Arc;
use std::time::Duration;

use crate::models::{AskRequest, ChatMessage};
use crate::services::tutor::client::{CompletionClient, CompletionError, MODEL, TEMPERATURE};
use crate::services::tutor::prompt::{DEFAULT_LANGUAGE_CODE, Mode, build_messages};
use crate::utils::{ApiError, ApiResult};

/// Request handling core behind `POST /ask`.
///
/// Holds only immutable, startup-provided state; one instance serves all
/// concurrent requests.
pub struct TutorService {
    client: Option<Arc<dyn CompletionClient>>,
    timeout: Duration,
}

impl TutorService {
    /// `client` is `None` when no completion-API credential was configured.
    pub fn new(client: Option<Arc<dyn CompletionClient>>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub fn model(&self) -> &'static str {
        MODEL
    }

    /// Validate the request, call the model once and return the trimmed answer.
    ///
    /// Blank messages are rejected before the credential check, and neither
    /// rejection touches the network.
    pub async fn ask(&self, req: &AskRequest) -> ApiResult<String> {
        let message = req.message.trim();
        if message.is_empty() {
            return Err(ApiError::EmptyInput);
        }

        let client = self.client.as_ref().ok_or(ApiError::MissingCredential)?;

        let mode = req.mode_or(Mode::DEFAULT_TAG);
        let language = req.language_or(DEFAULT_LANGUAGE_CODE);
        let messages = build_messages(message, mode, language, req.history_items());

        tracing::info!(
            mode = mode,
            language = language,
            history = messages.len() - 2,
            "Forwarding tutor request"
        );

        let answer = self.complete_with_timeout(client.as_ref(), &messages).await?;
        Ok(answer.trim().to_string())
    }

    async fn complete_with_timeout(
        &self,
        client: &dyn CompletionClient,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        let started = std::time::Instant::now();
        let result = tokio::time::timeout(self.timeout, client.complete(MODEL, messages, TEMPERATURE))
            .await
            .unwrap_or_else(|_| Err(CompletionError::Timeout(self.timeout.as_secs())));

        match &result {
            Ok(_) => tracing::debug!("Completion finished in {} ms", started.elapsed().as_millis()),
            Err(e) => tracing::warn!(
                "Completion failed after {} ms: {}",
                started.elapsed().as_millis(),
                e
            ),
        }
        result
    }
}
