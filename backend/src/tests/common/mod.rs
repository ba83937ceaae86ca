// Common test utilities and helpers

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::AppState;
use crate::models::ChatMessage;
use crate::services::tutor::{CompletionClient, CompletionError, TutorService};

/// What the mock returns from `complete`.
pub enum MockReply {
    Answer(String),
    Fail(fn() -> CompletionError),
    Hang,
}

/// One recorded call to the completion API.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

/// In-process `CompletionClient` that records every call.
pub struct MockCompletionClient {
    reply: MockReply,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockCompletionClient {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self { reply: MockReply::Answer(answer.to_string()), calls: Mutex::default() })
    }

    pub fn failing(err: fn() -> CompletionError) -> Arc<Self> {
        Arc::new(Self { reply: MockReply::Fail(err), calls: Mutex::default() })
    }

    pub fn hanging() -> Arc<Self> {
        Arc::new(Self { reply: MockReply::Hang, calls: Mutex::default() })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            messages: messages.to_vec(),
            temperature,
        });

        match &self.reply {
            MockReply::Answer(answer) => Ok(answer.clone()),
            MockReply::Fail(make_err) => Err(make_err()),
            MockReply::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".to_string())
            },
        }
    }
}

pub fn create_test_service(client: Option<Arc<MockCompletionClient>>) -> TutorService {
    create_test_service_with_timeout(client, Duration::from_secs(5))
}

pub fn create_test_service_with_timeout(
    client: Option<Arc<MockCompletionClient>>,
    timeout: Duration,
) -> TutorService {
    TutorService::new(client.map(|c| c as Arc<dyn CompletionClient>), timeout)
}

pub fn create_test_state(client: Option<Arc<MockCompletionClient>>) -> Arc<AppState> {
    Arc::new(AppState { tutor_service: Arc::new(create_test_service(client)) })
}
