use agrosarthi_rust::{
    Error, Result,
    llm::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, LlmClient},
    model::Predictor,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Mock predictor answering every call with the same value
#[derive(Debug)]
pub struct MockPredictor {
    pub value: f64,
    pub calls: Arc<Mutex<Vec<Vec<f64>>>>,
    pub error: Option<String>,
}

impl MockPredictor {
    pub fn returning(value: f64) -> Self {
        Self {
            value,
            calls: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            value: 0.0,
            calls: Arc::new(Mutex::new(Vec::new())),
            error: Some(error.to_string()),
        }
    }

    pub fn get_calls(&self) -> Vec<Vec<f64>> {
        self.calls.lock().unwrap().clone()
    }
}

impl Predictor for MockPredictor {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        self.calls.lock().unwrap().push(features.to_vec());

        if let Some(ref error) = self.error {
            return Err(Error::prediction(error.clone()));
        }
        Ok(self.value)
    }
}

/// Mock LLM client for testing
#[derive(Debug)]
pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<ChatCompletionResponse>>>,
    pub requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
    pub error: Option<String>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    pub fn with_text(self, text: &str) -> Self {
        self.add_response(create_text_response(text));
        self
    }

    pub fn with_error(mut self, error: String) -> Self {
        self.error = Some(error);
        self
    }

    pub fn add_response(&self, response: ChatCompletionResponse) {
        self.responses.lock().unwrap().push(response);
    }

    pub fn get_requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.requests.lock().unwrap().push(request);

        if let Some(ref error) = self.error {
            return Err(Error::upstream(error.clone()));
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::upstream("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_text_response(text: &str) -> ChatCompletionResponse {
    ChatCompletionResponse {
        choices: vec![Choice {
            message: ChatMessage::assistant(text),
        }],
    }
}
