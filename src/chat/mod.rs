//! Agriculture Q&A proxy in front of the generative-text API.

use crate::{
    Error, Result,
    config::{ChatConfig, LlmConfig},
    formatter::format_response,
    llm::{ChatCompletionRequest, ChatMessage, LlmClient},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

const QUERY_PLACEHOLDER: &str = "{query}";

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub response: String,
}

pub struct ChatProxy {
    client: Arc<dyn LlmClient>,
    settings: ChatConfig,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl ChatProxy {
    pub fn new(client: Arc<dyn LlmClient>, llm: &LlmConfig, settings: ChatConfig) -> Self {
        Self {
            client,
            settings,
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
        }
    }

    pub fn build_prompt(&self, query: &str) -> String {
        if self.settings.prompt_template.contains(QUERY_PLACEHOLDER) {
            self.settings.prompt_template.replace(QUERY_PLACEHOLDER, query)
        } else {
            format!("{} {}", self.settings.prompt_template, query)
        }
    }

    fn validate(&self, query: &str) -> Result<()> {
        if query.trim().is_empty() {
            return Err(Error::validation("query", "must not be empty"));
        }
        let length = query.chars().count();
        if length > self.settings.max_query_chars {
            return Err(Error::validation(
                "query",
                format!(
                    "is {} characters long, the limit is {}",
                    length, self.settings.max_query_chars
                ),
            ));
        }
        Ok(())
    }

    /// Answers one stateless query. The reply is formatted as an HTML
    /// fragment; an empty completion yields the configured fallback text.
    pub async fn answer(&self, query: &str) -> Result<String> {
        self.validate(query)?;
        info!("Received chat query ({} characters)", query.chars().count());

        let request = ChatCompletionRequest {
            messages: vec![ChatMessage::user(self.build_prompt(query))],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .create_chat_completion(request)
            .await
            .map_err(|e| match e {
                Error::Upstream(detail) => Error::Upstream(detail),
                other => Error::upstream(other.to_string()),
            })?;

        match response.first_content() {
            Some(text) if !text.trim().is_empty() => {
                debug!("Formatting {} characters of model output", text.len());
                Ok(format_response(text))
            }
            _ => {
                warn!("Generative API returned no text for query");
                Ok(self.settings.fallback_message.clone())
            }
        }
    }
}
