use serde::{Deserialize, Serialize};

use crate::config::SummarizationConfig;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SummaryResult {
    pub text: String,
}

pub trait SummaryClient {
    fn summarize(&self, prompt: &str) -> AppResult<SummaryResult>;
}

/// Chat-completion client for the Groq OpenAI-compatible endpoint.
///
/// The API key is passed in explicitly at construction time; nothing is read
/// from or written to the process environment.
pub struct GroqClient {
    api_key: String,
    endpoint: String,
    model_id: String,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
}

#[derive(Debug, Serialize, PartialEq)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
}

#[derive(Debug, Serialize, PartialEq)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl GroqClient {
    pub fn new(api_key: String, config: &SummarizationConfig) -> Self {
        Self {
            api_key,
            endpoint: config.endpoint.clone(),
            model_id: config.model_id.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model_id,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
        }
    }
}

impl SummaryClient for GroqClient {
    fn summarize(&self, prompt: &str) -> AppResult<SummaryResult> {
        let client = reqwest::blocking::Client::new();
        let response = client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .map_err(|error| AppError::Summarization(format!("request failed: {error}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_else(|_| "unknown error".to_owned());
            return Err(AppError::Summarization(format!(
                "endpoint returned {status}: {}",
                body.trim()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|error| AppError::Summarization(format!("malformed response: {error}")))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Summarization("response contained no choices".to_owned()))?;

        Ok(SummaryResult {
            text: choice.message.content,
        })
    }
}
