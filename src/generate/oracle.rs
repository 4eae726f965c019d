//! Client for the OpenAI-compatible completion oracle.
//!
//! One request per generation attempt, JSON-object response format, explicit
//! timeout, no retry. Every failure surfaces as an `OracleError` the
//! orchestrator turns into an in-band generation error.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from the completion oracle.
#[derive(Debug, Error, Clone)]
pub enum OracleError {
    /// Network/HTTP request failed
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Request exceeded the configured timeout
    #[error("Completion request timed out")]
    Timeout,

    /// Response carried no choices
    #[error("Model returned empty response")]
    EmptyResponse,

    /// First choice carried no content
    #[error("Model returned empty content")]
    EmptyContent,

    /// Content did not parse as the expected JSON object
    #[error("Failed to parse model response")]
    Malformed,
}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OracleError::Timeout
        } else {
            OracleError::Transport {
                message: err.to_string(),
            }
        }
    }
}

/// Configuration for the completion oracle.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Base URL of the OpenAI-compatible endpoint
    pub base_url: String,
    /// API key sent as a bearer token
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl OracleConfig {
    /// Builds a config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            if !base_url.is_empty() {
                config.base_url = base_url;
            }
        }
        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            config.api_key = api_key;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            if !model.is_empty() {
                config.model = model;
            }
        }
        config
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    response_format: ResponseFormat,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

/// The oracle's selection payload.
#[derive(Debug, Deserialize)]
struct SelectionPayload {
    #[serde(default)]
    class_ids: Vec<String>,
}

/// Completion oracle client.
pub struct OracleClient {
    client: Client,
    config: OracleConfig,
}

impl OracleClient {
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| OracleError::Transport {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, config })
    }

    /// Sends one chat completion at temperature 1.0 and returns the raw
    /// content of the first choice.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, OracleError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 1.0,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            stream: false,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        info!(model = %self.config.model, "Requesting schedule completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let parsed = response.json::<ChatResponse>().await?;
        let Some(first) = parsed.choices.into_iter().next() else {
            return Err(OracleError::EmptyResponse);
        };
        let content = first.message.content.unwrap_or_default();
        if content.is_empty() {
            return Err(OracleError::EmptyContent);
        }

        debug!(chars = content.len(), "Received completion content");
        Ok(content)
    }
}

/// Parses the oracle's `{"class_ids": [...]}` payload.
pub fn parse_class_ids(content: &str) -> Result<Vec<String>, OracleError> {
    let payload: SelectionPayload =
        serde_json::from_str(content).map_err(|_| OracleError::Malformed)?;
    Ok(payload.class_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_class_ids() {
        let ids = parse_class_ids(r#"{"class_ids": ["CPSC-350-01", "MATH-110-02"]}"#).unwrap();
        assert_eq!(ids, vec!["CPSC-350-01", "MATH-110-02"]);
    }

    #[test]
    fn test_parse_class_ids_missing_key_is_empty() {
        let ids = parse_class_ids(r#"{"schedule": []}"#).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_parse_class_ids_malformed() {
        assert!(matches!(
            parse_class_ids("not json at all"),
            Err(OracleError::Malformed)
        ));
    }

    #[test]
    fn test_request_wire_shape() {
        let request = ChatRequest {
            model: "test-model",
            messages: vec![ChatMessage {
                role: "system",
                content: "hello",
            }],
            temperature: 1.0,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["temperature"], 1.0);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["stream"], false);
    }
}
