//! OpenAI chat-completions client.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";

/// OpenAI completion client. One prompt in, one text completion out.
#[derive(Clone)]
pub struct OpenAiClient {
  client:  reqwest::Client,
  api_key: String,
  model:   String,
}

impl OpenAiClient {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      client:  reqwest::Client::new(),
      api_key: api_key.into(),
      model:   DEFAULT_MODEL.to_string(),
    }
  }

  /// Create a client from the `OPENAI_API_KEY` environment variable.
  pub fn from_env() -> Result<Self> {
    let api_key =
      std::env::var("OPENAI_API_KEY").map_err(|_| Error::NoApiKey)?;
    Ok(Self::new(api_key))
  }

  /// Override the default model.
  pub fn with_model(mut self, model: impl Into<String>) -> Self {
    self.model = model.into();
    self
  }

  /// Send a completion request and return the text of the response.
  pub async fn complete(
    &self,
    prompt: &str,
    max_tokens: Option<u32>,
  ) -> Result<String> {
    let body = ChatRequest {
      model:      &self.model,
      max_tokens,
      messages:   vec![ChatMessage { role: "system", content: prompt }],
    };

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
      AUTHORIZATION,
      HeaderValue::from_str(&format!("Bearer {}", self.api_key))
        .map_err(|_| Error::NoApiKey)?,
    );

    let response = self
      .client
      .post(format!("{API_BASE}/chat/completions"))
      .headers(headers)
      .json(&body)
      .send()
      .await
      .map_err(|e| Error::Network(e.to_string()))?;

    if !response.status().is_success() {
      let status = response.status().as_u16();
      let message = response.text().await.unwrap_or_default();
      return Err(Error::Api { status, message });
    }

    let parsed: ChatResponse = response
      .json()
      .await
      .map_err(|e| Error::Parse(e.to_string()))?;

    extract_text(&parsed)
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
  model:      &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
  messages:   Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
  role:    &'a str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
  message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
  content: Option<String>,
}

/// Message content of the first choice, or a parse failure when absent.
fn extract_text(response: &ChatResponse) -> Result<String> {
  response
    .choices
    .first()
    .and_then(|c| c.message.content.clone())
    .ok_or_else(|| Error::Parse("response contained no message content".into()))
}
