//! Anthropic messages-API client.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const API_BASE: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic completion client. One prompt in, one text completion out.
#[derive(Clone)]
pub struct AnthropicClient {
  client:  reqwest::Client,
  api_key: String,
  model:   String,
}

impl AnthropicClient {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      client:  reqwest::Client::new(),
      api_key: api_key.into(),
      model:   DEFAULT_MODEL.to_string(),
    }
  }

  /// Create a client from the `ANTHROPIC_API_KEY` environment variable.
  pub fn from_env() -> Result<Self> {
    let api_key =
      std::env::var("ANTHROPIC_API_KEY").map_err(|_| Error::NoApiKey)?;
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
    let body = MessagesRequest {
      model:      &self.model,
      max_tokens: max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
      messages:   vec![Message { role: "user", content: prompt }],
    };

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
      "x-api-key",
      HeaderValue::from_str(&self.api_key)
        .map_err(|_| Error::NoApiKey)?,
    );
    headers
      .insert("anthropic-version", HeaderValue::from_static(API_VERSION));

    let response = self
      .client
      .post(format!("{API_BASE}/messages"))
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

    let parsed: MessagesResponse = response
      .json()
      .await
      .map_err(|e| Error::Parse(e.to_string()))?;

    extract_text(&parsed)
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct MessagesRequest<'a> {
  model:      &'a str,
  max_tokens: u32,
  messages:   Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
  role:    &'a str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
  content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
  #[serde(rename = "text")]
  Text { text: String },
  #[serde(other)]
  Other,
}

/// First text block of the response, or a parse failure when the model
/// returned none.
fn extract_text(response: &MessagesResponse) -> Result<String> {
  response
    .content
    .iter()
    .find_map(|block| match block {
      ContentBlock::Text { text } => Some(text.clone()),
      ContentBlock::Other => None,
    })
    .ok_or_else(|| Error::Parse("response contained no text block".into()))
}
