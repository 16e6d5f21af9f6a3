//! Provider selection.
//!
//! The application configures exactly one provider at startup; handlers see
//! a single `complete` call and never branch on the provider themselves.

use crate::{Result, anthropic::AnthropicClient, openai::OpenAiClient};

/// The configured completion provider.
#[derive(Clone)]
pub enum Completions {
  Anthropic(AnthropicClient),
  OpenAi(OpenAiClient),
}

impl Completions {
  /// Invoke the provider with an assembled prompt and return its text
  /// completion. Failures are terminal — no retries.
  pub async fn complete(
    &self,
    prompt: &str,
    max_tokens: Option<u32>,
  ) -> Result<String> {
    match self {
      Completions::Anthropic(c) => c.complete(prompt, max_tokens).await,
      Completions::OpenAi(c) => c.complete(prompt, max_tokens).await,
    }
  }

  pub fn provider_name(&self) -> &'static str {
    match self {
      Completions::Anthropic(_) => "anthropic",
      Completions::OpenAi(_) => "openai",
    }
  }
}
