//! Siumai-backed chat model adapter.
//!
//! Wraps a [`Siumai`] client behind the [`ChatModel`] capability so every
//! pipeline stage talks to one narrow interface. Clients are built with
//! temperature 0 for deterministic grading and generation.

use async_trait::async_trait;

use askdocs_core::{AskdocsError, ChatModel, Result, config::LlmConfig};
use siumai::prelude::*;

/// A chat model backed by the Siumai crate.
///
/// # Examples
///
/// ```rust,no_run
/// use askdocs_core::config::LlmConfig;
/// use askdocs_query::llm::SiumaiChatModel;
///
/// # async fn example() -> askdocs_core::Result<()> {
/// let config = LlmConfig::new("deepseek/deepseek-chat").with_api_key("key");
/// let model = SiumaiChatModel::from_config(&config).await?;
/// # Ok(())
/// # }
/// ```
pub struct SiumaiChatModel {
    client: Siumai,
    model: String,
}

impl std::fmt::Debug for SiumaiChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiumaiChatModel")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl SiumaiChatModel {
    /// Create an adapter over an already-built client.
    pub fn new(client: Siumai, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AskdocsError::Configuration`] when the config is invalid
    /// or the client cannot be constructed.
    pub async fn from_config(config: &LlmConfig) -> Result<Self> {
        config.validate()?;
        let api_key = config.api_key.as_deref().unwrap_or_default();

        let client = Siumai::builder()
            .openai()
            .api_key(api_key)
            .base_url(&config.base_url)
            .model(&config.model)
            .temperature(config.temperature)
            .build()
            .await
            .map_err(|e| {
                AskdocsError::configuration(format!(
                    "failed to build client for {}: {e}",
                    config.model
                ))
            })?;

        Ok(Self::new(client, config.model.clone()))
    }
}

#[async_trait]
impl ChatModel for SiumaiChatModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let messages = vec![ChatMessage::user(prompt).build()];

        let response = self
            .client
            .chat(messages)
            .await
            .map_err(|e| AskdocsError::llm(format!("chat completion failed: {e}")))?;

        match &response.content {
            siumai::MessageContent::Text(text) => Ok(text.clone()),
            _ => Err(AskdocsError::llm("unsupported content type in LLM response")),
        }
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
