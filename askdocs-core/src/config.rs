//! Configuration for the askdocs pipeline.
//!
//! Configuration is read at process start and handed to the pipeline as
//! opaque input; no stage reads the environment itself. Structures are
//! serializable and validatable.

use serde::{Deserialize, Serialize};

use crate::{AskdocsError, Result};

/// Default API base URL (OpenRouter, OpenAI-compatible).
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model for expansion and generation.
pub const DEFAULT_SMART_MODEL: &str = "deepseek/deepseek-chat";

/// Default model for relevance grading.
pub const DEFAULT_GRADER_MODEL: &str = "deepseek/deepseek-v3.2-speciale";

/// Default embedding model used by the search backend.
pub const DEFAULT_EMBEDDING_MODEL: &str = "openai/text-embedding-3-small";

/// Configuration for one LLM client.
///
/// # Examples
///
/// ```rust
/// use askdocs_core::config::LlmConfig;
///
/// let config = LlmConfig::new("deepseek/deepseek-chat")
///     .with_api_key("your-api-key")
///     .with_temperature(0.0);
/// assert_eq!(config.temperature, 0.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmConfig {
    /// Model identifier in provider/model form.
    pub model: String,

    /// API key for authentication.
    pub api_key: Option<String>,

    /// API base URL.
    pub base_url: String,

    /// Sampling temperature. The pipeline uses 0.0 throughout for
    /// deterministic grading and generation.
    pub temperature: f32,
}

impl LlmConfig {
    /// Create a new LLM configuration for the given model.
    pub fn new<S: Into<String>>(model: S) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.0,
        }
    }

    /// Set the API key.
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Validate this configuration.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(AskdocsError::configuration("model identifier is empty"));
        }
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(AskdocsError::configuration(format!(
                "missing API key for model {}",
                self.model
            )));
        }
        Ok(())
    }
}

/// Configuration for the concurrent retrieval stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetrievalConfig {
    /// Number of documents each search call returns.
    pub top_k: usize,

    /// Cap on simultaneous in-flight search calls. Effective concurrency
    /// is the smaller of this and the number of queries.
    pub max_concurrency: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 6,
            max_concurrency: 3,
        }
    }
}

/// Full configuration surface for one pipeline process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Client used for expansion and generation.
    pub smart_llm: LlmConfig,

    /// Client used for relevance grading.
    pub grader_llm: LlmConfig,

    /// Embedding model identifier handed to the search backend.
    pub embedding_model: String,

    /// Retrieval stage settings.
    pub retrieval: RetrievalConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            smart_llm: LlmConfig::new(DEFAULT_SMART_MODEL),
            grader_llm: LlmConfig::new(DEFAULT_GRADER_MODEL),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Build a configuration from the process environment.
    ///
    /// Reads `OPENROUTER_API_KEY` (required) and `OPENROUTER_BASE_URL`
    /// (optional, defaults to [`DEFAULT_BASE_URL`]).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| AskdocsError::configuration("OPENROUTER_API_KEY is not set"))?;
        let base_url =
            std::env::var("OPENROUTER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let mut config = Self::default();
        config.smart_llm = config
            .smart_llm
            .with_api_key(api_key.clone())
            .with_base_url(base_url.clone());
        config.grader_llm = config.grader_llm.with_api_key(api_key).with_base_url(base_url);
        Ok(config)
    }

    /// Validate every section of this configuration.
    pub fn validate(&self) -> Result<()> {
        self.smart_llm.validate()?;
        self.grader_llm.validate()?;
        if self.retrieval.top_k == 0 {
            return Err(AskdocsError::configuration("retrieval top_k must be positive"));
        }
        if self.retrieval.max_concurrency == 0 {
            return Err(AskdocsError::configuration(
                "retrieval max_concurrency must be positive",
            ));
        }
        Ok(())
    }
}
