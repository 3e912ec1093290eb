//! Configuration for the PDF-to-questions pipeline.
//!
//! Every knob lives in [`GenerationConfig`], built via its
//! [`GenerationConfigBuilder`]. Keeping configuration in one struct makes it
//! trivial to share across tasks and to see in one place why two runs
//! behaved differently.

use crate::error::Pdf2QaError;
use crate::pipeline::extract::TextExtractor;
use crate::pipeline::generate::QuestionGenerator;
use crate::prompts::TEXT_PLACEHOLDER;
use std::fmt;
use std::sync::Arc;

/// Configuration for a [`crate::controller::PipelineController`].
///
/// Built via [`GenerationConfig::builder()`] or
/// [`GenerationConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2qa::GenerationConfig;
///
/// let config = GenerationConfig::builder()
///     .endpoint("https://api.example.com/generate")
///     .api_timeout_secs(30)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GenerationConfig {
    /// URL of the hosted text-generation service.
    ///
    /// If `None` along with `generator`, the controller falls back to the
    /// `PDF2QA_ENDPOINT` environment variable.
    pub endpoint: Option<String>,

    /// Bearer token for the generation service. Optional; when `None` the
    /// `PDF2QA_API_KEY` environment variable is consulted.
    pub api_key: Option<String>,

    /// Per-request timeout for the generation call in seconds. Default: 60.
    ///
    /// This is the only locally-enforced bound on the external call — the
    /// service itself may otherwise hang indefinitely.
    pub api_timeout_secs: u64,

    /// Custom prompt template. If `None`, uses the built-in default, which
    /// asks for Arabic questions in the pinned JSON shape. Must contain the
    /// `{text}` placeholder.
    pub prompt_template: Option<String>,

    /// Pre-constructed generation client. Takes precedence over `endpoint`.
    /// Useful in tests or when the caller needs custom middleware.
    pub generator: Option<Arc<dyn QuestionGenerator>>,

    /// Pre-constructed text extractor. If `None`, the lopdf-backed default
    /// is used.
    pub extractor: Option<Arc<dyn TextExtractor>>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            api_timeout_secs: 60,
            prompt_template: None,
            generator: None,
            extractor: None,
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("prompt_template", &self.prompt_template)
            .field(
                "generator",
                &self.generator.as_ref().map(|_| "<dyn QuestionGenerator>"),
            )
            .field(
                "extractor",
                &self.extractor.as_ref().map(|_| "<dyn TextExtractor>"),
            )
            .finish()
    }
}

impl GenerationConfig {
    /// Create a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = Some(url.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn prompt_template(mut self, template: impl Into<String>) -> Self {
        self.config.prompt_template = Some(template.into());
        self
    }

    pub fn generator(mut self, generator: Arc<dyn QuestionGenerator>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.config.extractor = Some(extractor);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerationConfig, Pdf2QaError> {
        let c = &self.config;
        if c.api_timeout_secs == 0 {
            return Err(Pdf2QaError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        if let Some(ref template) = c.prompt_template {
            if !template.contains(TEXT_PLACEHOLDER) {
                return Err(Pdf2QaError::InvalidConfig(format!(
                    "prompt_template must contain the {TEXT_PLACEHOLDER} placeholder"
                )));
            }
        }
        if let Some(ref endpoint) = c.endpoint {
            if endpoint.trim().is_empty() {
                return Err(Pdf2QaError::InvalidConfig("endpoint must not be empty".into()));
            }
        }
        Ok(self.config)
    }
}
