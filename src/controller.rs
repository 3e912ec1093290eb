//! Pipeline controller: the state machine driving upload → extraction →
//! generation.
//!
//! ## State model
//!
//! The controller's phase is one tagged enum rather than independent
//! loading/error/text flags, so illegal combinations (loading *and* failed,
//! questions without a `Ready` phase) cannot be represented at all:
//!
//! ```text
//! Idle ──file──▶ Extracting ──ok──▶ ExtractedReady ──trigger──▶ Generating ──ok──▶ Ready
//!   ▲               │                                              │
//!   │               └──────────err──────▶ Failed ◀───err───────────┘
//!   └────────────────────sign-out (from any phase)
//! ```
//!
//! `Failed` is not terminal: selecting a new file restarts the pipeline,
//! and a generation failure keeps the extracted text so the user can
//! re-trigger generation without re-uploading.
//!
//! ## Stale completions
//!
//! The two suspension points (extraction, generation) run without holding
//! the state lock. Every file selection and sign-out bumps an epoch
//! counter; an in-flight operation captures the epoch at its start and
//! discards its own result if the counter moved while it was away. A slow
//! extraction of document A can therefore never overwrite state that
//! already belongs to document B.
//!
//! ## Error recovery
//!
//! Every pipeline error is absorbed here: logged via `tracing` for
//! diagnostics, then mapped into `Failed` with the kind's localized user
//! message. Controller methods return snapshots, never `Err`.

use crate::config::GenerationConfig;
use crate::error::Pdf2QaError;
use crate::output::{PhaseKind, PipelineSnapshot, QuestionAnswer};
use crate::pipeline::extract::{LopdfExtractor, TextExtractor};
use crate::pipeline::generate::{HttpQuestionGenerator, QuestionGenerator};
use crate::pipeline::input::{self, UploadedFile};
use crate::prompts;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

/// Internal pipeline phase. Each variant carries exactly the data that is
/// valid in that state.
#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Extracting,
    ExtractedReady {
        text: String,
    },
    Generating {
        text: String,
    },
    Ready {
        text: String,
        questions: Vec<QuestionAnswer>,
    },
    /// `text` is retained when the failure did not invalidate it (a
    /// rejected media type, a failed generation) and dropped when it did
    /// (a failed extraction).
    Failed {
        error: Pdf2QaError,
        text: Option<String>,
    },
}

impl Phase {
    /// Take the extracted text out of the current phase, leaving whatever
    /// the caller is about to overwrite.
    fn take_text(&mut self) -> Option<String> {
        match std::mem::replace(self, Phase::Idle) {
            Phase::ExtractedReady { text }
            | Phase::Generating { text }
            | Phase::Ready { text, .. } => Some(text),
            Phase::Failed { text, .. } => text,
            Phase::Idle | Phase::Extracting => None,
        }
    }

    /// The text a generation request would run on, if one may start now.
    ///
    /// `None` while an operation is in flight or when no text exists —
    /// this is the controller-level guard that keeps the generate trigger
    /// disabled, independent of the prompt builder's own empty-input check.
    fn generation_input(&self) -> Option<String> {
        match self {
            Phase::ExtractedReady { text } | Phase::Ready { text, .. } => Some(text.clone()),
            Phase::Failed {
                text: Some(text), ..
            } if !text.is_empty() => Some(text.clone()),
            _ => None,
        }
    }

    fn to_snapshot(&self) -> PipelineSnapshot {
        match self {
            Phase::Idle => PipelineSnapshot::initial(),
            Phase::Extracting => PipelineSnapshot {
                phase: PhaseKind::Extracting,
                ..PipelineSnapshot::initial()
            },
            Phase::ExtractedReady { text } => PipelineSnapshot {
                phase: PhaseKind::ExtractedReady,
                extracted_text: text.clone(),
                ..PipelineSnapshot::initial()
            },
            Phase::Generating { text } => PipelineSnapshot {
                phase: PhaseKind::Generating,
                extracted_text: text.clone(),
                ..PipelineSnapshot::initial()
            },
            Phase::Ready { text, questions } => PipelineSnapshot {
                phase: PhaseKind::Ready,
                extracted_text: text.clone(),
                questions: questions.clone(),
                error_message: String::new(),
            },
            Phase::Failed { error, text } => PipelineSnapshot {
                phase: PhaseKind::Failed,
                extracted_text: text.clone().unwrap_or_default(),
                questions: Vec::new(),
                error_message: error.user_message().to_string(),
            },
        }
    }
}

struct ControllerState {
    phase: Phase,
    /// Bumped on every file selection and sign-out. In-flight operations
    /// compare their captured value before committing a result.
    epoch: u64,
}

/// Orchestrates the document-to-questions pipeline.
///
/// Cheap to clone; clones share the same state. All methods take `&self` —
/// the state machine guards, not the borrow checker, serialise the
/// pipeline's operations.
#[derive(Clone)]
pub struct PipelineController {
    state: Arc<Mutex<ControllerState>>,
    extractor: Arc<dyn TextExtractor>,
    generator: Arc<dyn QuestionGenerator>,
    config: GenerationConfig,
}

impl std::fmt::Debug for PipelineController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineController").finish_non_exhaustive()
    }
}

impl PipelineController {
    /// Build a controller from configuration, resolving the extraction and
    /// generation adapters.
    pub fn from_config(config: GenerationConfig) -> Result<Self, Pdf2QaError> {
        let extractor = config
            .extractor
            .clone()
            .unwrap_or_else(|| Arc::new(LopdfExtractor::new()));
        let generator = resolve_generator(&config)?;
        Ok(Self {
            state: Arc::new(Mutex::new(ControllerState {
                phase: Phase::Idle,
                epoch: 0,
            })),
            extractor,
            generator,
            config,
        })
    }

    /// Handle a file-selection event.
    ///
    /// Clears any prior error and questions immediately, validates the
    /// media type, then runs extraction. Returns the snapshot after the
    /// transition settles; if a newer selection or a sign-out superseded
    /// this one while extraction was in flight, the stale result is
    /// discarded and the current snapshot is returned unchanged.
    pub async fn select_file(&self, file: UploadedFile) -> PipelineSnapshot {
        let epoch = {
            let mut state = self.state.lock().unwrap();
            state.epoch += 1;
            let retained = state.phase.take_text();

            if let Err(err) = input::validate_media_type(&file.media_type) {
                info!("rejected upload: {}", err);
                state.phase = Phase::Failed {
                    error: err,
                    text: retained,
                };
                return state.phase.to_snapshot();
            }

            state.phase = Phase::Extracting;
            state.epoch
        };

        info!("extracting text from uploaded PDF ({} bytes)", file.bytes.len());
        let result = self.extractor.extract(file).await;

        let mut state = self.state.lock().unwrap();
        if state.epoch != epoch {
            debug!("discarding stale extraction result (epoch {} superseded)", epoch);
            return state.phase.to_snapshot();
        }

        match result {
            Ok(text) => {
                info!("extraction complete: {} chars", text.len());
                state.phase = Phase::ExtractedReady { text };
            }
            Err(err) => {
                error!("extraction failed: {}", err);
                state.phase = Phase::Failed {
                    error: err,
                    text: None,
                };
            }
        }
        state.phase.to_snapshot()
    }

    /// Handle the user's generate trigger.
    ///
    /// Ignored (current snapshot returned) unless extracted text is
    /// available and no operation is in flight, so a double click during
    /// `Generating` cannot start a second request.
    pub async fn generate(&self) -> PipelineSnapshot {
        let (text, epoch) = {
            let mut state = self.state.lock().unwrap();
            let Some(text) = state.phase.generation_input() else {
                debug!("generate trigger ignored: no extracted text available");
                return state.phase.to_snapshot();
            };
            state.phase = Phase::Generating { text: text.clone() };
            (text, state.epoch)
        };

        let prompt = match prompts::build_prompt(&text, self.config.prompt_template.as_deref()) {
            Ok(prompt) => prompt,
            Err(err) => {
                error!("prompt construction failed: {}", err);
                return self.commit_generation_failure(epoch, err, text);
            }
        };

        info!("requesting question generation ({} prompt chars)", prompt.len());
        let result = self.generator.generate(&prompt).await;

        let mut state = self.state.lock().unwrap();
        if state.epoch != epoch {
            debug!("discarding stale generation result (epoch {} superseded)", epoch);
            return state.phase.to_snapshot();
        }

        match result {
            Ok(questions) => {
                info!("generation complete: {} questions", questions.len());
                state.phase = Phase::Ready { text, questions };
            }
            Err(err) => {
                error!("generation failed: {}", err);
                state.phase = Phase::Failed {
                    error: err,
                    text: Some(text),
                };
            }
        }
        state.phase.to_snapshot()
    }

    /// Handle a sign-out event: hard reset to the initial `Idle` state
    /// from any phase, orphaning any in-flight operation.
    pub fn sign_out(&self) {
        let mut state = self.state.lock().unwrap();
        state.epoch += 1;
        state.phase = Phase::Idle;
        info!("session ended; pipeline state discarded");
    }

    /// Forward an authentication change from the identity provider.
    /// Sign-in is a no-op for the pipeline; sign-out is a hard reset.
    pub fn handle_auth_change(&self, signed_in: bool) {
        if !signed_in {
            self.sign_out();
        }
    }

    /// An immutable copy of the current pipeline state.
    pub fn snapshot(&self) -> PipelineSnapshot {
        self.state.lock().unwrap().phase.to_snapshot()
    }

    /// The current state projected for presentation.
    pub fn view(&self) -> crate::view::ViewModel {
        crate::view::ViewModel::from(&self.snapshot())
    }

    fn commit_generation_failure(
        &self,
        epoch: u64,
        err: Pdf2QaError,
        text: String,
    ) -> PipelineSnapshot {
        let mut state = self.state.lock().unwrap();
        if state.epoch != epoch {
            debug!("discarding stale generation failure (epoch {} superseded)", epoch);
            return state.phase.to_snapshot();
        }
        state.phase = Phase::Failed {
            error: err,
            text: Some(text),
        };
        state.phase.to_snapshot()
    }
}

/// Resolve the generation client, from most-specific to least-specific.
///
/// 1. **Pre-built generator** (`config.generator`) — the caller constructed
///    the client entirely; used as-is. This is the test seam.
/// 2. **Configured endpoint** (`config.endpoint`) — an HTTP client is built
///    for it with the configured key and timeout.
/// 3. **Environment** (`PDF2QA_ENDPOINT`, `PDF2QA_API_KEY`) — lets a host
///    application configure the service at the deployment level.
fn resolve_generator(config: &GenerationConfig) -> Result<Arc<dyn QuestionGenerator>, Pdf2QaError> {
    if let Some(ref generator) = config.generator {
        return Ok(Arc::clone(generator));
    }

    let api_key = config.api_key.clone().or_else(|| {
        std::env::var("PDF2QA_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
    });

    if let Some(ref endpoint) = config.endpoint {
        let generator =
            HttpQuestionGenerator::new(endpoint.clone(), api_key, config.api_timeout_secs)?;
        return Ok(Arc::new(generator));
    }

    if let Ok(endpoint) = std::env::var("PDF2QA_ENDPOINT") {
        if !endpoint.is_empty() {
            let generator =
                HttpQuestionGenerator::new(endpoint, api_key, config.api_timeout_secs)?;
            return Ok(Arc::new(generator));
        }
    }

    Err(Pdf2QaError::ServiceNotConfigured {
        hint: "Set GenerationConfig::endpoint (or PDF2QA_ENDPOINT), or inject a generator."
            .into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedExtractor {
        text: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextExtractor for FixedExtractor {
        async fn extract(&self, _file: UploadedFile) -> Result<String, Pdf2QaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.clone())
        }
    }

    struct FixedGenerator {
        result: Result<Vec<QuestionAnswer>, Pdf2QaError>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl QuestionGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<Vec<QuestionAnswer>, Pdf2QaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn controller_with(
        extractor: Arc<FixedExtractor>,
        generator: Arc<FixedGenerator>,
    ) -> PipelineController {
        let config = GenerationConfig::builder()
            .extractor(extractor as Arc<dyn TextExtractor>)
            .generator(generator as Arc<dyn QuestionGenerator>)
            .build()
            .unwrap();
        PipelineController::from_config(config).unwrap()
    }

    fn fixed_extractor(text: &str) -> Arc<FixedExtractor> {
        Arc::new(FixedExtractor {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    fn fixed_generator(
        result: Result<Vec<QuestionAnswer>, Pdf2QaError>,
    ) -> Arc<FixedGenerator> {
        Arc::new(FixedGenerator {
            result,
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn invalid_media_type_never_reaches_the_extractor() {
        let extractor = fixed_extractor("unused");
        let generator = fixed_generator(Ok(vec![]));
        let controller = controller_with(Arc::clone(&extractor), generator);

        let snapshot = controller
            .select_file(UploadedFile::new(b"data".to_vec(), "image/png"))
            .await;

        assert_eq!(snapshot.phase, PhaseKind::Failed);
        assert!(!snapshot.error_message.is_empty());
        assert!(snapshot.extracted_text.is_empty());
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_media_type_retains_previous_text() {
        let extractor = fixed_extractor("previous document text ");
        let generator = fixed_generator(Ok(vec![]));
        let controller = controller_with(extractor, generator);

        controller
            .select_file(UploadedFile::new(b"%PDF".to_vec(), "application/pdf"))
            .await;
        let snapshot = controller
            .select_file(UploadedFile::new(b"x".to_vec(), "text/plain"))
            .await;

        assert_eq!(snapshot.phase, PhaseKind::Failed);
        assert_eq!(snapshot.extracted_text, "previous document text ");
    }

    #[tokio::test]
    async fn generate_without_text_never_reaches_the_generator() {
        let generator = fixed_generator(Ok(vec![]));
        let controller = controller_with(fixed_extractor("unused"), Arc::clone(&generator));

        let snapshot = controller.generate().await;

        assert_eq!(snapshot.phase, PhaseKind::Idle);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn generation_failure_keeps_text_for_retry() {
        let generator = fixed_generator(Err(Pdf2QaError::Generation {
            detail: "service unavailable".into(),
        }));
        let controller = controller_with(fixed_extractor("the text "), Arc::clone(&generator));

        controller
            .select_file(UploadedFile::new(b"%PDF".to_vec(), "application/pdf"))
            .await;
        let failed = controller.generate().await;

        assert_eq!(failed.phase, PhaseKind::Failed);
        assert_eq!(failed.extracted_text, "the text ");
        assert!(failed.questions.is_empty());

        // Re-trigger: still allowed because the text survived.
        let again = controller.generate().await;
        assert_eq!(again.phase, PhaseKind::Failed);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn sign_out_resets_from_any_phase() {
        let generator = fixed_generator(Ok(vec![QuestionAnswer {
            question: "q".into(),
            answer: "a".into(),
        }]));
        let controller = controller_with(fixed_extractor("text "), generator);

        controller
            .select_file(UploadedFile::new(b"%PDF".to_vec(), "application/pdf"))
            .await;
        controller.generate().await;
        assert_eq!(controller.snapshot().phase, PhaseKind::Ready);

        controller.sign_out();
        assert_eq!(controller.snapshot(), PipelineSnapshot::initial());
    }

    #[tokio::test]
    async fn sign_in_event_does_not_disturb_state() {
        let controller = controller_with(fixed_extractor("text "), fixed_generator(Ok(vec![])));
        controller
            .select_file(UploadedFile::new(b"%PDF".to_vec(), "application/pdf"))
            .await;

        controller.handle_auth_change(true);
        assert_eq!(controller.snapshot().phase, PhaseKind::ExtractedReady);

        controller.handle_auth_change(false);
        assert_eq!(controller.snapshot().phase, PhaseKind::Idle);
    }

    #[tokio::test]
    async fn whitespace_only_text_fails_with_empty_input_at_the_prompt_builder() {
        // A PDF of empty pages extracts to whitespace. The controller guard
        // sees a non-empty string, so the prompt builder's check is what
        // catches it.
        let generator = fixed_generator(Ok(vec![]));
        let controller = controller_with(fixed_extractor(" "), Arc::clone(&generator));

        controller
            .select_file(UploadedFile::new(b"%PDF".to_vec(), "application/pdf"))
            .await;
        let snapshot = controller.generate().await;

        assert_eq!(snapshot.phase, PhaseKind::Failed);
        assert!(!snapshot.error_message.is_empty());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unconfigured_service_is_reported_at_construction() {
        // No generator, no endpoint, and no env fallback.
        std::env::remove_var("PDF2QA_ENDPOINT");
        let config = GenerationConfig::default();
        let err = PipelineController::from_config(config).unwrap_err();
        assert!(matches!(err, Pdf2QaError::ServiceNotConfigured { .. }));
    }
}
