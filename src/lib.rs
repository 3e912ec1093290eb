//! # pdf2qa
//!
//! Turn an uploaded PDF document into a structured list of question/answer
//! pairs using a hosted text-generation service.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF upload
//!  │
//!  ├─ 1. Validate  declared media type must be application/pdf
//!  ├─ 2. Extract   per-page text via lopdf (CPU-bound, spawn_blocking)
//!  ├─ 3. Prompt    fixed instruction template + extracted text verbatim
//!  ├─ 4. Generate  one HTTP call to the generation service (JSON shape)
//!  └─ 5. Project   phase → loading flag, error message, question list
//! ```
//!
//! The [`controller::PipelineController`] owns the sequencing as an explicit
//! state machine: `Idle → Extracting → ExtractedReady → Generating → Ready`,
//! with a recoverable `Failed` state and a hard reset on sign-out. A stale
//! completion — extraction or generation finishing after a newer document
//! superseded it — is detected and discarded, never committed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2qa::{GenerationConfig, PipelineController, UploadedFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Endpoint auto-detected from PDF2QA_ENDPOINT / PDF2QA_API_KEY
//!     let config = GenerationConfig::builder()
//!         .endpoint("https://api.example.com/generate")
//!         .build()?;
//!     let controller = PipelineController::from_config(config)?;
//!
//!     let bytes = std::fs::read("document.pdf")?;
//!     controller
//!         .select_file(UploadedFile::new(bytes, "application/pdf"))
//!         .await;
//!     let snapshot = controller.generate().await;
//!     for qa in &snapshot.questions {
//!         println!("{}\n{}\n", qa.question, qa.answer);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Seams
//!
//! The two external capabilities are traits, injected through
//! [`config::GenerationConfig`]:
//!
//! | Seam | Default |
//! |------|---------|
//! | [`pipeline::extract::TextExtractor`] | lopdf-backed per-page extraction |
//! | [`pipeline::generate::QuestionGenerator`] | one JSON POST via reqwest |
//!
//! Identity management stays outside the pipeline: subscribe to an
//! [`session::AuthSession`] and forward sign-outs into
//! [`controller::PipelineController::handle_auth_change`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod controller;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod session;
pub mod view;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GenerationConfig, GenerationConfigBuilder};
pub use controller::PipelineController;
pub use error::Pdf2QaError;
pub use output::{PhaseKind, PipelineSnapshot, QuestionAnswer};
pub use pipeline::extract::{LopdfExtractor, TextExtractor};
pub use pipeline::generate::{HttpQuestionGenerator, QuestionGenerator};
pub use pipeline::input::{UploadedFile, PDF_MEDIA_TYPE};
pub use session::{AuthSession, AuthSubscription};
pub use view::ViewModel;
