//! Error types for the pdf2qa library.
//!
//! One enum covers every failure the pipeline can produce. Each variant
//! carries enough context for a diagnostic log line, while
//! [`Pdf2QaError::user_message`] maps every variant onto the localized
//! string shown to the user. The mapping is total: a new variant without a
//! user message is a compile error in the `match`, not a blank label at
//! runtime.
//!
//! None of these errors escape the [`crate::controller::PipelineController`]
//! boundary during normal operation — the controller recovers each of them
//! into its `Failed` state, and the user recovers from `Failed` by selecting
//! a new file.

use thiserror::Error;

/// All errors produced by the pdf2qa pipeline.
#[derive(Debug, Clone, Error)]
pub enum Pdf2QaError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The uploaded file's declared media type is not `application/pdf`.
    ///
    /// Raised before any extraction work starts; the file bytes are never
    /// inspected.
    #[error("Unsupported media type '{media_type}': only application/pdf is accepted")]
    InvalidFileType { media_type: String },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The byte stream could not be parsed as a PDF, or a page's text could
    /// not be decoded. A single unreadable page fails the whole extraction.
    #[error("Text extraction failed: {detail}")]
    Extraction { detail: String },

    // ── Generation errors ─────────────────────────────────────────────────
    /// Generation was requested for empty or whitespace-only text.
    ///
    /// Checked before any external call is issued.
    #[error("No extracted text to generate questions from")]
    EmptyInput,

    /// The text-generation service call failed: transport error, timeout,
    /// authentication rejection, non-success status, or a body that is not
    /// JSON at all.
    #[error("Question generation failed: {detail}")]
    Generation { detail: String },

    /// The service returned well-formed JSON that is not an ordered list of
    /// `{question, answer}` records.
    #[error("Generation response has an unexpected shape: {detail}")]
    Schema { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// No generation service endpoint could be resolved from config or
    /// environment.
    #[error("Text-generation service is not configured.\n{hint}")]
    ServiceNotConfigured { hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Pdf2QaError {
    /// The localized message surfaced to the user for this error kind.
    ///
    /// Diagnostic detail stays in the `Display` impl and the logs; the user
    /// sees one short sentence per kind, in the application's UI language.
    pub fn user_message(&self) -> &'static str {
        match self {
            Pdf2QaError::InvalidFileType { .. } => "يرجى تحميل ملف PDF صالح.",
            Pdf2QaError::Extraction { .. } => "خطأ في قراءة الملف. يرجى المحاولة مرة أخرى.",
            Pdf2QaError::EmptyInput => "لا يوجد نص لتحويله إلى أسئلة.",
            Pdf2QaError::Generation { .. }
            | Pdf2QaError::Schema { .. }
            | Pdf2QaError::ServiceNotConfigured { .. }
            | Pdf2QaError::InvalidConfig(_) => {
                "حدث خطأ أثناء إنشاء الأسئلة. يرجى المحاولة مرة أخرى."
            }
        }
    }
}
