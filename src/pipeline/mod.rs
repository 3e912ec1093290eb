//! Pipeline stages for PDF-to-questions conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping the
//! stages separate makes each independently testable and lets us swap
//! implementations (a different PDF backend, a different generation
//! service) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ (prompts) ──▶ generate
//! (media    (lopdf,     (template)    (HTTP, schema
//!  type)     per page)                 check)
//! ```
//!
//! 1. [`input`]    — validate the declared media type before any work
//! 2. [`extract`]  — parse the PDF bytes and concatenate per-page text;
//!    runs in `spawn_blocking` because lopdf is CPU-bound
//! 3. [`generate`] — drive the generation service call and enforce the
//!    response shape; the only stage with network I/O
//!
//! Prompt construction sits between 2 and 3 but lives in
//! [`crate::prompts`] so the template is a single source of truth.

pub mod extract;
pub mod generate;
pub mod input;
