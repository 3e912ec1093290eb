//! State projection: map a pipeline snapshot onto the view model consumed
//! by the presentation layer.
//!
//! The projection is pure — no I/O, no mutation — and the derived flags are
//! defined exactly once here: `loading` is true during the two in-flight
//! phases, and the generate trigger is available exactly when text exists
//! and nothing is in flight.

use crate::output::{PhaseKind, PipelineSnapshot, QuestionAnswer};
use serde::Serialize;

/// Immutable view of the pipeline for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    /// True exactly during `Extracting` and `Generating`.
    pub loading: bool,
    /// Localized message; empty unless the pipeline failed.
    pub error_message: String,
    /// Whether extracted text is present.
    pub has_extracted_text: bool,
    /// Whether the generate trigger should be offered.
    pub can_generate: bool,
    /// Generated questions in service order; empty unless ready.
    pub questions: Vec<QuestionAnswer>,
}

impl From<&PipelineSnapshot> for ViewModel {
    fn from(snapshot: &PipelineSnapshot) -> Self {
        let loading = matches!(
            snapshot.phase,
            PhaseKind::Extracting | PhaseKind::Generating
        );
        let has_extracted_text = !snapshot.extracted_text.is_empty();
        Self {
            loading,
            error_message: snapshot.error_message.clone(),
            has_extracted_text,
            can_generate: has_extracted_text && !loading,
            questions: snapshot.questions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(phase: PhaseKind, text: &str, error: &str) -> PipelineSnapshot {
        PipelineSnapshot {
            phase,
            extracted_text: text.to_string(),
            questions: Vec::new(),
            error_message: error.to_string(),
        }
    }

    #[test]
    fn loading_is_true_exactly_during_inflight_phases() {
        for (phase, expected) in [
            (PhaseKind::Idle, false),
            (PhaseKind::Extracting, true),
            (PhaseKind::ExtractedReady, false),
            (PhaseKind::Generating, true),
            (PhaseKind::Ready, false),
            (PhaseKind::Failed, false),
        ] {
            let view = ViewModel::from(&snapshot(phase, "", ""));
            assert_eq!(view.loading, expected, "phase {phase:?}");
        }
    }

    #[test]
    fn generate_trigger_requires_text_and_no_inflight_operation() {
        let ready = ViewModel::from(&snapshot(PhaseKind::ExtractedReady, "text ", ""));
        assert!(ready.can_generate);

        let generating = ViewModel::from(&snapshot(PhaseKind::Generating, "text ", ""));
        assert!(!generating.can_generate);

        let idle = ViewModel::from(&snapshot(PhaseKind::Idle, "", ""));
        assert!(!idle.can_generate);
    }

    #[test]
    fn failed_with_retained_text_still_offers_the_trigger() {
        let view = ViewModel::from(&snapshot(PhaseKind::Failed, "text ", "رسالة خطأ"));
        assert!(view.can_generate);
        assert_eq!(view.error_message, "رسالة خطأ");
    }

    #[test]
    fn questions_pass_through_unchanged() {
        let mut s = snapshot(PhaseKind::Ready, "text ", "");
        s.questions = vec![
            QuestionAnswer {
                question: "q1".into(),
                answer: "a1".into(),
            },
            QuestionAnswer {
                question: "q2".into(),
                answer: "a2".into(),
            },
        ];
        let view = ViewModel::from(&s);
        assert_eq!(view.questions.len(), 2);
        assert_eq!(view.questions[0].question, "q1");
    }
}
