//! Output types: generated questions and the pipeline state snapshot.

use serde::{Deserialize, Serialize};

/// A single generated question with its answer.
///
/// Produced only as part of the ordered list returned by the generation
/// service. Both fields are mandatory in the wire payload; either may be an
/// empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

/// Which discrete state the pipeline controller is in.
///
/// The controller's internal phase carries data (extracted text, questions,
/// error); this tag is the data-free view of it exposed through
/// [`PipelineSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhaseKind {
    /// No document selected yet, or state discarded by sign-out.
    Idle,
    /// Text extraction in flight.
    Extracting,
    /// Text extracted; generation can be triggered.
    ExtractedReady,
    /// Generation request in flight.
    Generating,
    /// Questions generated successfully.
    Ready,
    /// The last operation failed; recoverable by selecting a new file.
    Failed,
}

/// An immutable copy of the pipeline state, handed to the presentation
/// layer.
///
/// Invariants maintained by the controller:
/// * `questions` is non-empty only when `phase == Ready`
/// * `error_message` is non-empty only when `phase == Failed`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSnapshot {
    pub phase: PhaseKind,
    pub extracted_text: String,
    pub questions: Vec<QuestionAnswer>,
    pub error_message: String,
}

impl PipelineSnapshot {
    /// The initial empty state: `Idle` with nothing extracted or generated.
    pub fn initial() -> Self {
        Self {
            phase: PhaseKind::Idle,
            extracted_text: String::new(),
            questions: Vec::new(),
            error_message: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_snapshot_is_empty_idle() {
        let s = PipelineSnapshot::initial();
        assert_eq!(s.phase, PhaseKind::Idle);
        assert!(s.extracted_text.is_empty());
        assert!(s.questions.is_empty());
        assert!(s.error_message.is_empty());
    }

    #[test]
    fn question_answer_round_trips_through_json() {
        let qa = QuestionAnswer {
            question: "ما هي عاصمة فرنسا؟".into(),
            answer: "باريس".into(),
        };
        let json = serde_json::to_string(&qa).unwrap();
        let back: QuestionAnswer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, qa);
    }
}
