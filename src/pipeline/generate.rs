//! Generation client: call the hosted text-generation service and parse the
//! structured response.
//!
//! This stage is intentionally thin — prompt engineering lives in
//! [`crate::prompts`], and the controller owns sequencing — so all that
//! remains here is one HTTP round trip and a strict schema check.
//!
//! ## Failure taxonomy
//!
//! Two error kinds leave this module, reflecting two distinct situations:
//!
//! * [`Pdf2QaError::Generation`] — the service could not be reached or did
//!   not answer usefully: transport error, timeout, authentication
//!   rejection, non-success status, or a body that is not JSON at all.
//! * [`Pdf2QaError::Schema`] — the service answered with well-formed JSON
//!   that is not an ordered list of `{question, answer}` records. This is
//!   never silently coerced into an empty list.
//!
//! No retry happens here. A failed attempt surfaces immediately and the
//! user re-triggers generation manually. Identical prompts issued twice
//! both invoke the service — there is no response cache.

use crate::error::Pdf2QaError;
use crate::output::QuestionAnswer;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Capability seam over the text-generation service.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Issue a single generation request and return the parsed, ordered
    /// question list.
    async fn generate(&self, prompt: &str) -> Result<Vec<QuestionAnswer>, Pdf2QaError>;
}

/// Request body sent to the hosted service.
///
/// `response_type` declares the expected shape so the service returns a
/// parsed JSON payload rather than free-form prose.
#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    prompt: &'a str,
    response_type: &'static str,
}

/// Default generator: one JSON POST to a configured HTTP endpoint.
pub struct HttpQuestionGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpQuestionGenerator {
    /// Create a generator for `endpoint`, with an optional bearer token and
    /// a per-request timeout.
    ///
    /// The timeout is the only locally-enforced bound on the call; without
    /// it a hung service would suspend the pipeline indefinitely.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, Pdf2QaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Pdf2QaError::Generation {
                detail: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

#[async_trait]
impl QuestionGenerator for HttpQuestionGenerator {
    async fn generate(&self, prompt: &str) -> Result<Vec<QuestionAnswer>, Pdf2QaError> {
        let body = GenerationRequest {
            prompt,
            response_type: "json",
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            let detail = if e.is_timeout() {
                format!("request to '{}' timed out", self.endpoint)
            } else {
                format!("request to '{}' failed: {e}", self.endpoint)
            };
            Pdf2QaError::Generation { detail }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            warn!("generation service rejected credentials: HTTP {}", status);
            return Err(Pdf2QaError::Generation {
                detail: format!("authentication rejected (HTTP {status})"),
            });
        }
        if !status.is_success() {
            return Err(Pdf2QaError::Generation {
                detail: format!("service returned HTTP {status}"),
            });
        }

        let payload: Value = response.json().await.map_err(|e| Pdf2QaError::Generation {
            detail: format!("response body is not JSON: {e}"),
        })?;

        let questions = parse_questions(payload)?;
        debug!("generation service returned {} questions", questions.len());
        Ok(questions)
    }
}

/// Interpret a JSON payload as an ordered list of `{question, answer}`
/// records.
///
/// Anything else — a non-array payload, a non-object entry, a missing or
/// non-string field — is a [`Pdf2QaError::Schema`]. Empty strings are
/// valid field values; an empty array is a valid (empty) result.
pub fn parse_questions(payload: Value) -> Result<Vec<QuestionAnswer>, Pdf2QaError> {
    let Value::Array(items) = payload else {
        return Err(Pdf2QaError::Schema {
            detail: format!("expected a JSON array, got {}", json_kind(&payload)),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let Value::Object(mut record) = item else {
                return Err(Pdf2QaError::Schema {
                    detail: format!("entry {index} is not an object"),
                });
            };
            let question = take_string_field(&mut record, "question", index)?;
            let answer = take_string_field(&mut record, "answer", index)?;
            Ok(QuestionAnswer { question, answer })
        })
        .collect()
}

fn take_string_field(
    record: &mut serde_json::Map<String, Value>,
    field: &str,
    index: usize,
) -> Result<String, Pdf2QaError> {
    match record.remove(field) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(Pdf2QaError::Schema {
            detail: format!(
                "entry {index}: field '{field}' is {}, expected a string",
                json_kind(&other)
            ),
        }),
        None => Err(Pdf2QaError::Schema {
            detail: format!("entry {index}: missing field '{field}'"),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn well_formed_payload_parses_in_order() {
        let payload = json!([
            {"question": "س1", "answer": "ج1"},
            {"question": "س2", "answer": "ج2"},
        ]);
        let questions = parse_questions(payload).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "س1");
        assert_eq!(questions[1].answer, "ج2");
    }

    #[test]
    fn empty_string_fields_are_valid() {
        let payload = json!([{"question": "", "answer": ""}]);
        let questions = parse_questions(payload).unwrap();
        assert_eq!(questions[0].question, "");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let payload = json!([{"question": "q", "answer": "a", "difficulty": 3}]);
        assert_eq!(parse_questions(payload).unwrap().len(), 1);
    }

    #[test]
    fn non_array_payload_is_a_schema_error() {
        for payload in [
            json!({"questions": []}),
            json!("a bare string"),
            json!(42),
            json!(null),
        ] {
            let err = parse_questions(payload).unwrap_err();
            assert!(matches!(err, Pdf2QaError::Schema { .. }), "got {err:?}");
        }
    }

    #[test]
    fn non_object_entry_is_a_schema_error() {
        let err = parse_questions(json!(["not an object"])).unwrap_err();
        assert!(matches!(err, Pdf2QaError::Schema { .. }));
        assert!(err.to_string().contains("entry 0"));
    }

    #[test]
    fn missing_field_is_a_schema_error() {
        let err = parse_questions(json!([{"question": "q"}])).unwrap_err();
        assert!(err.to_string().contains("answer"), "got: {err}");
    }

    #[test]
    fn non_string_field_is_a_schema_error() {
        let err = parse_questions(json!([{"question": "q", "answer": 7}])).unwrap_err();
        assert!(err.to_string().contains("expected a string"), "got: {err}");
    }

    #[test]
    fn empty_array_is_a_valid_empty_result() {
        assert!(parse_questions(json!([])).unwrap().is_empty());
    }

    #[test]
    fn request_body_declares_json_response_type() {
        let body = GenerationRequest {
            prompt: "p",
            response_type: "json",
        };
        let encoded = serde_json::to_value(&body).unwrap();
        assert_eq!(encoded["prompt"], "p");
        assert_eq!(encoded["response_type"], "json");
    }
}
