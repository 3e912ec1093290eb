//! Prompt construction for the text-generation service.
//!
//! Centralising the template here serves two purposes:
//!
//! 1. **Single source of truth** — the target language and the declared
//!    output shape live in exactly one string; changing either cannot drift
//!    between call sites.
//!
//! 2. **Testability** — unit tests can assert on the built prompt directly
//!    without touching the generation service.
//!
//! Callers can override the default via
//! [`crate::config::GenerationConfig::prompt_template`]; the template must
//! contain the `{text}` placeholder, which is replaced with the full
//! extracted text verbatim. No truncation or summarisation happens here —
//! length limits are the generation service's concern.

use crate::error::Pdf2QaError;

/// Placeholder in a template that receives the extracted text.
pub const TEXT_PLACEHOLDER: &str = "{text}";

/// Default instruction template.
///
/// Asks for questions in Arabic and pins the exact response shape: a JSON
/// array of objects with `question` and `answer` string fields.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "قم بإنشاء أسئلة من النص التالي باللغة العربية: \n\n{text}\n\nارسل الإجابة في صيغة JSON تحتوي على الأسئلة والأجوبة بالشكل التالي: [{\"question\": \"...\", \"answer\": \"...\" }, ...]";

/// Build the generation prompt for the given extracted text.
///
/// Fails with [`Pdf2QaError::EmptyInput`] when `text` is empty or
/// whitespace-only; this runs before any external call is issued.
pub fn build_prompt(text: &str, template_override: Option<&str>) -> Result<String, Pdf2QaError> {
    if text.trim().is_empty() {
        return Err(Pdf2QaError::EmptyInput);
    }
    let template = template_override.unwrap_or(DEFAULT_PROMPT_TEMPLATE);
    Ok(template.replace(TEXT_PLACEHOLDER, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_text_verbatim() {
        let prompt = build_prompt("نص تجريبي للاختبار", None).unwrap();
        assert!(prompt.contains("نص تجريبي للاختبار"));
        // The shape instruction survives the placeholder substitution.
        assert!(prompt.contains("\"question\""));
        assert!(prompt.contains("\"answer\""));
    }

    #[test]
    fn prompt_is_deterministic() {
        let a = build_prompt("same input", None).unwrap();
        let b = build_prompt("same input", None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(matches!(
            build_prompt("", None),
            Err(Pdf2QaError::EmptyInput)
        ));
    }

    #[test]
    fn whitespace_only_text_is_rejected() {
        assert!(matches!(
            build_prompt("  \n\t ", None),
            Err(Pdf2QaError::EmptyInput)
        ));
    }

    #[test]
    fn template_override_is_used() {
        let prompt = build_prompt("CONTENT", Some("Generate questions for: {text}")).unwrap();
        assert_eq!(prompt, "Generate questions for: CONTENT");
    }

    #[test]
    fn long_text_is_not_truncated() {
        let text = "كلمة ".repeat(10_000);
        let prompt = build_prompt(&text, None).unwrap();
        assert!(prompt.contains(text.trim_end()));
    }
}
