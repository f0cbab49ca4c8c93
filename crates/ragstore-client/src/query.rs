//! Grounded query orchestration.
//!
//! Builds the prompt sent to the backend (language directive plus an
//! instruction biasing toward inline, actionable answers), scopes
//! retrieval to one store, and normalizes the raw response into
//! [`QueryResult`].

use crate::client::RagStoreClient;
use crate::error::RagStoreResult;
use crate::types::{GenerateRequest, QueryResult};
use tracing::debug;

/// Static language-code to language-name table.
///
/// Codes are matched on their primary subtag, so `en-US` resolves the
/// same as `en`.
const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("de", "German"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("hi", "Hindi"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("sv", "Swedish"),
    ("tr", "Turkish"),
    ("zh", "Chinese"),
];

/// Resolve a language code to a human-readable language name.
pub fn language_name(code: &str) -> Option<&'static str> {
    let primary = code.split(['-', '_']).next().unwrap_or(code);
    let primary = primary.to_lowercase();
    LANGUAGE_NAMES
        .iter()
        .find(|(c, _)| *c == primary)
        .map(|(_, name)| *name)
}

/// The language instruction appended to every query prompt. An
/// unrecognized code falls back to a generic directive instead of
/// failing the query.
pub fn language_directive(code: &str) -> String {
    match language_name(code) {
        Some(name) => format!("Answer in {}.", name),
        None => "Answer in the user's query language.".to_string(),
    }
}

/// Build the full prompt for a grounded question.
pub fn build_query_prompt(question: &str, language_code: &str) -> String {
    format!(
        "{}\n\n{} Answer directly and concretely from the stored documents. \
         Prefer actionable, inline answers over referring the user elsewhere \
         or deferring the question.",
        question,
        language_directive(language_code)
    )
}

impl RagStoreClient {
    /// Answer one natural-language question grounded in one store's
    /// documents.
    ///
    /// Backend errors propagate unmodified; there is no local retry.
    pub async fn query(
        &self,
        store_name: &str,
        question: &str,
        language_code: &str,
    ) -> RagStoreResult<QueryResult> {
        debug!("Query against {} ({})", store_name, language_code);

        let request = GenerateRequest {
            prompt: build_query_prompt(question, language_code),
            grounding_scope: vec![store_name.to_string()],
        };

        let response = self.generate(&request).await?;
        Ok(QueryResult::from(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_name_resolution() {
        assert_eq!(language_name("en"), Some("English"));
        assert_eq!(language_name("EN"), Some("English"));
        assert_eq!(language_name("pt-BR"), Some("Portuguese"));
        assert_eq!(language_name("zh_CN"), Some("Chinese"));
        assert_eq!(language_name("tlh"), None);
    }

    #[test]
    fn test_unrecognized_code_falls_back() {
        let directive = language_directive("xx-klingon");
        assert_eq!(directive, "Answer in the user's query language.");
    }

    #[test]
    fn test_prompt_carries_question_and_directive() {
        let prompt = build_query_prompt("How do I file a claim?", "de");
        assert!(prompt.starts_with("How do I file a claim?"));
        assert!(prompt.contains("Answer in German."));
    }
}
