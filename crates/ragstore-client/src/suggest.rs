//! Structured-suggestion extraction.
//!
//! Asks the backend to synthesize example questions per topic found in
//! a store's documents, then coerces the free-form answer into a flat
//! list of question strings. Suggestion seeding is advisory, so every
//! failure mode here degrades to an empty list; no error escapes.

use crate::client::RagStoreClient;
use crate::query::language_directive;
use crate::types::GenerateRequest;
use serde_json::Value;
use tracing::{debug, warn};

/// Classified shape of the payload embedded in a model response.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionPayload {
    /// Array of `{topic, questions[]}` objects.
    TopicGroups(Vec<TopicGroup>),
    /// Bare array of question strings.
    FlatStrings(Vec<String>),
    /// Anything else: unparsable, not an array, or unrecognized
    /// element shape.
    Malformed,
}

/// One topic with its suggested questions. Non-string entries have
/// already been filtered out.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicGroup {
    pub topic: Option<String>,
    pub questions: Vec<String>,
}

/// Build the prompt requesting per-topic example questions.
pub fn build_suggestion_prompt(language_code: &str) -> String {
    format!(
        "Identify the main topics covered by the stored documents. For each \
         topic, write two example questions a user might ask about it. {} \
         Respond with only a JSON array of objects of the form \
         {{\"topic\": \"...\", \"questions\": [\"...\", \"...\"]}}, inside a \
         ```json fenced code block.",
        language_directive(language_code)
    )
}

/// Locate the JSON payload inside a free-form model response.
///
/// A ```json fenced block wins; otherwise the slice between the first
/// `[` and the last `]` is taken.
fn extract_json_slice(text: &str) -> Option<&str> {
    if let Some(fence) = text.find("```json") {
        let after = &text[fence + "```json".len()..];
        if let Some(end) = after.find("```") {
            return Some(after[..end].trim());
        }
    }

    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if start < end {
        return Some(&text[start..=end]);
    }
    None
}

/// Classify the payload embedded in a model response.
pub fn classify(text: &str) -> SuggestionPayload {
    let Some(slice) = extract_json_slice(text) else {
        return SuggestionPayload::Malformed;
    };

    let Ok(value) = serde_json::from_str::<Value>(slice) else {
        return SuggestionPayload::Malformed;
    };

    let Value::Array(items) = value else {
        return SuggestionPayload::Malformed;
    };

    let Some(first) = items.first() else {
        return SuggestionPayload::FlatStrings(vec![]);
    };

    match first {
        Value::Object(obj) if obj.get("questions").is_some_and(Value::is_array) => {
            let groups = items
                .iter()
                .map(|item| TopicGroup {
                    topic: item
                        .get("topic")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    questions: item
                        .get("questions")
                        .and_then(Value::as_array)
                        .map(|questions| {
                            questions
                                .iter()
                                .filter_map(Value::as_str)
                                .map(str::to_string)
                                .collect()
                        })
                        .unwrap_or_default(),
                })
                .collect();
            SuggestionPayload::TopicGroups(groups)
        }
        Value::String(_) => SuggestionPayload::FlatStrings(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        ),
        _ => SuggestionPayload::Malformed,
    }
}

/// Coerce a free-form model response into a flat list of questions.
///
/// Never fails: a malformed response yields an empty list.
pub fn extract_questions(text: &str) -> Vec<String> {
    match classify(text) {
        SuggestionPayload::TopicGroups(groups) => groups
            .into_iter()
            .flat_map(|group| group.questions)
            .collect(),
        SuggestionPayload::FlatStrings(questions) => questions,
        SuggestionPayload::Malformed => {
            warn!("Could not extract suggested questions from response");
            vec![]
        }
    }
}

impl RagStoreClient {
    /// Ask the backend for example questions grounded in one store's
    /// documents.
    ///
    /// Never fails outward: backend failures and malformed responses
    /// both yield an empty list.
    pub async fn suggested_questions(
        &self,
        store_name: &str,
        language_code: &str,
    ) -> Vec<String> {
        let request = GenerateRequest {
            prompt: build_suggestion_prompt(language_code),
            grounding_scope: vec![store_name.to_string()],
        };

        let response = match self.generate(&request).await {
            Ok(response) => response,
            Err(err) => {
                warn!("Suggestion request failed for {}: {}", store_name, err);
                return vec![];
            }
        };

        let questions = extract_questions(&response.answer);
        debug!("{} suggested questions for {}", questions.len(), store_name);
        questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_topic_groups() {
        let text = "```json\n[{\"product\":\"A\",\"questions\":[\"q1\",\"q2\"]}]\n```";
        assert_eq!(extract_questions(text), vec!["q1", "q2"]);
    }

    #[test]
    fn test_unfenced_topic_groups_flatten_in_order() {
        let text =
            "[{\"product\":\"A\",\"questions\":[\"q1\"]},{\"product\":\"B\",\"questions\":[\"q2\",\"q3\"]}]";
        assert_eq!(extract_questions(text), vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn test_bare_string_array() {
        assert_eq!(extract_questions("[\"q1\",\"q2\"]"), vec!["q1", "q2"]);
    }

    #[test]
    fn test_not_json_yields_empty() {
        assert!(extract_questions("not json at all").is_empty());
    }

    #[test]
    fn test_empty_array_yields_empty() {
        assert!(extract_questions("[]").is_empty());
    }

    #[test]
    fn test_prose_around_payload() {
        let text = "Sure! Here are some ideas: [\"q1\", \"q2\"] Hope that helps.";
        assert_eq!(extract_questions(text), vec!["q1", "q2"]);
    }

    #[test]
    fn test_non_string_entries_filtered() {
        assert_eq!(extract_questions("[\"q1\", 42, \"q2\"]"), vec!["q1", "q2"]);
    }

    #[test]
    fn test_objects_without_questions_field_are_malformed() {
        let text = "[{\"topic\":\"A\"}]";
        assert_eq!(classify(text), SuggestionPayload::Malformed);
        assert!(extract_questions(text).is_empty());
    }

    #[test]
    fn test_number_array_is_malformed() {
        assert_eq!(classify("[1, 2, 3]"), SuggestionPayload::Malformed);
    }

    #[test]
    fn test_bracket_slice_digs_into_object() {
        // The first-[..last-] fallback recovers the inner array even
        // when the model wrapped it in an object.
        assert_eq!(
            classify("{\"questions\":[\"q1\"]}"),
            SuggestionPayload::FlatStrings(vec!["q1".to_string()])
        );
    }

    #[test]
    fn test_fence_wins_over_bracket_slice() {
        let text = "ignore [\"outer\"] this\n```json\n[\"inner\"]\n```";
        assert_eq!(extract_questions(text), vec!["inner"]);
    }

    #[test]
    fn test_group_questions_keep_strings_only() {
        let text = "[{\"topic\":\"A\",\"questions\":[\"q1\", null, 7, \"q2\"]}]";
        assert_eq!(extract_questions(text), vec!["q1", "q2"]);
    }
}
