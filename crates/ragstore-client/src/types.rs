//! Types for backend API requests and responses.
//!
//! The backend speaks camelCase JSON; everything here carries
//! `#[serde(rename_all = "camelCase")]` so the Rust side stays snake_case.

use serde::{Deserialize, Serialize};

/// A named server-side collection that documents are ingested into and
/// queries are scoped against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Opaque, server-assigned identifier (e.g. `stores/abc123`).
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

/// A file ingested into exactly one store.
///
/// A well-formed document name is namespaced under its owning store:
/// `<store name>/documents/<id>`. Membership is a derived relation
/// computed from this prefix on the client, because the backend's
/// listing API offers no server-side scoping by store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub custom_metadata: Vec<CustomMetadata>,
}

impl Document {
    /// Whether this document belongs to the given store, judged by the
    /// name-prefix convention.
    pub fn belongs_to(&self, store_name: &str) -> bool {
        self.name
            .strip_prefix(store_name)
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Caller-supplied key/value annotation attached to a document at
/// ingestion time. Immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMetadata {
    pub key: String,
    pub string_value: String,
}

impl CustomMetadata {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            string_value: value.into(),
        }
    }
}

/// One page of the store listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePage {
    #[serde(default)]
    pub stores: Vec<Store>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// One page of the global document listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// An in-flight ingestion operation, as reported by the backend.
///
/// Lives only for the duration of one ingestion call; once observed
/// `done` it never reverts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<OperationError>,
    #[serde(default)]
    pub response: Option<OperationResponse>,
}

/// Terminal failure payload of an operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Success payload of a completed ingestion operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default)]
    pub document: Option<Document>,
}

/// Metadata sent alongside the file bytes when submitting an ingestion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_metadata: Vec<CustomMetadata>,
}

/// Request body for the grounded generate endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,
    /// Store names retrieval is scoped to. This client always sends
    /// exactly one.
    pub grounding_scope: Vec<String>,
}

/// Raw response from the grounded generate endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub grounding: Option<GroundingMetadata>,
}

/// Grounding block of a generate response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub citations: Vec<GroundingCitation>,
}

/// One citation as the backend reports it. Richer and more brittle than
/// callers need; normalized into [`Citation`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingCitation {
    #[serde(default)]
    pub retrieved_text: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// A fragment of source document text the backend claims as evidence
/// for part of its answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub text: Option<String>,
}

/// Normalized result of one grounded query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    pub citations: Vec<Citation>,
}

impl From<GenerateResponse> for QueryResult {
    fn from(response: GenerateResponse) -> Self {
        let citations = response
            .grounding
            .map(|g| {
                g.citations
                    .into_iter()
                    .map(|c| Citation {
                        text: c.retrieved_text,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            answer: response.answer,
            citations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_belongs_to_requires_separator() {
        let doc = Document {
            name: "stores/alpha/documents/d1".to_string(),
            display_name: "d1".to_string(),
            custom_metadata: vec![],
        };

        assert!(doc.belongs_to("stores/alpha"));
        assert!(!doc.belongs_to("stores/alph"));
        assert!(!doc.belongs_to("stores/beta"));
    }

    #[test]
    fn test_query_result_without_grounding_has_no_citations() {
        let response = GenerateResponse {
            answer: "hi".to_string(),
            grounding: None,
        };

        let result = QueryResult::from(response);
        assert_eq!(result.answer, "hi");
        assert!(result.citations.is_empty());
    }

    #[test]
    fn test_custom_metadata_wire_shape() {
        let entry = CustomMetadata::new("author", "ada");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"key": "author", "stringValue": "ada"})
        );
    }
}
