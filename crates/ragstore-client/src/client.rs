//! HTTP client for the RAG document-store backend.

use crate::error::{RagStoreError, RagStoreResult};
use crate::poll::PollPolicy;
use crate::types::*;
use ragstore_config::Config;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the RAG document-store backend.
///
/// Explicitly constructed and passed by reference; construction is the
/// initialization step, so a built client always carries credentials.
#[derive(Clone)]
pub struct RagStoreClient {
    client: Client,
    base_url: String,
    api_key: String,
    poll: PollPolicy,
}

impl RagStoreClient {
    /// Create a new client from configuration.
    ///
    /// Fails fast with [`RagStoreError::BackendUnavailable`] when no API
    /// key is configured, rather than letting a later call hit the
    /// network without credentials.
    pub fn from_config(config: &Config) -> RagStoreResult<Self> {
        let api_key = config
            .backend
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                RagStoreError::BackendUnavailable(format!(
                    "no API key configured; set {} or [backend] api_key",
                    ragstore_config::API_KEY_ENV
                ))
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.backend.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.backend.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            poll: PollPolicy::from(&config.polling),
        })
    }

    /// Create a new client with default settings.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> RagStoreResult<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagStoreError::BackendUnavailable(
                "empty API key".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            poll: PollPolicy::default(),
        })
    }

    /// Override the ingestion polling policy.
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub(crate) fn poll_policy(&self) -> &PollPolicy {
        &self.poll
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    /// Turn a non-success status into a transport error, body included.
    async fn check(response: Response) -> RagStoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RagStoreError::Transport(format!(
            "backend returned status {}: {}",
            status.as_u16(),
            body
        )))
    }

    pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> RagStoreResult<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let response = Self::check(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| RagStoreError::InvalidResponse(e.to_string()))
    }

    /// List all stores, draining the backend's pagination fully.
    pub async fn list_stores(&self) -> RagStoreResult<Vec<Store>> {
        debug!("Listing stores");
        self.drain_pages::<StorePage>("stores").await
    }

    /// Create a store with the given display name. The backend assigns
    /// the opaque store name.
    pub async fn create_store(&self, display_name: &str) -> RagStoreResult<Store> {
        let url = self.url("stores");
        debug!("Creating store {:?}", display_name);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&serde_json::json!({ "displayName": display_name }))
            .send()
            .await?;

        let response = Self::check(response).await?;
        let store: Store = response
            .json()
            .await
            .map_err(|e| RagStoreError::InvalidResponse(e.to_string()))?;

        if store.name.is_empty() {
            return Err(RagStoreError::InvalidResponse(
                "backend did not assign a store name".to_string(),
            ));
        }

        info!("Created store {}", store.name);
        Ok(store)
    }

    /// Delete a store. Always forces deletion, so a non-empty store is
    /// removed together with its documents (cascade is backend-side).
    pub async fn delete_store(&self, store_name: &str) -> RagStoreResult<()> {
        let url = self.url(store_name);
        debug!("Deleting store {}", store_name);

        let response = self
            .client
            .delete(&url)
            .query(&[("force", "true")])
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        Self::check(response).await?;
        info!("Deleted store {}", store_name);
        Ok(())
    }

    /// List the documents belonging to one store.
    ///
    /// The backend only offers a global document listing, so this drains
    /// all documents across all stores and keeps the ones whose name is
    /// prefixed by `store_name + "/"`. Cost is O(total documents).
    pub async fn list_documents(&self, store_name: &str) -> RagStoreResult<Vec<Document>> {
        debug!("Listing documents for {}", store_name);

        let all = self.drain_pages::<DocumentPage>("documents").await?;
        let documents: Vec<Document> = all
            .into_iter()
            .filter(|doc| doc.belongs_to(store_name))
            .collect();

        debug!("{} documents in {}", documents.len(), store_name);
        Ok(documents)
    }

    /// Delete a single document by its full name.
    pub async fn delete_document(&self, document_name: &str) -> RagStoreResult<()> {
        let url = self.url(document_name);
        debug!("Deleting document {}", document_name);

        let response = self
            .client
            .delete(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        Self::check(response).await?;
        info!("Deleted document {}", document_name);
        Ok(())
    }

    /// Ingest a file into a store and wait for the backend to finish
    /// processing it.
    ///
    /// The submit call returns an accepted-but-pending operation; this
    /// method polls its status at the configured interval until the
    /// operation is done, then returns the ingested document. Dropping
    /// the returned future cancels the wait (the remote operation keeps
    /// running).
    pub async fn upload_document(
        &self,
        store_name: &str,
        file_name: &str,
        bytes: Vec<u8>,
        metadata: Vec<CustomMetadata>,
    ) -> RagStoreResult<Document> {
        let url = format!("{}:ingest", self.url(store_name));
        info!("Ingesting {:?} into {}", file_name, store_name);

        let ingest_metadata = IngestMetadata {
            display_name: Some(file_name.to_string()),
            custom_metadata: metadata,
        };
        let metadata_json = serde_json::to_string(&ingest_metadata)
            .map_err(|e| RagStoreError::InvalidResponse(e.to_string()))?;

        let form = Form::new()
            .part("metadata", Part::text(metadata_json).mime_str("application/json")?)
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()));

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let response = Self::check(response).await?;
        let operation: Operation = response
            .json()
            .await
            .map_err(|e| RagStoreError::InvalidResponse(e.to_string()))?;

        let operation = self.await_operation(operation).await?;

        let document = operation
            .response
            .and_then(|r| r.document)
            .ok_or_else(|| {
                RagStoreError::InvalidResponse(
                    "completed operation carried no document".to_string(),
                )
            })?;

        info!("Ingested {}", document.name);
        Ok(document)
    }

    /// Fetch the current status of an ingestion operation.
    pub(crate) async fn fetch_operation(&self, operation_name: &str) -> RagStoreResult<Operation> {
        if operation_name.is_empty() {
            warn!("Backend returned an operation without a handle");
            return Err(RagStoreError::InvalidResponse(
                "operation has no name to poll".to_string(),
            ));
        }

        self.get_json(&self.url(operation_name), &[]).await
    }

    pub(crate) async fn generate(&self, request: &GenerateRequest) -> RagStoreResult<GenerateResponse> {
        let url = self.url("generate");
        debug!("Generate scoped to {:?}", request.grounding_scope);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| RagStoreError::InvalidResponse(e.to_string()))
    }
}
