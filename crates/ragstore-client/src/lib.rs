//! Ragstore Client - orchestration client for a remote RAG document-store backend.
//!
//! This crate manages named document stores in a remote
//! retrieval-augmented-generation backend: store and document CRUD,
//! file ingestion (polling the backend's asynchronous processing to
//! completion), and natural-language queries grounded in the ingested
//! documents.

mod client;
mod error;
mod pages;
mod poll;
pub mod query;
pub mod suggest;
mod types;

pub use client::RagStoreClient;
pub use error::{RagStoreError, RagStoreResult};
pub use poll::PollPolicy;
pub use types::*;
