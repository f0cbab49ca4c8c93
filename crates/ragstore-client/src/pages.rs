//! Pagination collector.
//!
//! The backend returns listings as a token-linked page sequence; this
//! module flattens a whole sequence into memory. Order is backend
//! iteration order, nothing more.

use crate::client::RagStoreClient;
use crate::error::RagStoreResult;
use crate::types::{Document, DocumentPage, Store, StorePage};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const PAGE_SIZE: u32 = 50;

/// One page of a backend listing.
pub trait Paged {
    type Record;

    fn next_page_token(&self) -> Option<&str>;

    /// Consume the page, keeping only well-formed records. A record
    /// missing its identity field is dropped, not a listing failure.
    fn into_records(self) -> Vec<Self::Record>;
}

impl Paged for StorePage {
    type Record = Store;

    fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }

    fn into_records(self) -> Vec<Store> {
        self.stores
            .into_iter()
            .filter(|store| {
                if store.name.is_empty() {
                    warn!("Dropping store record without a name");
                    return false;
                }
                true
            })
            .collect()
    }
}

impl Paged for DocumentPage {
    type Record = Document;

    fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }

    fn into_records(self) -> Vec<Document> {
        self.documents
            .into_iter()
            .filter(|doc| {
                if doc.name.is_empty() {
                    warn!("Dropping document record without a name");
                    return false;
                }
                true
            })
            .collect()
    }
}

impl RagStoreClient {
    /// Drain a paginated listing to exhaustion, in page order.
    ///
    /// A transport error mid-drain fails the whole listing; partial
    /// results are never returned.
    pub(crate) async fn drain_pages<P>(&self, path: &str) -> RagStoreResult<Vec<P::Record>>
    where
        P: Paged + DeserializeOwned,
    {
        let url = self.url(path);
        let page_size = PAGE_SIZE.to_string();
        let mut records = Vec::new();
        let mut token: Option<String> = None;
        let mut pages = 0u32;

        loop {
            // Tokens are opaque; the query builder takes care of
            // percent-encoding them.
            let mut query: Vec<(&str, &str)> = vec![("pageSize", page_size.as_str())];
            if let Some(t) = token.as_deref() {
                query.push(("pageToken", t));
            }

            let page: P = self.get_json(&url, &query).await?;
            pages += 1;
            token = page.next_page_token().map(str::to_string);
            records.extend(page.into_records());

            if token.is_none() {
                break;
            }
        }

        debug!("Drained {} records over {} pages of {}", records.len(), pages, path);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_page_drops_nameless_records() {
        let page = StorePage {
            stores: vec![
                Store {
                    name: "stores/a".to_string(),
                    display_name: "A".to_string(),
                },
                Store {
                    name: String::new(),
                    display_name: "ghost".to_string(),
                },
            ],
            next_page_token: None,
        };

        let records = page.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "stores/a");
    }

    #[test]
    fn test_empty_token_means_last_page() {
        let page = DocumentPage {
            documents: vec![],
            next_page_token: Some(String::new()),
        };
        assert!(page.next_page_token().is_none());
    }
}
