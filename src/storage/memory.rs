//! In-memory storage implementation for development and testing
//!
//! Keeps every collection in memory behind a single lock, so each operation
//! observes a consistent snapshot.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::traits::*;
use crate::error::{HrisError, Result};

/// In-memory document storage
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    unique_indexes: RwLock<HashMap<String, Vec<String>>>, // collection -> unique fields
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the first document matching `filter` by applying `update`.
    /// Returns whether a document was found.
    pub async fn update_one<F>(&self, collection: &str, filter: &Filter, update: F) -> Result<bool>
    where
        F: FnOnce(&mut Document) + Send,
    {
        let mut collections = self.collections.write().await;
        let found = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| matches_filter(doc, filter)));

        match found {
            Some(doc) => {
                update(doc);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| matches_filter(doc, filter)))
            .cloned())
    }

    async fn count_documents(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let collections = self.collections.read().await;
        let count = collections
            .get(collection)
            .map_or(0, |docs| docs.iter().filter(|doc| matches_filter(doc, filter)).count());
        Ok(count as u64)
    }

    async fn insert(&self, collection: &str, mut document: Document) -> Result<String> {
        let id = match document.get("_id").and_then(Value::as_str) {
            Some(existing) => existing.to_string(),
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                document.insert("_id".to_string(), Value::from(id.clone()));
                id
            }
        };

        // Hold the index lock across the check and the write
        let indexes = self.unique_indexes.read().await;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let mut unique_fields = vec!["_id".to_string()];
        if let Some(fields) = indexes.get(collection) {
            unique_fields.extend(fields.iter().cloned());
        }

        for field in &unique_fields {
            if let Some(value) = document.get(field) {
                if docs.iter().any(|doc| doc.get(field) == Some(value)) {
                    return Err(HrisError::StorageError(format!(
                        "duplicate key in '{}' for field '{}'",
                        collection, field
                    )));
                }
            }
        }

        docs.push(document);
        Ok(id)
    }

    async fn list(&self, collection: &str, filter: &Filter, limit: usize) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches_filter(doc, filter))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        let collections = self.collections.read().await;
        let mut names: Vec<String> = collections
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn create_unique_index(&self, collection: &str, field: &str) -> Result<()> {
        let mut indexes = self.unique_indexes.write().await;
        let fields = indexes.entry(collection.to_string()).or_default();
        if !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }
        Ok(())
    }
}
