//! Abstract storage interfaces for pluggable backends
//!
//! The document store is the persistence collaborator for every collection.
//! The credential store is the narrow, typed view the auth core consumes.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::auth::user::User;
use crate::constants::{IDENTITY_FIELD, USER_COLLECTION};
use crate::error::Result;

/// A loosely-typed record
pub type Document = Map<String, Value>;

/// Exact top-level field equality; empty matches everything
pub type Filter = Map<String, Value>;

/// Builds a single-field equality filter
pub fn filter_eq(field: &str, value: impl Into<Value>) -> Filter {
    let mut filter = Filter::new();
    filter.insert(field.to_string(), value.into());
    filter
}

/// Checks a document against a filter
pub fn matches_filter(doc: &Document, filter: &Filter) -> bool {
    filter.iter().all(|(field, expected)| doc.get(field) == Some(expected))
}

/// Document storage interface
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// First document in `collection` matching `filter`
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>>;

    /// Number of documents in `collection` matching `filter`
    async fn count_documents(&self, collection: &str, filter: &Filter) -> Result<u64>;

    /// Insert a document and return its `_id`
    async fn insert(&self, collection: &str, document: Document) -> Result<String>;

    /// Up to `limit` matching documents in insertion order
    async fn list(&self, collection: &str, filter: &Filter, limit: usize) -> Result<Vec<Document>>;

    /// Names of collections holding at least one document
    async fn list_collection_names(&self) -> Result<Vec<String>>;

    /// Enforce uniqueness of `field` within `collection`, if supported
    async fn create_unique_index(&self, _collection: &str, _field: &str) -> Result<()> {
        Ok(())
    }
}

/// User lookup interface consumed by the authenticator and access guard
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user by exact identity
    async fn find_user_by_identity(&self, identity: &str) -> Result<Option<User>>;

    /// Count accounts holding `identity` (seeding only)
    async fn count_users_by_identity(&self, identity: &str) -> Result<u64>;
}

/// Credential store backed by the `user` collection of a document store
#[derive(Clone)]
pub struct DocumentCredentialStore {
    documents: Arc<dyn DocumentStore>,
}

impl DocumentCredentialStore {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }
}

#[async_trait]
impl CredentialStore for DocumentCredentialStore {
    async fn find_user_by_identity(&self, identity: &str) -> Result<Option<User>> {
        let filter = filter_eq(IDENTITY_FIELD, identity);
        match self.documents.find_one(USER_COLLECTION, &filter).await? {
            Some(doc) => User::from_document(&doc).map(Some),
            None => Ok(None),
        }
    }

    async fn count_users_by_identity(&self, identity: &str) -> Result<u64> {
        let filter = filter_eq(IDENTITY_FIELD, identity);
        self.documents.count_documents(USER_COLLECTION, &filter).await
    }
}
