//! Storage mechanisms for users and HR records

pub mod memory;
pub mod traits;

// Re-export the storage interfaces
pub use memory::MemoryDocumentStore;
pub use traits::{
    filter_eq, matches_filter, CredentialStore, Document, DocumentCredentialStore, DocumentStore,
    Filter,
};
