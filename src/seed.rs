//! Startup seeding of the default accounts

use crate::auth::user::{Role, User};
use crate::constants::{IDENTITY_FIELD, SEED_ADMIN, SEED_EMPLOYEE, USER_COLLECTION};
use crate::error::Result;
use crate::records::create_raw_document;
use crate::storage::{CredentialStore, DocumentStore};

/// Ensure the identity index and the default admin/employee accounts exist.
/// Accounts already present are left untouched. Returns how many were created.
pub async fn seed_users(documents: &dyn DocumentStore, credentials: &dyn CredentialStore) -> Result<usize> {
    if let Err(e) = documents.create_unique_index(USER_COLLECTION, IDENTITY_FIELD).await {
        log::warn!("Could not create unique index on {}.{}: {}", USER_COLLECTION, IDENTITY_FIELD, e);
    }

    let mut created = 0;
    for (identity, password, name, role) in [SEED_ADMIN, SEED_EMPLOYEE] {
        if credentials.count_users_by_identity(identity).await? > 0 {
            log::debug!("Seed account '{}' already present", identity);
            continue;
        }

        let role: Role = role.parse()?;
        let user = User::new(identity, password, role).with_name(name);
        create_raw_document(documents, USER_COLLECTION, user.to_document()).await?;
        log::info!("Seeded default {} account '{}'", role, identity);
        created += 1;
    }

    Ok(created)
}
