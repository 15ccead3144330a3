use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::constants::IDENTITY_FIELD;
use crate::error::{HrisError, Result};
use crate::security::constant_time_eq;
use crate::storage::Document;

/// Account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = HrisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            other => Err(HrisError::ValidationError(format!("unknown role '{}'", other))),
        }
    }
}

/// A user account as held by the credential store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique, case-sensitive login key
    pub identity: String,
    /// Plaintext; `None` never matches
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Role,
    /// `None` when the record has no flag; anything but `true` is `Some(false)`
    pub is_active: Option<bool>,
}

impl User {
    pub fn new(identity: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            identity: identity.into(),
            password: Some(password.into()),
            name: None,
            role,
            is_active: Some(true),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = Some(false);
        self
    }

    /// Login only refuses an explicit non-true flag
    pub fn can_log_in(&self) -> bool {
        self.is_active.unwrap_or(true)
    }

    /// Tokens are honoured only while the flag is exactly `true`
    pub fn has_access(&self) -> bool {
        self.is_active == Some(true)
    }

    /// Display name, falling back to the identity
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.identity)
    }

    /// Exact comparison against the stored password
    pub fn password_matches(&self, candidate: &str) -> bool {
        match &self.password {
            Some(stored) => constant_time_eq(stored, candidate),
            None => false,
        }
    }

    /// Builds a user from a loosely-shaped store record.
    ///
    /// Missing `role` reads as employee and missing `is_active` as `None`.
    /// A present `is_active` other than `true` (false, null, non-boolean)
    /// reads as `Some(false)`.
    pub fn from_document(doc: &Document) -> Result<Self> {
        let identity = doc
            .get(IDENTITY_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| HrisError::StorageError("user record has no identity".to_string()))?
            .to_string();

        let role = match doc.get("role").and_then(Value::as_str) {
            Some(raw) => raw.parse().map_err(|_| {
                HrisError::StorageError(format!("user record '{}' has unknown role '{}'", identity, raw))
            })?,
            None => Role::Employee,
        };

        let is_active = doc.get("is_active").map(|flag| flag == &Value::Bool(true));

        Ok(Self {
            password: doc.get("password").and_then(Value::as_str).map(String::from),
            name: doc.get("name").and_then(Value::as_str).map(String::from),
            identity,
            role,
            is_active,
        })
    }

    /// Store representation, as written by seeding
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(IDENTITY_FIELD.to_string(), Value::from(self.identity.clone()));
        if let Some(ref password) = self.password {
            doc.insert("password".to_string(), Value::from(password.clone()));
        }
        if let Some(ref name) = self.name {
            doc.insert("name".to_string(), Value::from(name.clone()));
        }
        doc.insert("role".to_string(), Value::from(self.role.as_str()));
        if let Some(active) = self.is_active {
            doc.insert("is_active".to_string(), Value::from(active));
        }
        doc
    }
}

/// The resolved caller of a single request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityContext {
    #[serde(rename = "email")]
    pub identity: String,
    /// Taken from the token, not the current record
    pub role: Role,
    pub name: String,
}

impl IdentityContext {
    /// Fails with `Forbidden` unless the caller holds exactly `role`
    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(HrisError::Forbidden)
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
