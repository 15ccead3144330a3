//! HR/ERP record schemas and the generic create/list helpers
//!
//! Each schema maps to one collection. Validation stops at field presence
//! (enforced by serde) plus the few range checks the schemas declare.

use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{ATTENDANCE_COLLECTION, KPI_COLLECTION, LEAVE_COLLECTION, PAYROLL_COLLECTION};
use crate::error::{HrisError, Result};
use crate::storage::{Document, DocumentStore, Filter};

/// A record stored in its own collection and owned by one employee
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;

    /// Identity of the employee the record belongs to
    fn owner(&self) -> &str;

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Clock-in/clock-out record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub user_email: String,
    /// ISO date (YYYY-MM-DD)
    pub date_str: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub notes: Option<String>,
}

impl Record for Attendance {
    const COLLECTION: &'static str = ATTENDANCE_COLLECTION;

    fn owner(&self) -> &str {
        &self.user_email
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Unpaid,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub user_email: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub reason: Option<String>,
    #[serde(default)]
    pub status: LeaveStatus,
}

impl Record for LeaveRequest {
    const COLLECTION: &'static str = LEAVE_COLLECTION;

    fn owner(&self) -> &str {
        &self.user_email
    }
}

/// Monthly payroll slip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollItem {
    pub user_email: String,
    /// YYYY-MM
    pub period: String,
    pub base_salary: f64,
    #[serde(default)]
    pub allowances: f64,
    #[serde(default)]
    pub deductions: f64,
    pub net_pay: f64,
}

impl Record for PayrollItem {
    const COLLECTION: &'static str = PAYROLL_COLLECTION;

    fn owner(&self) -> &str {
        &self.user_email
    }
}

/// Key performance indicator snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub user_email: String,
    /// YYYY-QX or YYYY-MM
    pub period: String,
    #[serde(default)]
    pub goals: Vec<String>,
    pub score: Option<f64>,
}

impl Record for Kpi {
    const COLLECTION: &'static str = KPI_COLLECTION;

    fn owner(&self) -> &str {
        &self.user_email
    }

    fn validate(&self) -> Result<()> {
        match self.score {
            Some(score) if !(0.0..=100.0).contains(&score) => Err(HrisError::ValidationError(
                format!("score must be between 0 and 100, got {}", score),
            )),
            _ => Ok(()),
        }
    }
}

/// Validate, timestamp and insert a record. Returns the new document id.
pub async fn create_document<R: Record>(store: &dyn DocumentStore, record: &R) -> Result<String> {
    record.validate()?;

    let mut document = match serde_json::to_value(record)? {
        Value::Object(map) => map,
        _ => {
            return Err(HrisError::ValidationError(format!(
                "{} record must serialize to an object",
                R::COLLECTION
            )))
        }
    };
    stamp(&mut document);

    store.insert(R::COLLECTION, document).await
}

/// Insert a raw document with timestamps into any collection
pub async fn create_raw_document(
    store: &dyn DocumentStore,
    collection: &str,
    mut document: Document,
) -> Result<String> {
    stamp(&mut document);
    store.insert(collection, document).await
}

/// List documents from a collection
pub async fn get_documents(
    store: &dyn DocumentStore,
    collection: &str,
    filter: &Filter,
    limit: usize,
) -> Result<Vec<Document>> {
    store.list(collection, filter, limit).await
}

fn stamp(document: &mut Document) {
    let now = Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
    document.insert("created_at".to_string(), now.clone());
    document.insert("updated_at".to_string(), now);
}
