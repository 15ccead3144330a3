//! Create/list endpoints for HR records
//!
//! Admins see every record; employees see and create only their own.
//! Payroll and KPI entries are written by admins alone.

use serde_json::json;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use super::admin::ListResponse;
use super::{with_identity, with_state, AppState};
use crate::auth::{IdentityContext, Role};
use crate::constants::{DEFAULT_LIST_LIMIT, MAX_BODY_BYTES};
use crate::error::HrisError;
use crate::records::{create_document, get_documents, Attendance, Kpi, LeaveRequest, PayrollItem, Record};
use crate::storage::{filter_eq, Filter as DocFilter};

/// Who may create a record of a given kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatePolicy {
    /// Employees for themselves, admins for anyone
    OwnerOrAdmin,
    AdminOnly,
}

/// List records visible to the caller
pub async fn list_records<R: Record>(context: IdentityContext, state: AppState) -> Result<impl Reply, Rejection> {
    let filter = if context.is_admin() {
        DocFilter::new()
    } else {
        filter_eq("user_email", context.identity.clone())
    };

    let items = get_documents(state.store.as_ref(), R::COLLECTION, &filter, DEFAULT_LIST_LIMIT)
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&ListResponse::new(items)))
}

/// Create a record after checking the caller may write it
pub async fn create_record<R: Record>(
    context: IdentityContext,
    record: R,
    state: AppState,
    policy: CreatePolicy,
) -> Result<impl Reply, Rejection> {
    match policy {
        CreatePolicy::AdminOnly => {
            state
                .guard
                .require_role(&context, Role::Admin)
                .await
                .map_err(warp::reject::custom)?;
        }
        CreatePolicy::OwnerOrAdmin => {
            if !context.is_admin() && record.owner() != context.identity {
                log::warn!(
                    "User {} tried to create a {} record for {}",
                    context.identity,
                    R::COLLECTION,
                    record.owner()
                );
                return Err(warp::reject::custom(HrisError::Forbidden));
            }
        }
    }

    let id = create_document(state.store.as_ref(), &record)
        .await
        .map_err(warp::reject::custom)?;
    log::info!("{} created {} record {}", context.identity, R::COLLECTION, id);

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "id": id })),
        StatusCode::CREATED,
    ))
}

/// `GET` and `POST` on `/<segment>` for one record kind
pub fn record_routes<R: Record>(
    segment: &'static str,
    policy: CreatePolicy,
    state: AppState,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let list = warp::path(segment)
        .and(warp::path::end())
        .and(warp::get())
        .and(with_identity(state.guard.clone()))
        .and(with_state(state.clone()))
        .and_then(list_records::<R>);

    let create = warp::path(segment)
        .and(warp::path::end())
        .and(warp::post())
        .and(with_identity(state.guard.clone()))
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json::<R>())
        .and(with_state(state))
        .and_then(move |context: IdentityContext, record: R, state: AppState| {
            create_record::<R>(context, record, state, policy)
        });

    list.or(create)
}

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    record_routes::<Attendance>("attendance", CreatePolicy::OwnerOrAdmin, state.clone())
        .or(record_routes::<LeaveRequest>("leave", CreatePolicy::OwnerOrAdmin, state.clone()))
        .or(record_routes::<PayrollItem>("payroll", CreatePolicy::AdminOnly, state.clone()))
        .or(record_routes::<Kpi>("kpi", CreatePolicy::AdminOnly, state))
}
