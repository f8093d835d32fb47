use crate::{
    model::employee::EmployeeRecord,
    roster::RosterClient,
    views::{filter::filter_by_text, profile::EmployeeProfile},
};
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    /// Case-insensitive match on name, department or city
    #[schema(example = "pune")]
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<EmployeeRecord>,
    /// Records in the roster before filtering
    #[schema(example = 120)]
    pub total: usize,
    /// Records left after filtering
    #[schema(example = 12)]
    pub matched: usize,
    #[schema(value_type = String, format = DateTime)]
    pub fetched_at: DateTime<Utc>,
}

/// Directory list
#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Employees matching the search", body = EmployeeListResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 502, description = "Roster source unavailable", body = Object, example = json!({
            "error": "Failed to fetch employee roster"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    roster: web::Data<RosterClient>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    let employees = roster.fetch_employees().await?;
    let search = query.search.as_deref().unwrap_or_default();

    let data = filter_by_text(&employees, search);
    debug!(search, total = employees.len(), matched = data.len(), "Filtered directory");

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        total: employees.len(),
        matched: data.len(),
        data,
        fetched_at: Utc::now(),
    }))
}

/// Employee detail
///
/// The roster source has no lookup by id, so the caller sends the record it
/// got from the directory list.
#[utoipa::path(
    post,
    path = "/api/employees/profile",
    request_body = EmployeeRecord,
    responses(
        (status = 200, description = "Detail view of the record", body = EmployeeProfile),
        (status = 400, description = "Body is not a JSON object"),
        (status = 401, description = "Missing or invalid access token")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn employee_profile(payload: web::Json<EmployeeRecord>) -> impl Responder {
    HttpResponse::Ok().json(EmployeeProfile::from_record(payload.into_inner()))
}
