use crate::{
    roster::RosterClient,
    views::{
        TOP_CITIES, TOP_SALARIES,
        grouping::{Category, CategoryCount, group_by},
        salary::{SalaryBar, salary_bars},
        stats::Kpis,
    },
};
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const MAX_ENTRIES: usize = 100;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AnalyticsQuery {
    /// Bars in the salary chart (default 10)
    #[schema(example = 10)]
    pub top: Option<usize>,
    /// Bars in the city chart (default 5)
    #[schema(example = 5)]
    pub cities: Option<usize>,
}

#[derive(Serialize, ToSchema)]
pub struct AnalyticsResponse {
    pub kpis: Kpis,
    pub top_salaries: Vec<SalaryBar>,
    pub departments: Vec<CategoryCount>,
    pub top_cities: Vec<CategoryCount>,
    #[schema(value_type = String, format = DateTime)]
    pub fetched_at: DateTime<Utc>,
}

fn chart_size(requested: Option<usize>, default: usize) -> usize {
    requested.unwrap_or(default).clamp(1, MAX_ENTRIES)
}

/// Analytics dashboard
#[utoipa::path(
    get,
    path = "/api/analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Dashboard figures", body = AnalyticsResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 502, description = "Roster source unavailable")
    ),
    tag = "Analytics",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn analytics(
    roster: web::Data<RosterClient>,
    query: web::Query<AnalyticsQuery>,
) -> actix_web::Result<impl Responder> {
    let top = chart_size(query.top, TOP_SALARIES);
    let cities = chart_size(query.cities, TOP_CITIES);

    let employees = roster.fetch_employees().await?;

    Ok(HttpResponse::Ok().json(AnalyticsResponse {
        kpis: Kpis::from_records(&employees),
        top_salaries: salary_bars(&employees, top),
        departments: group_by(&employees, Category::Department).counts(),
        top_cities: group_by(&employees, Category::City).top(cities),
        fetched_at: Utc::now(),
    }))
}
