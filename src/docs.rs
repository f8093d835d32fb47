use crate::api::analytics::{AnalyticsQuery, AnalyticsResponse};
use crate::api::employee::{EmployeeListResponse, EmployeeQuery};
use crate::api::map::MapResponse;
use crate::model::employee::EmployeeRecord;
use crate::models::{LoginReqDto, TokenPair};
use crate::views::{
    geo::MapMarker, grouping::CategoryCount, profile::EmployeeProfile, salary::SalaryBar,
    stats::Kpis,
};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Directory API",
        version = "1.0.0",
        description = r#"
## Employee Directory

Read-only views over an employee roster served by an upstream HTTP source.
Every request fetches the roster once, flattens whatever envelope the source
used, and derives the requested view from it. Nothing is cached.

### 🔹 Views
- **Directory**: list employees, optionally filtered by name, department or city
- **Profile**: detail view of a record the client already holds
- **Analytics**: headcount, average salary, top salaries, department and city distribution
- **Map**: employees grouped by city with coordinates

### 🔐 Security
Everything under `/api` requires a **JWT Bearer** access token from `/auth/login`.

### 📦 Errors
- `401` when the token is missing, invalid or expired
- `502` when the roster source cannot be reached or answers with something other than JSON

---
Built with **Rust**, **Actix Web**, **reqwest**, and **Utoipa**.
"#,
    ),
    paths(
        crate::routes::health,

        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,
        crate::auth::handlers::me,

        crate::api::employee::list_employees,
        crate::api::employee::employee_profile,
        crate::api::analytics::analytics,
        crate::api::map::employee_map
    ),
    components(
        schemas(
            LoginReqDto,
            TokenPair,
            EmployeeRecord,
            EmployeeQuery,
            EmployeeListResponse,
            EmployeeProfile,
            AnalyticsQuery,
            AnalyticsResponse,
            Kpis,
            SalaryBar,
            CategoryCount,
            MapResponse,
            MapMarker
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and token lifecycle"),
        (name = "Employee", description = "Directory and profile views"),
        (name = "Analytics", description = "Dashboard figures"),
        (name = "Map", description = "Employees by city"),
        (name = "Health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_view() {
        let doc = ApiDoc::openapi();
        for path in ["/auth/login", "/api/employees", "/api/employees/profile", "/api/analytics", "/api/map"] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
        let schemes = doc.components.unwrap().security_schemes;
        assert!(schemes.contains_key("bearer_auth"));
    }
}
