use serde::Serialize;
use utoipa::ToSchema;

use crate::model::employee::EmployeeRecord;
use crate::views::salary::{parse_amount, salary_of};

pub const DEFAULT_STATUS: &str = "Active";

/// Detail view of a single employee, built from the record the caller holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EmployeeProfile {
    pub employee: EmployeeRecord,
    /// Avatar letter; absent for nameless records.
    #[schema(example = "A", nullable = true)]
    pub initial: Option<String>,
    #[schema(example = "Active")]
    pub status: String,
    pub is_active: bool,
    #[schema(example = 54000)]
    pub salary: i64,
    #[schema(example = 31)]
    pub age: i64,
}

impl EmployeeProfile {
    pub fn from_record(employee: EmployeeRecord) -> Self {
        let initial = employee
            .name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect());

        let status = match employee.status_label.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => DEFAULT_STATUS.to_string(),
        };

        Self {
            initial,
            is_active: status == DEFAULT_STATUS,
            status,
            salary: salary_of(&employee),
            age: parse_amount(employee.age_text.as_deref()),
            employee,
        }
    }
}
