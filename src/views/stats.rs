use serde::Serialize;
use utoipa::ToSchema;

use crate::model::employee::EmployeeRecord;
use crate::views::{
    grouping::{Category, group_by},
    salary::salary_of,
};

/// Mean of the parsed salaries; 0 for an empty roster.
pub fn average_salary(records: &[EmployeeRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }

    let total: i128 = records.iter().map(|r| i128::from(salary_of(r))).sum();
    total as f64 / records.len() as f64
}

/// Headline numbers of the analytics dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Kpis {
    #[schema(example = 120)]
    pub total_employees: usize,
    #[schema(example = 48250.5)]
    pub average_salary: f64,
    #[schema(example = 48251)]
    pub average_salary_rounded: i64,
    #[schema(example = 6)]
    pub departments: usize,
    #[schema(example = 14)]
    pub cities: usize,
}

impl Kpis {
    pub fn from_records(records: &[EmployeeRecord]) -> Self {
        let average_salary = average_salary(records);

        Self {
            total_employees: records.len(),
            average_salary,
            average_salary_rounded: average_salary.round() as i64,
            departments: group_by(records, Category::Department).len(),
            cities: group_by(records, Category::City).len(),
        }
    }
}
