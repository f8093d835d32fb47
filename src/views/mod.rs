//! Pure builders over a normalized roster. None of them mutate their input.

pub mod filter;
pub mod geo;
pub mod grouping;
pub mod profile;
pub mod salary;
pub mod stats;

/// Label used for missing names and categories.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Bars shown in the salary chart.
pub const TOP_SALARIES: usize = 10;
/// Cities shown in the city chart.
pub const TOP_CITIES: usize = 5;
