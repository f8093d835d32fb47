use crate::model::employee::EmployeeRecord;

/// Records whose name, department or city contains `query`, ignoring case.
///
/// An empty query keeps everything.
pub fn filter_by_text(records: &[EmployeeRecord], query: &str) -> Vec<EmployeeRecord> {
    let needle = query.to_lowercase();

    records
        .iter()
        .filter(|record| matches_query(record, &needle))
        .cloned()
        .collect()
}

fn matches_query(record: &EmployeeRecord, needle: &str) -> bool {
    [
        Some(record.name.as_str()),
        record.department.as_deref(),
        record.city.as_deref(),
    ]
    .into_iter()
    .any(|field| field.unwrap_or_default().to_lowercase().contains(needle))
}
