use std::cmp::Reverse;

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::employee::EmployeeRecord;
use crate::views::UNKNOWN_LABEL;

/// Integer value of a numeric text field.
///
/// Reads the leading integer: whitespace is skipped, a sign is honoured and
/// digits are consumed up to the first non-digit. Anything without digits
/// is 0. Out-of-range values saturate.
pub fn parse_amount(text: Option<&str>) -> i64 {
    let Some(text) = text else { return 0 };
    let text = text.trim_start();

    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });

    if negative { -value } else { value }
}

pub fn salary_of(record: &EmployeeRecord) -> i64 {
    parse_amount(record.salary_text.as_deref())
}

/// The `n` best paid records, highest first; ties keep input order.
pub fn top_by_salary(records: &[EmployeeRecord], n: usize) -> Vec<&EmployeeRecord> {
    let mut ranked: Vec<&EmployeeRecord> = records.iter().collect();
    // sort_by_key is stable
    ranked.sort_by_key(|record| Reverse(salary_of(record)));
    ranked.truncate(n);
    ranked
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SalaryBar {
    #[schema(example = "Ann Lee")]
    pub name: String,
    #[schema(example = 54000)]
    pub salary: i64,
}

/// Chart-ready projection of [`top_by_salary`].
pub fn salary_bars(records: &[EmployeeRecord], n: usize) -> Vec<SalaryBar> {
    top_by_salary(records, n)
        .into_iter()
        .map(|record| SalaryBar {
            name: if record.name.is_empty() {
                UNKNOWN_LABEL.to_string()
            } else {
                record.name.clone()
            },
            salary: salary_of(record),
        })
        .collect()
}
