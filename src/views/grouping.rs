use std::{cmp::Reverse, collections::HashMap};

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::employee::EmployeeRecord;
use crate::views::UNKNOWN_LABEL;

/// Field a roster can be bucketed by.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Category {
    Department,
    City,
}

impl Category {
    /// Bucket label for `record`; absent or empty values read `"Unknown"`.
    pub fn label_of<'a>(&self, record: &'a EmployeeRecord) -> &'a str {
        let value = match self {
            Category::Department => record.department.as_deref(),
            Category::City => record.city.as_deref(),
        };

        match value {
            Some(v) if !v.is_empty() => v,
            _ => UNKNOWN_LABEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub label: String,
    pub members: Vec<EmployeeRecord>,
}

impl Bucket {
    pub fn count(&self) -> usize {
        self.members.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategoryCount {
    #[schema(example = "Pune")]
    pub name: String,
    #[schema(example = 12)]
    pub value: usize,
}

/// Buckets in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Groups {
    buckets: Vec<Bucket>,
}

impl Groups {
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn into_buckets(self) -> Vec<Bucket> {
        self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn count_of(&self, label: &str) -> Option<usize> {
        self.buckets
            .iter()
            .find(|bucket| bucket.label == label)
            .map(Bucket::count)
    }

    pub fn counts(&self) -> Vec<CategoryCount> {
        self.buckets
            .iter()
            .map(|bucket| CategoryCount {
                name: bucket.label.clone(),
                value: bucket.count(),
            })
            .collect()
    }

    /// The `k` largest buckets; equal counts keep first-seen order.
    pub fn top(&self, k: usize) -> Vec<CategoryCount> {
        let mut ranked = self.counts();
        ranked.sort_by_key(|entry| Reverse(entry.value));
        ranked.truncate(k);
        ranked
    }
}

pub fn group_by(records: &[EmployeeRecord], category: Category) -> Groups {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<Bucket> = Vec::new();

    for record in records {
        let label = category.label_of(record);
        let slot = *index.entry(label).or_insert_with(|| {
            buckets.push(Bucket {
                label: label.to_string(),
                members: Vec::new(),
            });
            buckets.len() - 1
        });
        buckets[slot].members.push(record.clone());
    }

    Groups { buckets }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_city(id: &str, city: Option<&str>) -> EmployeeRecord {
        EmployeeRecord {
            id: id.into(),
            city: city.map(Into::into),
            ..Default::default()
        }
    }

    fn in_dept(id: &str, dept: &str) -> EmployeeRecord {
        EmployeeRecord {
            id: id.into(),
            department: Some(dept.into()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_and_absent_cities_are_unknown() {
        let records = vec![
            in_city("1", Some("Pune")),
            in_city("2", Some("")),
            in_city("3", Some("Pune")),
            in_city("4", None),
        ];

        let groups = group_by(&records, Category::City);
        assert_eq!(
            groups.counts(),
            vec![
                CategoryCount { name: "Pune".into(), value: 2 },
                CategoryCount { name: "Unknown".into(), value: 2 },
            ]
        );
    }

    #[test]
    fn buckets_keep_their_members() {
        let records = vec![in_city("1", Some("Pune")), in_city("2", Some("Delhi")), in_city("3", Some("Pune"))];

        let groups = group_by(&records, Category::City);
        let pune = &groups.buckets()[0];
        assert_eq!(pune.label, "Pune");
        let ids: Vec<_> = pune.members.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        assert_eq!(groups.count_of("Delhi"), Some(1));
        assert_eq!(groups.count_of("Mumbai"), None);
    }

    #[test]
    fn groups_by_department() {
        let records = vec![in_dept("1", "Sales"), in_dept("2", "HR"), in_dept("3", "Sales")];

        let groups = group_by(&records, Category::Department);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.count_of("Sales"), Some(2));
        assert_eq!(groups.count_of("HR"), Some(1));
    }

    #[test]
    fn top_sorts_by_count_then_first_seen() {
        let cities = ["A", "B", "B", "C", "C", "D", "E", "F", "F", "F"];
        let records: Vec<_> = cities
            .iter()
            .enumerate()
            .map(|(i, c)| in_city(&i.to_string(), Some(*c)))
            .collect();

        let top: Vec<_> = group_by(&records, Category::City)
            .top(5)
            .into_iter()
            .map(|entry| (entry.name, entry.value))
            .collect();

        assert_eq!(
            top,
            vec![
                ("F".to_string(), 3),
                ("B".to_string(), 2),
                ("C".to_string(), 2),
                ("A".to_string(), 1),
                ("D".to_string(), 1),
            ]
        );
    }

    #[test]
    fn empty_roster_has_no_buckets() {
        let groups = group_by(&[], Category::Department);
        assert!(groups.is_empty());
        assert!(groups.top(5).is_empty());
    }

    #[test]
    fn grouping_is_repeatable() {
        let records = vec![in_city("1", Some("Pune")), in_city("2", None)];
        assert_eq!(group_by(&records, Category::City), group_by(&records, Category::City));
    }
}
