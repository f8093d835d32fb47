use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// One employee as sent by the roster source.
///
/// Serialized under the upstream field names so raw strings reach clients
/// untouched. Every field tolerates strings, numbers, booleans and nulls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": "1",
        "user_name": "Ann Lee",
        "user_email": "ann.lee@company.com",
        "user_age": "31",
        "user_gender": "Female",
        "user_salary": "54000",
        "user_city": "Pune",
        "user_department": "Sales",
        "user_status": "Active"
    })
)]
pub struct EmployeeRecord {
    #[serde(default, deserialize_with = "text_or_empty")]
    #[schema(example = "1")]
    pub id: String,

    #[serde(rename = "user_name", default, deserialize_with = "text_or_empty")]
    #[schema(example = "Ann Lee")]
    pub name: String,

    #[serde(
        rename = "user_email",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(example = "ann.lee@company.com", nullable = true)]
    pub email: Option<String>,

    #[serde(
        rename = "user_age",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(example = "31", nullable = true)]
    pub age_text: Option<String>,

    #[serde(
        rename = "user_gender",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(example = "Female", nullable = true)]
    pub gender_label: Option<String>,

    #[serde(
        rename = "user_salary",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(example = "54000", nullable = true)]
    pub salary_text: Option<String>,

    #[serde(
        rename = "user_city",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(example = "Pune", nullable = true)]
    pub city: Option<String>,

    #[serde(
        rename = "user_department",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(example = "Sales", nullable = true)]
    pub department: Option<String>,

    #[serde(
        rename = "user_status",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(example = "Active", nullable = true)]
    pub status_label: Option<String>,
}

impl EmployeeRecord {
    /// Decode one candidate taken out of a roster envelope.
    ///
    /// Returns `None` when the candidate is not a JSON object; callers decide
    /// what to do with it.
    pub fn from_candidate(candidate: Value) -> Option<Self> {
        if !candidate.is_object() {
            return None;
        }
        // Every field is lenient, so an object always decodes.
        serde_json::from_value(candidate).ok()
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_text))
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}
