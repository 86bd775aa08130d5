use serde_json::Value;

pub mod admin;
pub mod applications;
pub mod assessments;
pub mod auth;
pub mod booking;
pub mod catalog;

/// Required non-empty string field from a JSON request body.
fn str_field<'a>(body: &'a Value, name: &str) -> Option<&'a str> {
    body.get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// New v4 id rendered the way every collection stores keys.
fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
