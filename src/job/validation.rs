use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

use super::store::StoreError;

/// Error body printed for any failed tracker command
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

/// Required text fields must contain something other than whitespace
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Collects validation messages per field: `{"title": {"errors": ["Title is required"]}}`
pub fn field_messages(errors: &ValidationErrors) -> serde_json::Map<String, serde_json::Value> {
    let mut fields = serde_json::Map::new();

    for (field, errors) in errors.field_errors() {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation error in field: {}", field))
            })
            .collect();
        fields.insert(field.to_string(), serde_json::json!({ "errors": messages }));
    }

    fields
}

impl From<&StoreError> for ErrorResponse {
    fn from(err: &StoreError) -> Self {
        match err {
            StoreError::Validation(errors) => ErrorResponse {
                error: "Validation failed".to_string(),
                fields: serde_json::Value::Object(field_messages(errors)),
            },
            StoreError::NotFound { id } => ErrorResponse {
                error: "Not found".to_string(),
                fields: serde_json::json!({ "message": format!("Job with id {} not found", id) }),
            },
            StoreError::Persistence(e) => ErrorResponse {
                error: "Changes were not saved".to_string(),
                fields: serde_json::json!({ "message": e.to_string() }),
            },
            StoreError::IdUnavailable { attempts } => ErrorResponse {
                error: "Failed to create job".to_string(),
                fields: serde_json::json!({
                    "message": format!("No unique id after {} attempts", attempts)
                }),
            },
        }
    }
}
