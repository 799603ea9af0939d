// tasks/schema.rs — request payload validation.
//
// Validation runs against the raw JSON body so that type errors and
// constraint errors for every field are collected in one pass. Handlers must
// only pass the normalized output downstream — the raw body is never trusted
// after this point.

use serde::Serialize;
use serde_json::Value;

use super::{CreateTaskInput, TaskStatus, UpdateTaskInput};

const TITLE_MAX_LEN: usize = 100;

/// A single field failure. The full list for a payload is returned together,
/// never just the first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a create payload.
///
/// `title` is required (1–100 chars); `description` and `userId` are optional
/// strings; `status` is optional and defaults to `pending`.
pub fn validate_create(body: &Value) -> Result<CreateTaskInput, Vec<FieldError>> {
    let Some(obj) = body.as_object() else {
        return Err(vec![FieldError::new("body", "Expected a JSON object")]);
    };

    let mut errors = Vec::new();

    let title = match obj.get("title") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("title", "Title is required"));
            None
        }
        Some(value) => check_title(value, &mut errors),
    };
    let description = optional_string(obj.get("description"), "description", &mut errors);
    let status = parse_status(obj.get("status"), &mut errors);
    let user_id = optional_string(obj.get("userId"), "userId", &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CreateTaskInput {
        // Empty-title and non-string cases were pushed into `errors` above.
        title: title.unwrap_or_default(),
        description,
        status: status.unwrap_or_default(),
        user_id,
    })
}

/// Validate an update payload. Every field is optional and nothing is
/// defaulted — an absent field means "keep the current value".
pub fn validate_update(body: &Value) -> Result<UpdateTaskInput, Vec<FieldError>> {
    let Some(obj) = body.as_object() else {
        return Err(vec![FieldError::new("body", "Expected a JSON object")]);
    };

    let mut errors = Vec::new();

    let title = match obj.get("title") {
        None | Some(Value::Null) => None,
        Some(value) => check_title(value, &mut errors),
    };
    let description = optional_string(obj.get("description"), "description", &mut errors);
    let status = parse_status(obj.get("status"), &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(UpdateTaskInput {
        title,
        description,
        status,
    })
}

fn check_title(value: &Value, errors: &mut Vec<FieldError>) -> Option<String> {
    let Some(s) = value.as_str() else {
        errors.push(FieldError::new("title", "Title must be a string"));
        return None;
    };
    if s.is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
        return None;
    }
    if s.chars().count() > TITLE_MAX_LEN {
        errors.push(FieldError::new(
            "title",
            "Title must be less than 100 characters",
        ));
        return None;
    }
    Some(s.to_string())
}

fn optional_string(
    value: Option<&Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(
                field,
                format!("{field} must be a string"),
            ));
            None
        }
    }
}

fn parse_status(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<TaskStatus> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => match TaskStatus::parse(s) {
            Some(status) => Some(status),
            None => {
                errors.push(FieldError::new(
                    "status",
                    "Status must be one of: pending, in-progress, completed",
                ));
                None
            }
        },
        Some(_) => {
            errors.push(FieldError::new(
                "status",
                "Status must be one of: pending, in-progress, completed",
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_accepts_minimal_payload_and_defaults_status() {
        let input = validate_create(&json!({ "title": "Write spec" })).unwrap();
        assert_eq!(input.title, "Write spec");
        assert_eq!(input.status, TaskStatus::Pending);
        assert_eq!(input.description, None);
        assert_eq!(input.user_id, None);
    }

    #[test]
    fn create_accepts_full_payload() {
        let input = validate_create(&json!({
            "title": "Write spec",
            "description": "all sections",
            "status": "in-progress",
            "userId": "u1",
        }))
        .unwrap();
        assert_eq!(input.status, TaskStatus::InProgress);
        assert_eq!(input.description.as_deref(), Some("all sections"));
        assert_eq!(input.user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn create_rejects_empty_title_with_title_field_error() {
        let errors = validate_create(&json!({ "title": "" })).unwrap_err();
        assert!(!errors.is_empty());
        assert!(errors.iter().any(|e| e.field == "title"));
    }

    #[test]
    fn create_rejects_overlong_title() {
        let errors = validate_create(&json!({ "title": "x".repeat(101) })).unwrap_err();
        assert_eq!(errors[0].field, "title");
    }

    #[test]
    fn create_collects_all_field_errors_not_just_the_first() {
        let errors = validate_create(&json!({
            "description": 7,
            "status": "done",
            "userId": false,
        }))
        .unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"description"));
        assert!(fields.contains(&"status"));
        assert!(fields.contains(&"userId"));
    }

    #[test]
    fn create_rejects_non_object_body() {
        let errors = validate_create(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(errors[0].field, "body");
    }

    #[test]
    fn update_allows_empty_payload() {
        let input = validate_update(&json!({})).unwrap();
        assert!(input.title.is_none());
        assert!(input.description.is_none());
        assert!(input.status.is_none());
    }

    #[test]
    fn update_applies_same_title_constraints() {
        let errors = validate_update(&json!({ "title": "" })).unwrap_err();
        assert_eq!(errors[0].field, "title");
    }

    #[test]
    fn update_rejects_unknown_status() {
        let errors = validate_update(&json!({ "status": "paused" })).unwrap_err();
        assert_eq!(errors[0].field, "status");
    }
}
