//! Schema descriptors and payload normalization
//!
//! A [`Schema`] lists the fields a resource accepts. Normalization turns a
//! loosely typed request payload (JSON object or decoded HTML form) into the
//! field map that gets stored:
//!
//! - undeclared keys are dropped
//! - [`FieldKind::Text`] values are kept as strings; numbers and booleans are
//!   stringified, null and `""` count as absent
//! - [`FieldKind::Checkbox`] values follow the checkbox rule, see [`checkbox`]

use serde_json::Value;

use super::error::ValidationError;
use crate::storage::Fields;

/// How a single field is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// HTML checkbox: stored as a boolean, never absent
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl Field {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: false,
        }
    }

    pub const fn required_text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: true,
        }
    }

    pub const fn checkbox(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Checkbox,
            required: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: &'static str,
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(name: &'static str, fields: Vec<Field>) -> Self {
        Self { name, fields }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Normalize a payload for insertion
    ///
    /// Every checkbox field ends up as a boolean; every required field must
    /// be present.
    pub fn normalize_create(&self, mut payload: Fields) -> Result<Fields, ValidationError> {
        let mut normalized = Fields::new();

        for field in &self.fields {
            let value = payload.remove(field.name);
            match field.kind {
                FieldKind::Checkbox => {
                    normalized.insert(field.name.to_string(), Value::Bool(checkbox(value.as_ref())));
                }
                FieldKind::Text => match text(field, value)? {
                    Some(text) => {
                        normalized.insert(field.name.to_string(), Value::String(text));
                    }
                    None if field.required => {
                        return Err(ValidationError::MissingField(field.name));
                    }
                    None => {}
                },
            }
        }

        Ok(normalized)
    }

    /// Normalize a partial payload for update
    ///
    /// Only fields present in the payload are returned. A checkbox absent
    /// from the payload keeps its stored value. A required field that is
    /// present must not be blank.
    pub fn normalize_update(&self, mut payload: Fields) -> Result<Fields, ValidationError> {
        let mut normalized = Fields::new();

        for field in &self.fields {
            let Some(value) = payload.remove(field.name) else {
                continue;
            };
            match field.kind {
                FieldKind::Checkbox => {
                    normalized.insert(field.name.to_string(), Value::Bool(checkbox(Some(&value))));
                }
                FieldKind::Text => match text(field, Some(value))? {
                    Some(text) => {
                        normalized.insert(field.name.to_string(), Value::String(text));
                    }
                    None if field.required => {
                        return Err(ValidationError::MissingField(field.name));
                    }
                    None => {
                        normalized.insert(field.name.to_string(), Value::Null);
                    }
                },
            }
        }

        Ok(normalized)
    }
}

/// Checkbox rule
///
/// A checked HTML checkbox submits the string `"on"` and an unchecked one
/// submits nothing. JSON booleans pass through; everything else is `false`.
///
/// Keeping booleans departs from a strict form-only rule, under which a JSON
/// `true` would also read as unchecked.
pub fn checkbox(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(checked)) => *checked,
        Some(Value::String(s)) => s == "on",
        _ => false,
    }
}

fn text(field: &Field, value: Option<Value>) -> Result<Option<String>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(Value::Array(_)) | Some(Value::Object(_)) => Err(ValidationError::InvalidField {
            field: field.name,
            reason: "must be text",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new(
            "fruit",
            vec![
                Field::required_text("name"),
                Field::required_text("color"),
                Field::checkbox("readyToEat"),
            ],
        )
    }

    fn payload(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_checkbox_rule() {
        assert!(checkbox(Some(&json!("on"))));
        assert!(checkbox(Some(&json!(true))));
        assert!(!checkbox(Some(&json!(false))));
        assert!(!checkbox(Some(&json!("off"))));
        assert!(!checkbox(Some(&json!("true"))));
        assert!(!checkbox(Some(&json!("ON"))));
        assert!(!checkbox(Some(&json!(1))));
        assert!(!checkbox(Some(&Value::Null)));
        assert!(!checkbox(None));
    }

    #[test]
    fn test_create_normalizes_checkbox() {
        let checked = schema()
            .normalize_create(payload(json!({"name": "kiwi", "color": "brown", "readyToEat": "on"})))
            .unwrap();
        assert_eq!(checked["readyToEat"], json!(true));

        let absent = schema()
            .normalize_create(payload(json!({"name": "kiwi", "color": "brown"})))
            .unwrap();
        assert_eq!(absent["readyToEat"], json!(false));
    }

    #[test]
    fn test_create_requires_fields() {
        let err = schema()
            .normalize_create(payload(json!({"color": "brown"})))
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("name"));
        assert_eq!(err.field(), "name");

        let err = schema()
            .normalize_create(payload(json!({"name": "kiwi", "color": ""})))
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("color"));
    }

    #[test]
    fn test_create_drops_undeclared_fields() {
        let normalized = schema()
            .normalize_create(payload(json!({
                "name": "kiwi",
                "color": "brown",
                "id": "forged",
                "owner": "mallory",
            })))
            .unwrap();

        assert_eq!(normalized.len(), 3);
        assert!(!normalized.contains_key("id"));
        assert!(!normalized.contains_key("owner"));
    }

    #[test]
    fn test_create_stringifies_scalars_and_rejects_structures() {
        let normalized = schema()
            .normalize_create(payload(json!({"name": 42, "color": "red"})))
            .unwrap();
        assert_eq!(normalized["name"], json!("42"));

        let err = schema()
            .normalize_create(payload(json!({"name": ["a"], "color": "red"})))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { field: "name", .. }));
    }

    #[test]
    fn test_update_is_partial() {
        let normalized = schema()
            .normalize_update(payload(json!({"color": "green"})))
            .unwrap();

        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized["color"], json!("green"));
        assert!(!normalized.contains_key("readyToEat"));
    }

    #[test]
    fn test_update_normalizes_present_checkbox() {
        let normalized = schema()
            .normalize_update(payload(json!({"readyToEat": "on"})))
            .unwrap();
        assert_eq!(normalized["readyToEat"], json!(true));

        let normalized = schema()
            .normalize_update(payload(json!({"readyToEat": "nope"})))
            .unwrap();
        assert_eq!(normalized["readyToEat"], json!(false));
    }

    #[test]
    fn test_update_rejects_blank_required_field() {
        let err = schema()
            .normalize_update(payload(json!({"name": ""})))
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("name"));

        let err = schema()
            .normalize_update(payload(json!({"color": null})))
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("color"));
    }

    fn profile() -> Schema {
        Schema::new(
            "profile",
            vec![Field::required_text("name"), Field::text("nickname")],
        )
    }

    #[test]
    fn test_optional_text_absent_on_create() {
        let normalized = profile()
            .normalize_create(payload(json!({"name": "kiwi"})))
            .unwrap();
        assert_eq!(normalized.len(), 1);
        assert!(!normalized.contains_key("nickname"));

        let blank = profile()
            .normalize_create(payload(json!({"name": "kiwi", "nickname": ""})))
            .unwrap();
        assert!(!blank.contains_key("nickname"));
    }

    #[test]
    fn test_optional_text_stringifies_scalars() {
        let normalized = profile()
            .normalize_create(payload(json!({"name": "kiwi", "nickname": 7})))
            .unwrap();
        assert_eq!(normalized["nickname"], json!("7"));

        let normalized = profile()
            .normalize_update(payload(json!({"nickname": false})))
            .unwrap();
        assert_eq!(normalized["nickname"], json!("false"));
    }

    #[test]
    fn test_optional_text_blank_on_update_clears() {
        for blank in [json!(""), Value::Null] {
            let normalized = profile()
                .normalize_update(payload(json!({"nickname": blank})))
                .unwrap();
            assert_eq!(normalized.len(), 1);
            assert_eq!(normalized["nickname"], Value::Null);
        }

        let untouched = profile()
            .normalize_update(payload(json!({"name": "kiwi"})))
            .unwrap();
        assert!(!untouched.contains_key("nickname"));
    }
}
