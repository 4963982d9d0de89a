//! The fruit resource: schema, typed record, and seed fixtures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema::{Field, Schema};
use crate::storage::{DocumentId, Fields};

pub const SCHEMA_NAME: &str = "fruit";

pub fn schema() -> Schema {
    Schema::new(
        SCHEMA_NAME,
        vec![
            Field::required_text("name"),
            Field::required_text("color"),
            Field::checkbox("readyToEat"),
        ],
    )
}

/// A stored fruit as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fruit {
    pub id: DocumentId,
    pub name: String,
    pub color: String,
    pub ready_to_eat: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fruit fields without store-managed keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FruitDraft {
    pub name: String,
    pub color: String,
    pub ready_to_eat: bool,
}

impl FruitDraft {
    pub fn new(name: &str, color: &str, ready_to_eat: bool) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
            ready_to_eat,
        }
    }

    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), Value::String(self.name));
        fields.insert("color".to_string(), Value::String(self.color));
        fields.insert("readyToEat".to_string(), Value::Bool(self.ready_to_eat));
        fields
    }
}

/// Sample data inserted by the seed route
pub fn fixtures() -> Vec<FruitDraft> {
    vec![
        FruitDraft::new("grapefruit", "pink", true),
        FruitDraft::new("grape", "purple", false),
        FruitDraft::new("avocado", "green", true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_pass_schema() {
        let schema = schema();
        for draft in fixtures() {
            let expected = draft.clone();
            let normalized = schema.normalize_create(draft.into_fields()).unwrap();
            let roundtrip: FruitDraft =
                serde_json::from_value(Value::Object(normalized)).unwrap();
            assert_eq!(roundtrip, expected);
        }
    }

    #[test]
    fn test_fixture_set() {
        let names: Vec<String> = fixtures().into_iter().map(|f| f.name).collect();
        assert_eq!(names, ["grapefruit", "grape", "avocado"]);
    }
}
