//! Result rows returned by the graph store

use serde_json::{Map, Number, Value};

/// A single scalar cell value
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl ScalarValue {
    /// Text shown to users: strings unquoted, `null` for missing values
    pub fn display(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

/// A row cell: a scalar, an ordered map (node or map projection) or a list
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(ScalarValue),
    Nested(Vec<(String, FieldValue)>),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn null() -> Self {
        Self::Scalar(ScalarValue::Null)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Scalar(ScalarValue::Text(value.into()))
    }

    pub fn number(value: impl Into<Number>) -> Self {
        Self::Scalar(ScalarValue::Number(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        Self::Scalar(ScalarValue::Bool(value))
    }

    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::null(),
            Value::Bool(b) => Self::bool(b),
            Value::Number(n) => Self::Scalar(ScalarValue::Number(n)),
            Value::String(s) => Self::text(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from_json).collect()),
            Value::Object(map) => Self::Nested(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Scalar(s) => s.to_json(),
            Self::Nested(entries) => {
                let map: Map<String, Value> = entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect();
                Value::Object(map)
            }
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }

    /// Text shown to users
    ///
    /// Nested values render as `k: v, k: v` and lists as comma-joined items.
    pub fn display(&self) -> String {
        match self {
            Self::Scalar(s) => s.display(),
            Self::Nested(entries) => entries
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v.display()))
                .collect::<Vec<_>>()
                .join(", "),
            Self::List(items) => items
                .iter()
                .map(Self::display)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Label used when this value heads a group: a nested value's `name`
    /// entry if it has a non-empty one, otherwise the plain display text
    pub fn group_label(&self) -> String {
        if let Self::Nested(entries) = self {
            let name = entries
                .iter()
                .find(|(k, _)| k == "name")
                .map(|(_, v)| v.display())
                .filter(|s| !s.is_empty() && s != "null");

            if let Some(name) = name {
                return name;
            }
        }

        self.display()
    }
}

/// An ordered sequence of named fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, FieldValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, keeping insertion order
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    /// Build a row from parallel column names and JSON cell values
    pub fn from_columns(columns: &[String], values: Vec<Value>) -> Self {
        let fields = columns
            .iter()
            .cloned()
            .zip(values.into_iter().map(FieldValue::from_json))
            .collect();

        Self { fields }
    }

    /// Build a row from a JSON object, in the object's key order
    pub fn from_json_object(map: Map<String, Value>) -> Self {
        let fields = map
            .into_iter()
            .map(|(k, v)| (k, FieldValue::from_json(v)))
            .collect();

        Self { fields }
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn first(&self) -> Option<&(String, FieldValue)> {
        self.fields.first()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_display() {
        assert_eq!(FieldValue::null().display(), "null");
        assert_eq!(FieldValue::bool(true).display(), "true");
        assert_eq!(FieldValue::number(42).display(), "42");
        assert_eq!(FieldValue::text("Ana").display(), "Ana");
    }

    #[test]
    fn test_nested_and_list_display() {
        let nested = FieldValue::from_json(json!({"name": "Rust 101", "hours": 12}));
        assert_eq!(nested.display(), "name: Rust 101, hours: 12");

        let list = FieldValue::from_json(json!(["a", 1, null]));
        assert_eq!(list.display(), "a, 1, null");
    }

    #[test]
    fn test_group_label_prefers_name() {
        let nested = FieldValue::from_json(json!({"id": 7, "name": "Ana"}));
        assert_eq!(nested.group_label(), "Ana");

        let unnamed = FieldValue::from_json(json!({"id": 7}));
        assert_eq!(unnamed.group_label(), "id: 7");

        assert_eq!(FieldValue::text("Bo").group_label(), "Bo");
    }

    #[test]
    fn test_row_preserves_column_order() {
        let columns = vec!["student".to_string(), "course".to_string(), "progress".to_string()];
        let row = Row::from_columns(&columns, vec![json!("Ana"), json!("Rust"), json!(85)]);

        let names: Vec<&str> = row.fields().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["student", "course", "progress"]);
        assert_eq!(row.get("progress"), Some(&FieldValue::number(85)));
        assert_eq!(row.to_json().to_string(), r#"{"student":"Ana","course":"Rust","progress":85}"#);
    }

    #[test]
    fn test_row_builder() {
        let row = Row::new()
            .with_field("b", FieldValue::text("x"))
            .with_field("a", FieldValue::null());

        assert_eq!(row.len(), 2);
        assert_eq!(row.first().map(|(k, _)| k.as_str()), Some("b"));
        assert!(row.get("missing").is_none());
    }
}
