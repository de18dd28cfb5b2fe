//! Declared input shapes for tools.
//!
//! Every tool describes its arguments as an [`InputShape`]. The registry runs
//! one shared validation routine against it before any handler executes, and
//! the same shape renders to the JSON Schema advertised to callers.

use serde_json::{Map, Value, json};

use crate::error::FieldViolation;

/// The primitive type accepted for a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    String,
    /// A string restricted to a closed set of values.
    Enum(Vec<&'static str>),
}

/// One named argument in an input shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: Option<&'static str>,
}

impl FieldSpec {
    /// A required string field.
    pub fn string(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
            required: true,
            description: None,
        }
    }

    /// A required field restricted to `values`.
    pub fn enumeration(name: &'static str, values: &[&'static str]) -> Self {
        Self {
            name,
            kind: FieldKind::Enum(values.to_vec()),
            required: true,
            description: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    fn check(&self, value: &Value) -> Option<String> {
        let Some(text) = value.as_str() else {
            return Some(format!("must be a string, got {}", type_name(value)));
        };
        match &self.kind {
            FieldKind::String => None,
            FieldKind::Enum(allowed) if allowed.iter().any(|v| *v == text) => None,
            FieldKind::Enum(allowed) => Some(format!(
                "must be one of [{}], got \"{text}\"",
                allowed.join(", ")
            )),
        }
    }

    fn to_json_schema(&self) -> Value {
        let mut prop = Map::new();
        prop.insert("type".into(), json!("string"));
        if let FieldKind::Enum(values) = &self.kind {
            prop.insert("enum".into(), json!(values));
        }
        if let Some(description) = self.description {
            prop.insert("description".into(), json!(description));
        }
        Value::Object(prop)
    }
}

/// An ordered set of fields a tool accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputShape {
    fields: Vec<FieldSpec>,
}

impl InputShape {
    /// A shape that accepts no arguments at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate `arguments` against this shape.
    ///
    /// `null` is treated as an empty object. Unknown fields are rejected.
    /// All violations are collected so the caller sees every problem at once.
    pub fn validate(&self, arguments: &Value) -> Result<(), Vec<FieldViolation>> {
        let empty = Map::new();
        let args = match arguments {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(vec![FieldViolation::new(
                    "",
                    format!("arguments must be an object, got {}", type_name(other)),
                )]);
            }
        };

        let mut violations = Vec::new();

        for field in &self.fields {
            match args.get(field.name) {
                Some(value) => {
                    if let Some(reason) = field.check(value) {
                        violations.push(FieldViolation::new(field.name, reason));
                    }
                }
                None if field.required => {
                    violations.push(FieldViolation::new(field.name, "is required"));
                }
                None => {}
            }
        }

        for key in args.keys() {
            if !self.fields.iter().any(|f| f.name == key.as_str()) {
                violations.push(FieldViolation::new(key.as_str(), "is not an accepted argument"));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Render as a JSON Schema object for tool enumeration.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.to_json_schema()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false
        })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
