//! A minimal stand-in for the opaque schema library spec §1 treats as an
//! external collaborator.
//!
//! The VM only needs `validate(schema, value) -> bool` and a way to
//! enumerate an object schema's declared properties (used by `return` to
//! decide which `state` keys to project, spec §4.5). `Schema` is a trait so
//! a host can plug in a real JSON Schema validator; `ObjectSchema` is the
//! small concrete implementation the built-in atoms declare their own
//! input contracts with.

use crate::value::Value;

pub trait Schema: std::fmt::Debug {
    fn validate(&self, value: &Value) -> bool;

    /// Declared property names, in declaration order. Used by `return` to
    /// build its output object (spec §4.5 "build an object whose keys are
    /// the properties declared by `schema`").
    fn properties(&self) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Any,
    Null,
    Bool,
    Number,
    String,
    List,
    Object,
}

impl FieldType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::Any => true,
            FieldType::Null => value.is_null(),
            FieldType::Bool => matches!(value, Value::Bool(_)),
            FieldType::Number => matches!(value, Value::Number(_)),
            FieldType::String => matches!(value, Value::String(_)),
            FieldType::List => matches!(value, Value::List(_)),
            FieldType::Object => matches!(value, Value::Object(_)),
        }
    }
}

/// A flat object schema: a list of required fields and their expected
/// types. Good enough to validate the built-in atoms' own inputs without
/// pulling in a full JSON Schema implementation (out of scope, spec §1).
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    required: Vec<(String, FieldType)>,
    optional: Vec<(String, FieldType)>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.required.push((name.into(), ty));
        self
    }

    pub fn optional(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.optional.push((name.into(), ty));
        self
    }

    /// Builds a schema that only declares property names, each
    /// unconstrained (`FieldType::Any`) — what `return` needs to enumerate
    /// which `state` keys make up its output object without validating
    /// their shape (spec §4.5 "`return` ... never validates `schema`").
    pub fn from_property_names(names: impl IntoIterator<Item = String>) -> Self {
        let mut schema = ObjectSchema::new();
        for name in names {
            schema = schema.optional(name, FieldType::Any);
        }
        schema
    }
}

impl Schema for ObjectSchema {
    fn validate(&self, value: &Value) -> bool {
        let Some(obj) = value.as_object() else {
            return false;
        };
        for (name, ty) in &self.required {
            match obj.get(name) {
                Some(v) if ty.matches(v) => {}
                _ => return false,
            }
        }
        for (name, ty) in &self.optional {
            if let Some(v) = obj.get(name) {
                if !ty.matches(v) {
                    return false;
                }
            }
        }
        true
    }

    fn properties(&self) -> Vec<String> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use im::HashMap;

    fn obj(pairs: &[(&str, Value)]) -> Value {
        let mut map = HashMap::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.clone());
        }
        Value::Object(map)
    }

    #[test]
    fn missing_required_field_fails_validation() {
        let schema = ObjectSchema::new().require("key", FieldType::String);
        assert!(!schema.validate(&obj(&[])));
    }

    #[test]
    fn wrong_type_on_required_field_fails_validation() {
        let schema = ObjectSchema::new().require("key", FieldType::String);
        assert!(!schema.validate(&obj(&[("key", Value::Number(1.0))])));
    }

    #[test]
    fn present_and_well_typed_fields_pass() {
        let schema = ObjectSchema::new()
            .require("key", FieldType::String)
            .optional("ttl", FieldType::Number);
        assert!(schema.validate(&obj(&[("key", Value::String("a".into()))])));
        assert!(schema.validate(&obj(&[
            ("key", Value::String("a".into())),
            ("ttl", Value::Number(60.0))
        ])));
    }

    #[test]
    fn non_object_input_fails_validation() {
        let schema = ObjectSchema::new();
        assert!(!schema.validate(&Value::Number(1.0)));
    }

    #[test]
    fn from_property_names_preserves_order_and_accepts_anything() {
        let schema = ObjectSchema::from_property_names(vec!["x".to_string(), "y".to_string()]);
        assert_eq!(schema.properties(), vec!["x".to_string(), "y".to_string()]);
        assert!(schema.validate(&obj(&[("x", Value::Number(1.0))])));
    }
}
