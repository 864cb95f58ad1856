//! The AST wire format (spec §6).
//!
//! A `Step` is a JSON object with a required `op` field, an optional
//! `result` binding name, and a bag of atom-specific fields. We keep the
//! atom-specific payload as a raw `serde_json::Map` rather than typed
//! per-atom structs — atoms parse their own fields out of `step.fields`,
//! the way the spec's `inputData` (step with `op`/`result` stripped) is
//! handed uninterpreted to `validate`.

use serde_json::{Map, Value as Json};

pub type OpCode = String;

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub op: OpCode,
    pub result: Option<String>,
    pub fields: Map<String, Json>,
}

impl Step {
    /// Reconstructs the full step payload (minus `op`/`result`) as JSON; this
    /// is what gets validated against an atom's `inputSchema` (spec §4.4
    /// step 1).
    pub fn input_data(&self) -> Json {
        Json::Object(self.fields.clone())
    }

    pub fn field(&self, name: &str) -> Option<&Json> {
        self.fields.get(name)
    }
}

impl TryFrom<Json> for Step {
    type Error = String;

    fn try_from(value: Json) -> Result<Self, Self::Error> {
        let Json::Object(mut map) = value else {
            return Err("a step must be a JSON object".to_string());
        };
        let op = match map.remove("op") {
            Some(Json::String(s)) => s,
            Some(_) => return Err("`op` must be a string".to_string()),
            None => return Err("a step is missing its required `op` field".to_string()),
        };
        let result = match map.remove("result") {
            Some(Json::String(s)) => Some(s),
            Some(_) => return Err("`result` must be a string".to_string()),
            None => None,
        };
        Ok(Step {
            op,
            result,
            fields: map,
        })
    }
}
