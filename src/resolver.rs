//! The Value Resolver (spec §4.1).
//!
//! Converts an AST-embedded JSON value into a runtime `Value`:
//!
//! 1. A tagged argument reference (`{"$kind": "arg", "path": P}`) resolves
//!    against `ctx.args[P]`.
//! 2. A string beginning with `args.` resolves against `ctx.args[<suffix>]`.
//! 3. A string that names a binding in `ctx.state` (including via scope
//!    fallthrough) resolves to that binding.
//! 4. Otherwise the value passes through unchanged — literal passthrough,
//!    including the original string.
//!
//! This ordering is deliberate: plain string literals can act as variable
//! references by convention (spec §4.1 "Consequence"), which is why §8
//! calls out collision coverage between a literal string and a same-named
//! binding.

use crate::scope::Scope;
use crate::value::Value;
use serde_json::Value as Json;

pub fn resolve_json(raw: &Json, args: &Value, state: &Scope) -> Value {
    if let Some(path) = arg_ref_path(raw) {
        return lookup_arg(args, path);
    }
    if let Json::String(s) = raw {
        if let Some(suffix) = s.strip_prefix("args.") {
            return lookup_arg(args, suffix);
        }
        if let Some(v) = state.get(s) {
            return v;
        }
        return Value::String(s.clone());
    }
    Value::from(raw.clone())
}

/// Same resolution rules, operating directly on an already-converted
/// runtime `Value` (used when resolving values that originated from
/// `state`/intermediate computation rather than straight off the wire).
pub fn resolve_value(raw: &Value, args: &Value, state: &Scope) -> Value {
    if let Value::String(s) = raw {
        if let Some(suffix) = s.strip_prefix("args.") {
            return lookup_arg(args, suffix);
        }
        if let Some(v) = state.get(s) {
            return v;
        }
    }
    raw.clone()
}

fn arg_ref_path(raw: &Json) -> Option<&str> {
    let obj = raw.as_object()?;
    if obj.get("$kind").and_then(Json::as_str) != Some("arg") {
        return None;
    }
    obj.get("path").and_then(Json::as_str)
}

fn lookup_arg(args: &Value, path: &str) -> Value {
    match args.as_object().and_then(|m| m.get(path)) {
        Some(v) => v.clone(),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use im::HashMap as ImMap;

    fn args_with(pairs: &[(&str, Value)]) -> Value {
        let mut map = ImMap::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.clone());
        }
        Value::Object(map)
    }

    #[test]
    fn tagged_arg_ref_resolves_against_args() {
        let args = args_with(&[("url", Value::String("http://api.data".into()))]);
        let state = Scope::root();
        let raw = serde_json::json!({"$kind": "arg", "path": "url"});
        assert_eq!(
            resolve_json(&raw, &args, &state),
            Value::String("http://api.data".into())
        );
    }

    #[test]
    fn args_dot_shorthand_resolves_against_args() {
        let args = args_with(&[("key", Value::String("secret_id".into()))]);
        let state = Scope::root();
        let raw = serde_json::json!("args.key");
        assert_eq!(
            resolve_json(&raw, &args, &state),
            Value::String("secret_id".into())
        );
    }

    #[test]
    fn bound_name_resolves_to_state_value() {
        let args = Value::Object(ImMap::new());
        let state = Scope::root();
        state.set("cached", Value::Number(42.0));
        let raw = serde_json::json!("cached");
        assert_eq!(resolve_json(&raw, &args, &state), Value::Number(42.0));
    }

    #[test]
    fn unbound_string_is_literal_passthrough() {
        let args = Value::Object(ImMap::new());
        let state = Scope::root();
        let raw = serde_json::json!("cached");
        assert_eq!(resolve_json(&raw, &args, &state), Value::String("cached".into()));
    }

    #[test]
    fn literal_number_passes_through_unchanged() {
        let args = Value::Object(ImMap::new());
        let state = Scope::root();
        let raw = serde_json::json!(3.5);
        assert_eq!(resolve_json(&raw, &args, &state), Value::Number(3.5));
    }
}
