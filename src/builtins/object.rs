//! Object atoms (spec §4.4 core: `pick`/`merge`/`keys`; supplemental `set`
//! fills out the category, the way `list.get`/`list.filter` do for lists).

use super::support::{resolve_field, string_field};
use crate::atom::Atom;
use crate::ast::Step;
use crate::context::RuntimeContext;
use crate::error::VmError;
use crate::value::Value;
use im::HashMap;

const DEFAULT_TIMEOUT_MS: u64 = 50;

pub fn atoms() -> Vec<Atom> {
    vec![
        Atom::new("object.pick", DEFAULT_TIMEOUT_MS, "projects `object` onto `keys`", pick),
        Atom::new("object.merge", DEFAULT_TIMEOUT_MS, "merges `b` onto `a`, `b` winning on conflict", merge),
        Atom::new("object.keys", DEFAULT_TIMEOUT_MS, "the property names of `object`", keys),
        Atom::new("object.set", DEFAULT_TIMEOUT_MS, "returns `object` with `key` bound to `value`", set),
    ]
}

fn object_of(step: &Step, field: &str, ctx: &RuntimeContext) -> HashMap<String, Value> {
    resolve_field(step, field, ctx).as_object().cloned().unwrap_or_default()
}

fn pick(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let object = object_of(step, "object", ctx);
    let keys = resolve_field(step, "keys", ctx);
    let mut projected = HashMap::new();
    for key in keys.as_list().unwrap_or(&[]) {
        if let Some(name) = key.as_str() {
            if let Some(v) = object.get(name) {
                projected.insert(name.to_string(), v.clone());
            }
        }
    }
    Ok(Value::Object(projected))
}

fn merge(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let mut a = object_of(step, "a", ctx);
    let b = object_of(step, "b", ctx);
    for (k, v) in b {
        a.insert(k, v);
    }
    Ok(Value::Object(a))
}

fn keys(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let object = object_of(step, "object", ctx);
    Ok(Value::List(object.keys().cloned().map(Value::String).collect()))
}

fn set(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let mut object = object_of(step, "object", ctx);
    let key = string_field(step, "key")?;
    let value = resolve_field(step, "value", ctx);
    object.insert(key, value);
    Ok(Value::Object(object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::AtomRegistry;
    use crate::capability::Capabilities;
    use serde_json::json;
    use std::sync::Arc;

    fn ctx() -> RuntimeContext {
        RuntimeContext::new(
            Value::Null,
            Arc::new(Capabilities::new()),
            Arc::new(AtomRegistry::new()),
            1000,
            8,
        )
    }

    #[test]
    fn pick_projects_only_requested_keys() {
        let mut c = ctx();
        let s = Step::try_from(json!({
            "op": "object.pick",
            "object": {"a": 1, "b": 2, "c": 3},
            "keys": ["a", "c"]
        }))
        .unwrap();
        let result = pick(&s, &mut c).unwrap();
        let obj = result.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(obj.get("c"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn merge_lets_b_win_on_conflict() {
        let mut c = ctx();
        let s = Step::try_from(json!({
            "op": "object.merge",
            "a": {"x": 1},
            "b": {"x": 2, "y": 3}
        }))
        .unwrap();
        let obj = merge(&s, &mut c).unwrap();
        assert_eq!(obj.as_object().unwrap().get("x"), Some(&Value::Number(2.0)));
        assert_eq!(obj.as_object().unwrap().get("y"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn keys_lists_property_names() {
        let mut c = ctx();
        let s = Step::try_from(json!({"op": "object.keys", "object": {"a": 1, "b": 2}})).unwrap();
        let mut names: Vec<String> = keys(&s, &mut c)
            .unwrap()
            .as_list()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
