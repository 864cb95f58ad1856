//! Flow control atoms (spec §4.4): `seq`, `if`, `while`, `return`, `try`,
//! `scope`. All use `timeoutMs = 0` — unbounded — per spec §5, since they
//! dispatch their own children rather than doing bounded work themselves.

use super::support::{eval_condition_field, steps_field};
use crate::atom::Atom;
use crate::ast::Step;
use crate::context::RuntimeContext;
use crate::error::VmError;
use crate::schema::{ObjectSchema, Schema};
use crate::value::Value;
use serde_json::Value as Json;

pub fn atoms() -> Vec<Atom> {
    vec![
        Atom::new("seq", 0, "runs its `steps` in order, spending one unit of fuel per step", seq),
        Atom::new("if", 0, "resolves `vars` and runs `then` or `else` depending on `condition`", if_atom),
        Atom::new("while", 0, "resolves `vars` and runs `body` repeatedly while `condition` is truthy", while_atom),
        Atom::new("return", 0, "builds an object from `schema`'s properties, reading each from state", return_atom),
        Atom::new("try", 0, "runs `body`, falling back to `catch` on a non-fatal error", try_atom),
        Atom::new("scope", 0, "runs `body` in a fresh child lexical scope", scope_atom),
    ]
}

fn seq(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let children = steps_field(step, "steps")?;
    let mut last = Value::Null;
    for child in &children {
        if ctx.has_output() {
            break;
        }
        ctx.spend_fuel()?;
        last = ctx.dispatch(child)?;
    }
    Ok(last)
}

fn if_atom(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let branch = if eval_condition_field(step, ctx)? {
        "then"
    } else {
        "else"
    };
    let children = steps_field(step, branch)?;
    let mut last = Value::Null;
    for child in &children {
        if ctx.has_output() {
            break;
        }
        last = ctx.dispatch(child)?;
    }
    Ok(last)
}

fn while_atom(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let body = steps_field(step, "body")?;
    let mut last = Value::Null;
    while eval_condition_field(step, ctx)? {
        if ctx.has_output() {
            break;
        }
        for child in &body {
            if ctx.has_output() {
                break;
            }
            last = ctx.dispatch(child)?;
        }
    }
    Ok(last)
}

/// Builds the run's output object from `schema`'s declared properties,
/// each read straight from `ctx.state` (spec §4.4 `return`: "build an
/// object whose keys are the properties declared by `schema`... Never
/// validates `schema`."). `schema` is either a flat array of property
/// names or an object carrying a `properties` array/object, matching the
/// way other atoms (e.g. `object.pick`'s `keys`) name a set of fields.
fn return_atom(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let schema = ObjectSchema::from_property_names(schema_property_names(step.field("schema")));
    let mut object = im::HashMap::new();
    for name in schema.properties() {
        let value = ctx.scope.get(&name).unwrap_or(Value::Null);
        object.insert(name, value);
    }
    let value = Value::Object(object);
    ctx.set_output(value.clone());
    Ok(value)
}

fn schema_property_names(raw: Option<&Json>) -> Vec<String> {
    fn strings(items: &[Json]) -> Vec<String> {
        items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect()
    }
    match raw {
        None => Vec::new(),
        Some(Json::Array(items)) => strings(items),
        Some(Json::Object(map)) => match map.get("properties") {
            Some(Json::Array(items)) => strings(items),
            Some(Json::Object(props)) => props.keys().cloned().collect(),
            _ => Vec::new(),
        },
        Some(_) => Vec::new(),
    }
}

fn try_atom(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let body = steps_field(step, "body")?;
    let mut last = Value::Null;
    let mut failed = None;
    for child in &body {
        if ctx.has_output() {
            break;
        }
        match ctx.dispatch(child) {
            Ok(v) => last = v,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                failed = Some(e);
                break;
            }
        }
    }
    if let Some(err) = failed {
        ctx.clear_output();
        ctx.scope.set("error", Value::String(err.to_string()));
        let catch = steps_field(step, "catch")?;
        for child in &catch {
            if ctx.has_output() {
                break;
            }
            last = ctx.dispatch(child)?;
        }
    }
    Ok(last)
}

fn scope_atom(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let body = steps_field(step, "body")?;
    let mut inner = ctx.child_scope();
    let mut last = Value::Null;
    for child in &body {
        if inner.has_output() {
            break;
        }
        last = inner.dispatch(child)?;
    }
    Ok(last)
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
            Arc::new(AtomRegistry::with_builtins(std::iter::empty())),
            1000,
            8,
        )
    }

    fn step_from(json: serde_json::Value) -> Step {
        Step::try_from(json).unwrap()
    }

    #[test]
    fn seq_runs_steps_in_order_and_spends_fuel() {
        let mut c = ctx();
        let s = step_from(json!({
            "op": "seq",
            "steps": [
                {"op": "var.set", "key": "x", "value": 1},
                {"op": "var.set", "key": "x", "value": 2}
            ]
        }));
        seq(&s, &mut c).unwrap();
        assert_eq!(c.scope.get("x"), Some(Value::Number(2.0)));
        assert_eq!(c.fuel_used(), 2);
    }

    #[test]
    fn if_picks_then_when_condition_is_truthy() {
        let mut c = ctx();
        c.args = Value::Object(im::hashmap! { "flag".to_string() => Value::Number(1.0) });
        let s = step_from(json!({
            "op": "if",
            "condition": "flag",
            "vars": {"flag": "args.flag"},
            "then": [{"op": "var.set", "key": "x", "value": "then"}],
            "else": [{"op": "var.set", "key": "x", "value": "else"}]
        }));
        if_atom(&s, &mut c).unwrap();
        assert_eq!(c.scope.get("x"), Some(Value::String("then".into())));
    }

    #[test]
    fn return_builds_an_object_from_the_schemas_property_names() {
        let mut c = ctx();
        c.scope.set("x", Value::Number(9.0));
        let s = step_from(json!({"op": "return", "schema": ["x", "y"]}));
        let result = return_atom(&s, &mut c).unwrap();
        let obj = result.as_object().unwrap();
        assert_eq!(obj.get("x"), Some(&Value::Number(9.0)));
        assert_eq!(obj.get("y"), Some(&Value::Null));
        assert_eq!(c.output(), Some(result));
    }

    #[test]
    fn return_sets_output_and_seq_stops_after_it() {
        let mut c = ctx();
        let s = step_from(json!({
            "op": "seq",
            "steps": [
                {"op": "var.set", "key": "x", "value": 9},
                {"op": "return", "schema": ["x"]},
                {"op": "var.set", "key": "never", "value": 1}
            ]
        }));
        seq(&s, &mut c).unwrap();
        let obj = c.output().unwrap();
        assert_eq!(obj.as_object().unwrap().get("x"), Some(&Value::Number(9.0)));
        assert_eq!(c.scope.get("never"), None);
    }

    #[test]
    fn try_runs_catch_on_non_fatal_error_and_suppresses_it() {
        let mut c = ctx();
        let s = step_from(json!({
            "op": "try",
            "body": [{"op": "nonexistent.op"}],
            "catch": [{"op": "var.set", "key": "recovered", "value": true}]
        }));
        try_atom(&s, &mut c).unwrap();
        assert_eq!(c.scope.get("recovered"), Some(Value::Bool(true)));
    }

    #[test]
    fn scope_writes_do_not_leak_to_the_parent() {
        let mut c = ctx();
        let s = step_from(json!({
            "op": "scope",
            "body": [{"op": "var.set", "key": "inner", "value": 1}]
        }));
        scope_atom(&s, &mut c).unwrap();
        assert_eq!(c.scope.get("inner"), None);
    }
}
