//! List atoms (spec §4.4 core: `map`/`push`/`len`; supplemental `filter`/
//! `get` fill out the category the way `object.set` fills out `object`,
//! since the distilled spec names examples rather than an exhaustive set).

use super::support::{eval_condition_against_scope, resolve_field, steps_field, string_field};
use crate::atom::Atom;
use crate::ast::Step;
use crate::context::RuntimeContext;
use crate::error::VmError;
use crate::value::Value;

const DEFAULT_TIMEOUT_MS: u64 = 50;

pub fn atoms() -> Vec<Atom> {
    vec![
        Atom::new(
            "list.map",
            0,
            "runs `steps` once per item in `list`, binding each to `as`, collecting each run's `result` binding",
            map,
        ),
        Atom::new("list.push", DEFAULT_TIMEOUT_MS, "appends `item` to `list`", push),
        Atom::new("list.len", DEFAULT_TIMEOUT_MS, "the length of `list`, or of a string", len),
        Atom::new(
            "list.filter",
            0,
            "keeps items from `list` for which `condition` is truthy",
            filter,
        ),
        Atom::new("list.get", DEFAULT_TIMEOUT_MS, "the element of `list` at `index`", get),
    ]
}

fn list_of(step: &Step, ctx: &RuntimeContext) -> Vec<Value> {
    resolve_field(step, "list", ctx)
        .as_list()
        .map(<[Value]>::to_vec)
        .unwrap_or_default()
}

/// Runs `steps` once per item of `list`, binding each item to `as` in a
/// fresh child scope and collecting `scope.state.result` (or `null` if
/// unset) into the output list, per spec §4.5 `list.map`.
fn map(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let items = list_of(step, ctx);
    let binding = string_field(step, "as")?;
    let body = steps_field(step, "steps")?;
    let mut mapped = Vec::with_capacity(items.len());
    for item in items {
        if ctx.has_output() {
            break;
        }
        let mut inner = ctx.child_scope();
        inner.scope.set(binding.clone(), item);
        for child in &body {
            if inner.has_output() {
                break;
            }
            inner.dispatch(child)?;
        }
        mapped.push(inner.scope.get("result").unwrap_or(Value::Null));
    }
    Ok(Value::List(mapped))
}

fn push(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let mut items = list_of(step, ctx);
    items.push(resolve_field(step, "item", ctx));
    Ok(Value::List(items))
}

/// Length of a sequence or string; `0` for anything else (spec §4.5
/// `list.len`).
fn len(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let value = resolve_field(step, "list", ctx);
    let length = match &value {
        Value::List(items) => items.len(),
        Value::String(s) => s.chars().count(),
        _ => 0,
    };
    Ok(Value::Number(length as f64))
}

fn filter(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let items = list_of(step, ctx);
    let binding = string_field(step, "as")?;
    let mut kept = Vec::new();
    for item in items {
        let mut inner = ctx.child_scope();
        inner.scope.set(binding.clone(), item.clone());
        if eval_condition_against_scope(step, &inner)? {
            kept.push(item);
        }
    }
    Ok(Value::List(kept))
}

fn get(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let items = list_of(step, ctx);
    let index = resolve_field(step, "index", ctx).as_number().unwrap_or(-1.0);
    if index < 0.0 {
        return Ok(Value::Null);
    }
    Ok(items.get(index as usize).cloned().unwrap_or(Value::Null))
}
