//! Shared plumbing the built-in atoms lean on: parsing a `steps` field back
//! into `Step`s, resolving a `vars` map through the Value Resolver and
//! evaluating a `condition` expression against it, and resolving a raw
//! field through the Value Resolver.

use crate::ast::Step;
use crate::context::RuntimeContext;
use crate::error::VmError;
use crate::expr;
use crate::resolver;
use crate::value::Value;
use serde_json::Value as Json;
use std::collections::HashMap;

/// Pulls a named field holding an array of step objects (`steps`, `then`,
/// `else`, `body`, `catch`) and parses each into a `Step`. Missing fields
/// parse to an empty body rather than an error — an absent `else`/`catch`
/// branch is simply a no-op (spec §4.4 `if`/`try`).
pub fn steps_field(step: &Step, name: &str) -> Result<Vec<Step>, VmError> {
    match step.field(name) {
        None => Ok(Vec::new()),
        Some(Json::Array(items)) => items
            .iter()
            .cloned()
            .map(|item| Step::try_from(item).map_err(|e| VmError::validation(&step.op, e)))
            .collect(),
        Some(_) => Err(VmError::validation(
            &step.op,
            format!("`{name}` must be an array of steps"),
        )),
    }
}

/// Resolves every entry of `step.field(name)` (an object) through the
/// Value Resolver (spec §4.1). A missing `vars` field resolves to an empty
/// map. This is the pipeline spec §4.5 requires of `if`/`while` (`vars`),
/// `math.calc` (`vars`), and `template` (`vars`): every variable an
/// expression or template references is resolved against `args`/`state`
/// before the expression evaluator or interpolation ever sees it.
pub fn resolve_vars_field(step: &Step, name: &str, ctx: &RuntimeContext) -> HashMap<String, Value> {
    let mut vars = HashMap::new();
    if let Some(Json::Object(map)) = step.field(name) {
        for (key, raw) in map {
            vars.insert(key.clone(), resolver::resolve_json(raw, &ctx.args, &ctx.scope));
        }
    }
    vars
}

/// `resolve_vars_field`, coerced to the numeric `vars` map the expression
/// evaluator wants: a missing or non-numeric resolved value becomes `0`
/// (spec §4.2 "Semantics").
pub fn numeric_vars(step: &Step, ctx: &RuntimeContext) -> HashMap<String, f64> {
    resolve_vars_field(step, "vars", ctx)
        .into_iter()
        .map(|(k, v)| (k, v.as_number().unwrap_or(0.0)))
        .collect()
}

/// Evaluates `step.field("condition")` against `step.field("vars")`,
/// resolved via the Value Resolver (spec §4.5 `if`/`while`: "resolve every
/// `vars` entry via Value Resolver; evaluate `condition` through the
/// Expression Evaluator").
pub fn eval_condition_field(step: &Step, ctx: &RuntimeContext) -> Result<bool, VmError> {
    let expr_src = string_field(step, "condition")?;
    let vars = numeric_vars(step, ctx);
    expr::eval(&expr_src, &vars).map(expr::is_truthy).map_err(VmError::Expr)
}

/// Evaluates `step.field("condition")` against identifiers bound directly
/// in `ctx.scope` (missing/non-numeric -> `0`), rather than through a
/// `vars` field. Used only by the supplemental `list.filter` atom, whose
/// per-item binding already lives in `ctx.scope` by the time the
/// condition runs (spec §4.5 doesn't name `list.filter` at all, so there
/// is no `vars` contract to honor here).
pub fn eval_condition_against_scope(step: &Step, ctx: &RuntimeContext) -> Result<bool, VmError> {
    let expr_src = string_field(step, "condition")?;
    let names = expr::identifiers(&expr_src).map_err(VmError::Expr)?;
    let mut vars: HashMap<String, f64> = HashMap::new();
    for name in names {
        if let Some(value) = ctx.scope.get(&name) {
            if let Some(n) = value.as_number() {
                vars.insert(name, n);
            }
        }
    }
    expr::eval(&expr_src, &vars).map(expr::is_truthy).map_err(VmError::Expr)
}

/// Resolves `step.field(name)` through the Value Resolver (spec §4.1).
/// Missing fields resolve to `Value::Null`.
pub fn resolve_field(step: &Step, name: &str, ctx: &RuntimeContext) -> Value {
    match step.field(name) {
        Some(raw) => resolver::resolve_json(raw, &ctx.args, &ctx.scope),
        None => Value::Null,
    }
}

/// Like `resolve_field`, but returns an error if the field is absent
/// (used by atoms for which the field is mandatory).
pub fn require_field(step: &Step, name: &str, ctx: &RuntimeContext) -> Result<Value, VmError> {
    if step.field(name).is_none() {
        return Err(VmError::validation(&step.op, format!("missing `{name}`")));
    }
    Ok(resolve_field(step, name, ctx))
}

/// String field read directly off the wire (not resolved) — used for
/// `path`/`name`/`key`-style fields that name something rather than hold a
/// value.
pub fn string_field(step: &Step, name: &str) -> Result<String, VmError> {
    match step.field(name) {
        Some(Json::String(s)) => Ok(s.clone()),
        _ => Err(VmError::validation(
            &step.op,
            format!("missing or non-string `{name}`"),
        )),
    }
}

pub fn optional_string_field(step: &Step, name: &str) -> Option<String> {
    match step.field(name) {
        Some(Json::String(s)) => Some(s.clone()),
        _ => None,
    }
}
