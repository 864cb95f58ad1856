//! State atoms (spec §4.4): reading and writing the current lexical scope.

use super::support::string_field;
use crate::atom::Atom;
use crate::ast::Step;
use crate::context::RuntimeContext;
use crate::error::VmError;
use crate::value::Value;

const DEFAULT_TIMEOUT_MS: u64 = 50;

pub fn atoms() -> Vec<Atom> {
    vec![
        Atom::new(
            "var.set",
            DEFAULT_TIMEOUT_MS,
            "binds `value` to `key` in the current scope, stored raw",
            var_set,
        ),
        Atom::new(
            "var.get",
            DEFAULT_TIMEOUT_MS,
            "resolves `key` against the current scope, or the literal key string if unbound",
            var_get,
        ),
    ]
}

/// `value` is stored as-is, never routed through the Value Resolver: spec
/// §4.5 is explicit that `var.set` "stores raw" and that the convention of
/// some values acting as references is enforced by producing atoms, not by
/// `var.set` itself.
fn var_set(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let key = string_field(step, "key")?;
    let value: Value = step.field("value").cloned().unwrap_or(serde_json::Value::Null).into();
    ctx.scope.set(key, value.clone());
    Ok(value)
}

/// `resolveValue(key, ctx)` (spec §4.5 `var.get`): the bound value if
/// `key` names one, else the literal key string itself.
fn var_get(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let key = string_field(step, "key")?;
    Ok(ctx.scope.get(&key).unwrap_or(Value::String(key)))
}
