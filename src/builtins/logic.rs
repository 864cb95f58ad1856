//! Logic atoms (spec §4.4): equality, ordering, and boolean combinators
//! over resolved `Value`s. Distinct from `expr`'s numeric relational
//! operators — these compare whole `Value`s (including strings, lists, and
//! objects), falling back to `Value::is_truthy` for `and`/`or`/`not`.

use super::support::resolve_field;
use crate::atom::Atom;
use crate::ast::Step;
use crate::context::RuntimeContext;
use crate::error::VmError;
use crate::value::Value;

const DEFAULT_TIMEOUT_MS: u64 = 20;

pub fn atoms() -> Vec<Atom> {
    vec![
        Atom::new("eq", DEFAULT_TIMEOUT_MS, "true if `a` equals `b`", eq),
        Atom::new("neq", DEFAULT_TIMEOUT_MS, "true if `a` does not equal `b`", neq),
        Atom::new("gt", DEFAULT_TIMEOUT_MS, "true if numeric `a` is greater than `b`", gt),
        Atom::new("lt", DEFAULT_TIMEOUT_MS, "true if numeric `a` is less than `b`", lt),
        Atom::new("and", DEFAULT_TIMEOUT_MS, "true if both `a` and `b` are truthy", and),
        Atom::new("or", DEFAULT_TIMEOUT_MS, "true if either `a` or `b` is truthy", or),
        Atom::new("not", DEFAULT_TIMEOUT_MS, "the negation of `a`'s truthiness", not),
    ]
}

fn pair(step: &Step, ctx: &RuntimeContext) -> (Value, Value) {
    (resolve_field(step, "a", ctx), resolve_field(step, "b", ctx))
}

fn eq(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let (a, b) = pair(step, ctx);
    Ok(Value::Bool(a == b))
}

fn neq(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let (a, b) = pair(step, ctx);
    Ok(Value::Bool(a != b))
}

/// The host's total order on numbers and strings (spec §4.5 `gt`/`lt`):
/// two numbers compare numerically, anything else compares lexicographically
/// on its string form.
fn total_order(a: &Value, b: &Value) -> std::cmp::Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        _ => a.stringify().cmp(&b.stringify()),
    }
}

fn gt(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let (a, b) = pair(step, ctx);
    Ok(Value::Bool(total_order(&a, &b) == std::cmp::Ordering::Greater))
}

fn lt(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let (a, b) = pair(step, ctx);
    Ok(Value::Bool(total_order(&a, &b) == std::cmp::Ordering::Less))
}

fn and(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let (a, b) = pair(step, ctx);
    Ok(Value::Bool(a.is_truthy() && b.is_truthy()))
}

fn or(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let (a, b) = pair(step, ctx);
    Ok(Value::Bool(a.is_truthy() || b.is_truthy()))
}

fn not(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let a = resolve_field(step, "a", ctx);
    Ok(Value::Bool(!a.is_truthy()))
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
    fn eq_compares_whole_values() {
        let mut c = ctx();
        let s = Step::try_from(json!({"op": "eq", "a": "x", "b": "x"})).unwrap();
        assert_eq!(eq(&s, &mut c).unwrap(), Value::Bool(true));
    }

    #[test]
    fn gt_compares_numerically() {
        let mut c = ctx();
        let s = Step::try_from(json!({"op": "gt", "a": 3, "b": 1})).unwrap();
        assert_eq!(gt(&s, &mut c).unwrap(), Value::Bool(true));
    }

    #[test]
    fn lt_compares_strings_lexicographically() {
        let mut c = ctx();
        let s = Step::try_from(json!({"op": "lt", "a": "apple", "b": "banana"})).unwrap();
        assert_eq!(lt(&s, &mut c).unwrap(), Value::Bool(true));
        let s = Step::try_from(json!({"op": "lt", "a": "banana", "b": "apple"})).unwrap();
        assert_eq!(lt(&s, &mut c).unwrap(), Value::Bool(false));
    }

    #[test]
    fn not_negates_truthiness() {
        let mut c = ctx();
        let s = Step::try_from(json!({"op": "not", "a": ""})).unwrap();
        assert_eq!(not(&s, &mut c).unwrap(), Value::Bool(true));
    }
}
