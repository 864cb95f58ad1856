//! Math atom (spec §4.4): `math.calc` resolves `vars` through the Value
//! Resolver and evaluates `expr` against them via the expression evaluator
//! (spec §4.2, §4.5 "`math.calc` {expr, vars}: resolve each var via the
//! Value Resolver, evaluate `expr`, return a number").

use super::support::{numeric_vars, string_field};
use crate::atom::Atom;
use crate::ast::Step;
use crate::context::RuntimeContext;
use crate::error::VmError;
use crate::expr;
use crate::value::Value;

const DEFAULT_TIMEOUT_MS: u64 = 20;

pub fn atoms() -> Vec<Atom> {
    vec![Atom::new(
        "math.calc",
        DEFAULT_TIMEOUT_MS,
        "resolves `vars` and evaluates `expr` as an arithmetic/relational expression",
        calc,
    )]
}

fn calc(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let expr_src = string_field(step, "expr")?;
    let vars = numeric_vars(step, ctx);
    expr::eval(&expr_src, &vars).map(Value::Number).map_err(VmError::Expr)
}
