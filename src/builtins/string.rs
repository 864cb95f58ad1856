//! String atoms (spec §4.4): `split`, `join`, `template`.

use super::support::{resolve_field, resolve_vars_field, string_field};
use crate::atom::Atom;
use crate::ast::Step;
use crate::context::RuntimeContext;
use crate::error::VmError;
use crate::value::Value;

const DEFAULT_TIMEOUT_MS: u64 = 50;

pub fn atoms() -> Vec<Atom> {
    vec![
        Atom::new("string.split", DEFAULT_TIMEOUT_MS, "splits `value` on `separator`", split),
        Atom::new("string.join", DEFAULT_TIMEOUT_MS, "joins `items` with `separator`", join),
        Atom::new(
            "string.template",
            DEFAULT_TIMEOUT_MS,
            "interpolates `{{name}}` placeholders in `tmpl` against `vars`, resolved via the Value Resolver",
            template,
        ),
    ]
}

fn split(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let value = resolve_field(step, "value", ctx).stringify();
    let separator = resolve_field(step, "separator", ctx).stringify();
    let parts = if separator.is_empty() {
        value.chars().map(|c| Value::String(c.to_string())).collect()
    } else {
        value.split(separator.as_str()).map(|s| Value::String(s.to_string())).collect()
    };
    Ok(Value::List(parts))
}

fn join(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let items = resolve_field(step, "items", ctx);
    let separator = resolve_field(step, "separator", ctx).stringify();
    let joined = items
        .as_list()
        .unwrap_or(&[])
        .iter()
        .map(Value::stringify)
        .collect::<Vec<_>>()
        .join(&separator);
    Ok(Value::String(joined))
}

/// Undefined/missing bindings interpolate to `""` (spec §4.5 `undefined ->
/// ""`), the same rule `Value::stringify` already applies to `Null`. Each
/// placeholder is looked up in `vars`, resolved through the Value Resolver
/// (spec §4.5 `template {tmpl, vars}`) rather than directly against scope.
fn template(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let tmpl = string_field(step, "tmpl")?;
    let vars = resolve_vars_field(step, "vars", ctx);
    let mut out = String::with_capacity(tmpl.len());
    let mut rest = tmpl.as_str();
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let name = after[..end].trim();
        let value = vars.get(name).cloned().unwrap_or(Value::Null);
        out.push_str(&value.stringify());
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(Value::String(out))
}
