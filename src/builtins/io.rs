//! HTTP capability atom (spec §6): `http.fetch` delegates to the host's
//! `Fetch` capability, failing with `MissingCapability` if the host didn't
//! wire one in (spec §3).

use super::support::{resolve_field, string_field};
use crate::atom::Atom;
use crate::ast::Step;
use crate::capability::FetchOptions;
use crate::context::RuntimeContext;
use crate::error::VmError;
use crate::value::Value;

const DEFAULT_TIMEOUT_MS: u64 = 5000;

pub fn atoms() -> Vec<Atom> {
    vec![Atom::new(
        "http.fetch",
        DEFAULT_TIMEOUT_MS,
        "performs an HTTP request via the host's `Fetch` capability",
        fetch,
    )]
}

fn fetch(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let url = string_field(step, "url")?;
    let options = FetchOptions {
        method: super::support::optional_string_field(step, "method"),
        headers: step.field("headers").map(|_| resolve_field(step, "headers", ctx)),
        body: step.field("body").map(|_| resolve_field(step, "body", ctx)),
    };
    ctx.capabilities.require_fetch(&step.op)?.fetch(&url, options)
}
