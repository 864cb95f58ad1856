//! The VM entry point (spec §2, §3): parses and runs a `seq`-rooted agent
//! program against a fuel budget and a set of capabilities.

use crate::atom::{Atom, AtomRegistry};
use crate::ast::Step;
use crate::capability::Capabilities;
use crate::context::RuntimeContext;
use crate::error::VmError;
use crate::value::Value;
use serde_json::Value as Json;
use std::sync::Arc;

/// The fuel budget, capability set, and recursion limit for one `Vm::run`
/// call. `Default` matches the teacher's convention of a sane starting
/// point a host can selectively override rather than a config struct every
/// field of which must be supplied (see `Default for VmOptions` below).
pub struct VmOptions {
    pub fuel: u64,
    pub capabilities: Capabilities,
    pub max_depth: usize,
}

impl Default for VmOptions {
    fn default() -> Self {
        VmOptions {
            fuel: 10_000,
            capabilities: Capabilities::new(),
            max_depth: 32,
        }
    }
}

/// What a run produced and how much fuel it spent — resolves the "is
/// `fuelUsed` part of the public return value" open question (spec §9):
/// yes, a host inspecting cost needs it, and bundling it with `output`
/// avoids a second side channel.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub output: Option<Value>,
    pub fuel_used: u64,
}

pub struct Vm {
    registry: Arc<AtomRegistry>,
}

impl Vm {
    /// Builds a VM whose atom registry is the built-in library overlaid
    /// with `custom_atoms` (spec §4.6 "Resolver override" — a custom atom
    /// with the same `op` as a built-in wins).
    pub fn new(custom_atoms: impl IntoIterator<Item = Atom>) -> Self {
        Vm {
            registry: Arc::new(AtomRegistry::with_builtins(custom_atoms)),
        }
    }

    pub fn run(&self, ast: Json, args: Value, options: VmOptions) -> Result<RunOutcome, VmError> {
        let root = Step::try_from(ast).map_err(|e| VmError::validation("root", e))?;
        if root.op != "seq" {
            return Err(VmError::BadRoot { found: root.op });
        }

        let fuel_budget = options.fuel;
        let mut ctx = RuntimeContext::new(
            args,
            Arc::new(options.capabilities),
            Arc::clone(&self.registry),
            fuel_budget,
            options.max_depth,
        );

        tracing::info!(fuel = fuel_budget, "starting run");
        ctx.dispatch(&root)?;
        let output = ctx.output();
        let fuel_used = ctx.fuel_used();
        tracing::info!(fuel_used, "run finished");
        Ok(RunOutcome { output, fuel_used })
    }
}
