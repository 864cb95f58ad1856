//! The per-run execution context threaded through atom dispatch (spec §3,
//! §4.4).
//!
//! `RuntimeContext` bundles everything an atom's `exec` needs: the
//! remaining fuel, the run's immutable `args`, the current lexical
//! `Scope`, the capability bag, the atom registry (so flow atoms like
//! `seq`/`if` can recursively dispatch their children), and the terminal
//! `output` slot a `return` statement fills in to unwind the run (spec
//! §4.5).
//!
//! Cloning a `RuntimeContext` is cheap — every field is either an `Arc`, a
//! `Scope` handle (itself `Arc`-backed), or plain data — which is what lets
//! the executor clone one into a worker thread to race a timed atom's
//! `exec` against a timer (see `executor`).

use crate::atom::AtomRegistry;
use crate::ast::Step;
use crate::capability::Capabilities;
use crate::error::VmError;
use crate::scope::Scope;
use crate::value::Value;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct RuntimeContext {
    fuel: Arc<AtomicI64>,
    fuel_spent: Arc<AtomicU64>,
    pub args: Value,
    pub scope: Scope,
    pub capabilities: Arc<Capabilities>,
    pub registry: Arc<AtomRegistry>,
    output: Arc<Mutex<Option<Value>>>,
    max_depth: usize,
    depth: usize,
}

impl RuntimeContext {
    pub fn new(
        args: Value,
        capabilities: Arc<Capabilities>,
        registry: Arc<AtomRegistry>,
        fuel_budget: u64,
        max_depth: usize,
    ) -> Self {
        RuntimeContext {
            fuel: Arc::new(AtomicI64::new(fuel_budget as i64)),
            fuel_spent: Arc::new(AtomicU64::new(0)),
            args,
            scope: Scope::root(),
            capabilities,
            registry,
            output: Arc::new(Mutex::new(None)),
            max_depth,
            depth: 0,
        }
    }

    /// A child context for entering a nested lexical scope (`scope`, loop
    /// and branch bodies, `try` blocks). Shares fuel and output with the
    /// parent; only the scope chain grows.
    pub fn child_scope(&self) -> Self {
        RuntimeContext {
            scope: self.scope.child(),
            depth: self.depth,
            ..self.clone()
        }
    }

    /// A fresh context for a recursive `agent.run` invocation: its own
    /// fuel budget and root scope, sharing nothing with the caller (spec
    /// §9, design note "agent.run recursion").
    pub fn fresh_run(&self, args: Value, fuel_budget: u64) -> Self {
        RuntimeContext {
            fuel: Arc::new(AtomicI64::new(fuel_budget as i64)),
            fuel_spent: Arc::new(AtomicU64::new(0)),
            args,
            scope: Scope::root(),
            capabilities: Arc::clone(&self.capabilities),
            registry: Arc::clone(&self.registry),
            output: Arc::new(Mutex::new(None)),
            max_depth: self.max_depth,
            depth: self.depth + 1,
        }
    }

    pub fn check_depth(&self) -> Result<(), VmError> {
        if self.depth >= self.max_depth {
            return Err(VmError::Validation {
                op: "agent.run".to_string(),
                payload: format!("max recursion depth {} exceeded", self.max_depth),
            });
        }
        Ok(())
    }

    /// Spends one unit of fuel. Called once per step `seq` dispatches
    /// (spec §3: "fuel is decremented once per step dispatched by `seq`"),
    /// never by nested flow atoms dispatching their own children directly.
    pub fn spend_fuel(&self) -> Result<(), VmError> {
        let remaining = self.fuel.fetch_sub(1, Ordering::SeqCst) - 1;
        let spent = self.fuel_spent.fetch_add(1, Ordering::SeqCst) + 1;
        if remaining < 0 {
            return Err(VmError::OutOfFuel { step: spent });
        }
        Ok(())
    }

    pub fn fuel_used(&self) -> u64 {
        self.fuel_spent.load(Ordering::SeqCst)
    }

    /// Sets the run's terminal output. Once set, flow atoms unwind without
    /// running further steps (spec §4.5 "`return`/`output` signal unwind").
    pub fn set_output(&self, value: Value) {
        *self.output.lock().unwrap() = Some(value);
    }

    pub fn output(&self) -> Option<Value> {
        self.output.lock().unwrap().clone()
    }

    pub fn has_output(&self) -> bool {
        self.output.lock().unwrap().is_some()
    }

    /// Clears any output set inside a `try` body before running `catch`,
    /// so a `return` inside the failing body doesn't leak past the
    /// recovery step (spec §4.4 `try`).
    pub fn clear_output(&self) {
        *self.output.lock().unwrap() = None;
    }

    /// Dispatches one step: looks the atom up in the registry and hands
    /// off to the executor. `UnknownAtom` if `step.op` isn't registered.
    pub fn dispatch(&mut self, step: &Step) -> Result<Value, VmError> {
        let atom = self
            .registry
            .get(&step.op)
            .cloned()
            .ok_or_else(|| VmError::unknown_atom(step.op.clone()))?;
        crate::executor::execute(&atom, step, self)
    }
}
