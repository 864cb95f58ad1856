//! The Atom Executor (spec §4.4).
//!
//! For every step: strip `op`/`result` to get the atom's raw input data,
//! validate it against the atom's declared input schema (if any), run the
//! atom's `exec` under its `timeoutMs` budget, and — if the step names a
//! `result` binding — write the returned value into the current scope.
//!
//! `timeoutMs == 0` means unbounded (every flow atom; spec §5), so the
//! common case never touches a thread. A nonzero timeout races `exec` on a
//! worker thread against a `recv_timeout` deadline — the spec's "first
//! completion wins" (§5) read literally: the loser is abandoned, not
//! joined, matching "a timed-out atom's in-flight work may continue
//! running in the background, unobserved."

use crate::atom::Atom;
use crate::ast::Step;
use crate::context::RuntimeContext;
use crate::error::VmError;
use crate::value::Value;
use std::sync::mpsc;
use std::time::Duration;

pub fn execute(atom: &Atom, step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let input: Value = step.input_data().into();
    atom.validate(&input)?;

    let timeout_ms = atom.timeout_ms;
    tracing::trace!(op = %step.op, timeout_ms, "dispatching atom");

    let result = if timeout_ms == 0 {
        (atom.exec)(step, ctx)
    } else {
        run_with_timeout(atom, step, ctx, timeout_ms)
    };

    let result = result.inspect_err(|err| {
        tracing::warn!(op = %step.op, %err, "atom failed");
    })?;

    if let Some(name) = &step.result {
        ctx.scope.set(name.clone(), result.clone());
    }
    Ok(result)
}

fn run_with_timeout(
    atom: &Atom,
    step: &Step,
    ctx: &mut RuntimeContext,
    timeout_ms: u64,
) -> Result<Value, VmError> {
    let (tx, rx) = mpsc::channel();
    let exec = atom.exec.clone();
    let step = step.clone();
    let mut worker_ctx = ctx.clone();

    std::thread::spawn(move || {
        let outcome = exec(&step, &mut worker_ctx);
        // The receiver may already be gone if we timed out; that's fine,
        // the result is simply dropped (spec §5: abandoned, not cancelled).
        let _ = tx.send(outcome);
    });

    match rx.recv_timeout(Duration::from_millis(timeout_ms)) {
        Ok(outcome) => outcome,
        Err(mpsc::RecvTimeoutError::Timeout | mpsc::RecvTimeoutError::Disconnected) => {
            Err(VmError::timeout(atom.op.clone(), timeout_ms))
        }
    }
}
