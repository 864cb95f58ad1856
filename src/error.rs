//! The VM's error surface (spec §7).
//!
//! A single enum, one variant per error kind, each `Display`-prefixed with
//! the kind name so callers can pattern-match on the message the way spec §6
//! describes ("a single human-readable message whose prefix identifies the
//! kind"). `try`/`catch` only catches the non-fatal kinds; `OutOfFuel` and
//! `BadRoot` are marked `is_fatal` and propagate through `try` regardless
//! (spec §7 "Propagation").

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum VmError {
    #[error("ValidationError: `{op}` rejected its input: {payload}")]
    Validation { op: String, payload: String },

    #[error("TimeoutError: `{op}` exceeded its timeout of {timeout_ms}ms")]
    Timeout { op: String, timeout_ms: u64 },

    #[error("OutOfFuel: budget exhausted before step {step} could run")]
    OutOfFuel { step: u64 },

    #[error("UnknownAtom: no atom registered for op `{op}`")]
    UnknownAtom { op: String },

    #[error("MissingCapability: `{op}` requires capability `{capability}`, which the host did not provide")]
    MissingCapability { op: String, capability: String },

    #[error("BadRoot: root AST node must be `seq`, found `{found}`")]
    BadRoot { found: String },

    #[error("ExprError: {0}")]
    Expr(String),
}

impl VmError {
    /// Fatal errors propagate through `try`/`catch` regardless of whether a
    /// `catch` block is present (spec §7).
    pub fn is_fatal(&self) -> bool {
        matches!(self, VmError::OutOfFuel { .. } | VmError::BadRoot { .. })
    }

    pub fn validation(op: impl Into<String>, payload: impl Into<String>) -> Self {
        VmError::Validation {
            op: op.into(),
            payload: payload.into(),
        }
    }

    pub fn timeout(op: impl Into<String>, timeout_ms: u64) -> Self {
        VmError::Timeout {
            op: op.into(),
            timeout_ms,
        }
    }

    pub fn unknown_atom(op: impl Into<String>) -> Self {
        VmError::UnknownAtom { op: op.into() }
    }

    pub fn missing_capability(op: impl Into<String>, capability: impl Into<String>) -> Self {
        VmError::MissingCapability {
            op: op.into(),
            capability: capability.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_prefixed_by_kind() {
        let err = VmError::unknown_atom("nonsense.op");
        assert!(err.to_string().starts_with("UnknownAtom:"));
    }

    #[test]
    fn out_of_fuel_and_bad_root_are_fatal() {
        assert!(VmError::OutOfFuel { step: 3 }.is_fatal());
        assert!(VmError::BadRoot {
            found: "if".into()
        }
        .is_fatal());
        assert!(!VmError::unknown_atom("x").is_fatal());
    }
}
