//! An embeddable virtual machine for executing JSON-serializable agent
//! programs: a fuel-budgeted, capability-gated interpreter for the `seq`/
//! `if`/`while`/`var.*`/... atom vocabulary described in `DESIGN.md`.

pub mod ast;
pub mod atom;
mod builtins;
pub mod capability;
pub mod context;
pub mod error;
mod executor;
pub mod expr;
pub mod resolver;
pub mod schema;
pub mod scope;
pub mod value;
pub mod vm;

pub use atom::{Atom, AtomRegistry};
pub use capability::Capabilities;
pub use error::VmError;
pub use value::Value;
pub use vm::{Vm, VmOptions, RunOutcome};
