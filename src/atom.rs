//! Atom descriptors and the atom registry (spec §4.4, §4.6).
//!
//! An `Atom` is the runtime-side description of one `op`: the schema its
//! input must satisfy, the closure that actually performs the work, a
//! default per-atom timeout, and a one-line doc string surfaced by
//! `AtomRegistry::list`. `AtomRegistry` is the `op -> Atom` table the
//! resolver consults (spec §4.6); custom atoms registered by a host always
//! win over a built-in of the same name, matching the "Resolver override"
//! testable property (spec §8).

use crate::ast::Step;
use crate::context::RuntimeContext;
use crate::error::VmError;
use crate::schema::Schema;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// `Send + Sync` for the same reason the capability traits are: the
/// executor may run a timed atom's `exec` on a worker thread.
pub type AtomExec = Arc<dyn Fn(&Step, &mut RuntimeContext) -> Result<Value, VmError> + Send + Sync>;

#[derive(Clone)]
pub struct Atom {
    pub op: String,
    pub input_schema: Option<Arc<dyn Schema + Send + Sync>>,
    pub output_schema: Option<Arc<dyn Schema + Send + Sync>>,
    pub exec: AtomExec,
    /// `0` means unbounded (spec §5: every flow atom uses this). Non-flow
    /// atoms get a default appropriate to what they do; a host may override
    /// an individual step's timeout via `Step.timeoutMs` regardless.
    pub timeout_ms: u64,
    pub docs: &'static str,
}

impl Atom {
    pub fn new(
        op: impl Into<String>,
        timeout_ms: u64,
        docs: &'static str,
        exec: impl Fn(&Step, &mut RuntimeContext) -> Result<Value, VmError> + Send + Sync + 'static,
    ) -> Self {
        Atom {
            op: op.into(),
            input_schema: None,
            output_schema: None,
            exec: Arc::new(exec),
            timeout_ms,
            docs,
        }
    }

    pub fn with_input_schema(mut self, schema: impl Schema + Send + Sync + 'static) -> Self {
        self.input_schema = Some(Arc::new(schema));
        self
    }

    pub fn with_output_schema(mut self, schema: impl Schema + Send + Sync + 'static) -> Self {
        self.output_schema = Some(Arc::new(schema));
        self
    }

    /// Runs this atom's input schema against `input`, if one is declared
    /// (spec §4.4 step 2: "validate it against the atom's declared input
    /// schema, if any").
    pub fn validate(&self, input: &Value) -> Result<(), VmError> {
        match &self.input_schema {
            Some(schema) if !schema.validate(input) => {
                Err(VmError::validation(self.op.clone(), input.stringify()))
            }
            _ => Ok(()),
        }
    }
}

/// The `op -> Atom` table. Built-in atoms are seeded first; custom atoms
/// registered afterward shadow a built-in of the same name rather than
/// being rejected as a duplicate (spec §4.6, §6 "Custom atoms").
#[derive(Clone, Default)]
pub struct AtomRegistry {
    atoms: HashMap<String, Atom>,
}

impl AtomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in atoms plus whatever `custom` overlays on top of them.
    pub fn with_builtins(custom: impl IntoIterator<Item = Atom>) -> Self {
        let mut registry = Self::new();
        for atom in crate::builtins::all() {
            registry.register(atom);
        }
        for atom in custom {
            registry.register(atom);
        }
        registry
    }

    /// Registers `atom`, replacing any existing atom with the same `op`.
    pub fn register(&mut self, atom: Atom) {
        self.atoms.insert(atom.op.clone(), atom);
    }

    pub fn get(&self, op: &str) -> Option<&Atom> {
        self.atoms.get(op)
    }

    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.atoms.keys().cloned().collect();
        names.sort();
        names
    }
}
