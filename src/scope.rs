//! Lexically scoped mutable state (spec §4.3).
//!
//! A parent-pointer tree of per-frame mutable maps, per design note §9:
//! reads walk the chain from the current frame up to the root; writes only
//! ever mutate the top frame. Child frames share the parent's `Arc` rather
//! than deep-copying its bindings, so `scope`/`map`/`if`/`while`/`try`
//! bodies can create a child cheaply and discard it on exit.
//!
//! Frames are `Arc<Mutex<_>>` rather than `Rc<RefCell<_>>`: the executor's
//! per-atom timeout race (see `executor`) runs a timed atom's `exec` on a
//! worker thread against a cloned `RuntimeContext` handle, so every piece of
//! context state — including scope frames — must be `Send + Sync`. The VM
//! is still single-threaded from an agent author's point of view (spec
//! §5); threading is strictly an executor implementation detail.

use crate::value::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct Frame {
    bindings: Mutex<HashMap<String, Value>>,
    parent: Option<Scope>,
}

#[derive(Debug, Clone)]
pub struct Scope(Arc<Frame>);

impl Scope {
    pub fn root() -> Self {
        Scope(Arc::new(Frame {
            bindings: Mutex::new(HashMap::new()),
            parent: None,
        }))
    }

    /// Allocates a child scope whose reads fall through to `self`.
    pub fn child(&self) -> Self {
        Scope(Arc::new(Frame {
            bindings: Mutex::new(HashMap::new()),
            parent: Some(self.clone()),
        }))
    }

    /// Reads walk the chain from this frame up to the root (spec invariant
    /// 2: "reads see the nearest enclosing binding").
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.0.bindings.lock().unwrap().get(name) {
            return Some(v.clone());
        }
        self.0.parent.as_ref().and_then(|p| p.get(name))
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Writes only ever mutate the current frame (spec invariant 1: "writes
    /// inside a scope never leak upward").
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.0.bindings.lock().unwrap().insert(name.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_reads_fall_through_to_parent() {
        let parent = Scope::root();
        parent.set("x", Value::Number(1.0));
        let child = parent.child();
        assert_eq!(child.get("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn child_write_does_not_leak_to_parent_for_new_name() {
        let parent = Scope::root();
        let child = parent.child();
        child.set("y", Value::Number(9.0));
        assert_eq!(parent.get("y"), None);
        assert_eq!(child.get("y"), Some(Value::Number(9.0)));
    }

    #[test]
    fn child_write_shadows_without_mutating_parent_binding() {
        let parent = Scope::root();
        parent.set("x", Value::Number(1.0));
        let child = parent.child();
        child.set("x", Value::Number(2.0));
        assert_eq!(parent.get("x"), Some(Value::Number(1.0)));
        assert_eq!(child.get("x"), Some(Value::Number(2.0)));
    }

    #[test]
    fn unresolved_name_is_none() {
        let scope = Scope::root();
        assert_eq!(scope.get("missing"), None);
    }
}
