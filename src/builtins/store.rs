//! KV-store and vector-search capability atoms (spec §6): `store.get`,
//! `store.set`, `store.query`, `store.vectorSearch`.

use super::support::{resolve_field, string_field};
use crate::atom::Atom;
use crate::ast::Step;
use crate::context::RuntimeContext;
use crate::error::VmError;
use crate::value::Value;

const DEFAULT_TIMEOUT_MS: u64 = 2000;

pub fn atoms() -> Vec<Atom> {
    vec![
        Atom::new("store.get", DEFAULT_TIMEOUT_MS, "reads `key` from the host's `Store` capability", get),
        Atom::new("store.set", DEFAULT_TIMEOUT_MS, "writes `value` to `key` in the host's `Store` capability", set),
        Atom::new("store.query", DEFAULT_TIMEOUT_MS, "runs `query` against the host's `Store` capability", query),
        Atom::new(
            "store.vectorSearch",
            DEFAULT_TIMEOUT_MS,
            "runs `vector` against the host's `Store` capability",
            vector_search,
        ),
    ]
}

fn get(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let key = string_field(step, "key")?;
    ctx.capabilities.require_store(&step.op)?.get(&key)
}

fn set(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let key = string_field(step, "key")?;
    let value = resolve_field(step, "value", ctx);
    ctx.capabilities.require_store(&step.op)?.set(&key, value.clone())?;
    Ok(value)
}

fn query(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let q = resolve_field(step, "query", ctx);
    let results = ctx.capabilities.require_store(&step.op)?.query(&q)?;
    Ok(Value::List(results))
}

fn vector_search(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let vector = resolve_field(step, "vector", ctx);
    let results = ctx.capabilities.require_store(&step.op)?.vector_search(&vector)?;
    Ok(Value::List(results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::AtomRegistry;
    use crate::capability::{Capabilities, Store};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MemStore {
        data: Mutex<std::collections::HashMap<String, Value>>,
    }

    impl Store for MemStore {
        fn get(&self, key: &str) -> Result<Value, VmError> {
            Ok(self.data.lock().unwrap().get(key).cloned().unwrap_or(Value::Null))
        }
        fn set(&self, key: &str, value: Value) -> Result<(), VmError> {
            self.data.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }
        fn query(&self, _query: &Value) -> Result<Vec<Value>, VmError> {
            Ok(vec![])
        }
        fn vector_search(&self, _vector: &Value) -> Result<Vec<Value>, VmError> {
            Ok(vec![])
        }
    }

    #[test]
    fn set_then_get_round_trips_through_the_capability() {
        let mut c = RuntimeContext::new(
            Value::Null,
            Arc::new(Capabilities::new().with_store(MemStore::default())),
            Arc::new(AtomRegistry::new()),
            1000,
            8,
        );
        let s = Step::try_from(json!({"op": "store.set", "key": "k", "value": "v"})).unwrap();
        set(&s, &mut c).unwrap();
        let g = Step::try_from(json!({"op": "store.get", "key": "k"})).unwrap();
        assert_eq!(get(&g, &mut c).unwrap(), Value::String("v".into()));
    }
}
