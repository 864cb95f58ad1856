//! The pluggable capability surface (spec §6).
//!
//! Each capability is a small trait so a host can wire in a real
//! implementation or a test double; `Capabilities` is the bag the VM looks
//! a capability up in, and an absent capability is only ever an error when
//! an atom that needs it actually runs (spec §3 "absence of a required
//! capability is a runtime error").

use crate::error::VmError;
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub method: Option<String>,
    pub headers: Option<Value>,
    pub body: Option<Value>,
}

/// `Send + Sync` so a `RuntimeContext` carrying these can be cloned into the
/// worker thread the executor races a timed atom's `exec` against (see
/// `executor`).
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str, options: FetchOptions) -> Result<Value, VmError>;
}

pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Result<Value, VmError>;
    fn set(&self, key: &str, value: Value) -> Result<(), VmError>;
    fn query(&self, query: &Value) -> Result<Vec<Value>, VmError>;
    fn vector_search(&self, vector: &Value) -> Result<Vec<Value>, VmError>;
}

#[derive(Debug, Clone, Default)]
pub struct LlmOptions {
    pub options: Option<Value>,
}

pub trait Llm: Send + Sync {
    fn predict(&self, prompt: &str, options: LlmOptions) -> Result<String, VmError>;
    fn embed(&self, text: &str) -> Result<Vec<f64>, VmError>;
}

/// `agent.run` is a host-defined recursive invocation; the core does not
/// prescribe whether it shares state or fuel with the caller (spec §9,
/// design note "agent.run recursion" — resolved in DESIGN.md: it does not
/// share either, each sub-agent run gets its own fresh fuel budget and
/// state, the caller only supplies `input`).
pub trait AgentRunner: Send + Sync {
    fn run(&self, agent_id: &str, input: Value) -> Result<Value, VmError>;
}

#[derive(Default)]
pub struct Capabilities {
    pub fetch: Option<Box<dyn Fetch + Send + Sync>>,
    pub store: Option<Box<dyn Store + Send + Sync>>,
    pub llm: Option<Box<dyn Llm + Send + Sync>>,
    pub agent: Option<Box<dyn AgentRunner + Send + Sync>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fetch(mut self, fetch: impl Fetch + 'static) -> Self {
        self.fetch = Some(Box::new(fetch));
        self
    }

    pub fn with_store(mut self, store: impl Store + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn with_llm(mut self, llm: impl Llm + 'static) -> Self {
        self.llm = Some(Box::new(llm));
        self
    }

    pub fn with_agent(mut self, agent: impl AgentRunner + 'static) -> Self {
        self.agent = Some(Box::new(agent));
        self
    }

    pub fn require_fetch(&self, op: &str) -> Result<&(dyn Fetch + Send + Sync), VmError> {
        self.fetch
            .as_deref()
            .ok_or_else(|| VmError::missing_capability(op, "fetch"))
    }

    pub fn require_store(&self, op: &str) -> Result<&(dyn Store + Send + Sync), VmError> {
        self.store
            .as_deref()
            .ok_or_else(|| VmError::missing_capability(op, "store"))
    }

    pub fn require_llm(&self, op: &str) -> Result<&(dyn Llm + Send + Sync), VmError> {
        self.llm
            .as_deref()
            .ok_or_else(|| VmError::missing_capability(op, "llm"))
    }

    pub fn require_agent(&self, op: &str) -> Result<&(dyn AgentRunner + Send + Sync), VmError> {
        self.agent
            .as_deref()
            .ok_or_else(|| VmError::missing_capability(op, "agent"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_capability_names_the_op_and_capability() {
        let caps = Capabilities::new();
        let err = caps.require_fetch("http.fetch").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("http.fetch"));
        assert!(msg.contains("fetch"));
    }
}
