//! Recursive sub-agent invocation (spec §6, §9): `agent.run` delegates to
//! the host's `AgentRunner` capability. The sub-run gets neither the
//! caller's state nor its remaining fuel — only `input` crosses the
//! boundary (design note "agent.run recursion") — so there is nothing to
//! thread through here beyond the recursion-depth guard every nested
//! context carries.

use super::support::{resolve_field, string_field};
use crate::atom::Atom;
use crate::ast::Step;
use crate::context::RuntimeContext;
use crate::error::VmError;
use crate::value::Value;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub fn atoms() -> Vec<Atom> {
    vec![Atom::new(
        "agent.run",
        DEFAULT_TIMEOUT_MS,
        "invokes `agentId` with `input` through the host's `AgentRunner` capability",
        run,
    )]
}

fn run(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    ctx.check_depth()?;
    let agent_id = string_field(step, "agentId")?;
    let input = resolve_field(step, "input", ctx);
    ctx.capabilities.require_agent(&step.op)?.run(&agent_id, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::AtomRegistry;
    use crate::capability::{AgentRunner, Capabilities};
    use serde_json::json;
    use std::sync::Arc;

    struct EchoAgent;
    impl AgentRunner for EchoAgent {
        fn run(&self, agent_id: &str, input: Value) -> Result<Value, VmError> {
            Ok(Value::String(format!("{agent_id}:{}", input.stringify())))
        }
    }

    #[test]
    fn run_delegates_to_the_capability_with_agent_id_and_input() {
        let mut c = RuntimeContext::new(
            Value::Null,
            Arc::new(Capabilities::new().with_agent(EchoAgent)),
            Arc::new(AtomRegistry::new()),
            1000,
            8,
        );
        let s = Step::try_from(json!({"op": "agent.run", "agentId": "summarizer", "input": "hi"})).unwrap();
        assert_eq!(run(&s, &mut c).unwrap(), Value::String("summarizer:hi".into()));
    }
}
