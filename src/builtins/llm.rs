//! LLM capability atoms (spec §6): `llm.predict`, `llm.embed`.

use super::support::{resolve_field, string_field};
use crate::atom::Atom;
use crate::ast::Step;
use crate::capability::LlmOptions;
use crate::context::RuntimeContext;
use crate::error::VmError;
use crate::value::Value;

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub fn atoms() -> Vec<Atom> {
    vec![
        Atom::new("llm.predict", DEFAULT_TIMEOUT_MS, "runs `prompt` through the host's `Llm` capability", predict),
        Atom::new("llm.embed", DEFAULT_TIMEOUT_MS, "embeds `text` through the host's `Llm` capability", embed),
    ]
}

fn predict(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let prompt = string_field(step, "prompt")?;
    let options = LlmOptions {
        options: step.field("options").map(|_| resolve_field(step, "options", ctx)),
    };
    let text = ctx.capabilities.require_llm(&step.op)?.predict(&prompt, options)?;
    Ok(Value::String(text))
}

fn embed(step: &Step, ctx: &mut RuntimeContext) -> Result<Value, VmError> {
    let text = string_field(step, "text")?;
    let vector = ctx.capabilities.require_llm(&step.op)?.embed(&text)?;
    Ok(Value::List(vector.into_iter().map(Value::Number).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::AtomRegistry;
    use crate::capability::{Capabilities, Llm};
    use serde_json::json;
    use std::sync::Arc;

    struct EchoLlm;
    impl Llm for EchoLlm {
        fn predict(&self, prompt: &str, _options: LlmOptions) -> Result<String, VmError> {
            Ok(format!("echo:{prompt}"))
        }
        fn embed(&self, text: &str) -> Result<Vec<f64>, VmError> {
            Ok(vec![text.len() as f64])
        }
    }

    #[test]
    fn predict_delegates_to_the_capability() {
        let mut c = RuntimeContext::new(
            Value::Null,
            Arc::new(Capabilities::new().with_llm(EchoLlm)),
            Arc::new(AtomRegistry::new()),
            1000,
            8,
        );
        let s = Step::try_from(json!({"op": "llm.predict", "prompt": "hi"})).unwrap();
        assert_eq!(predict(&s, &mut c).unwrap(), Value::String("echo:hi".into()));
    }

    #[test]
    fn embed_returns_a_numeric_vector() {
        let mut c = RuntimeContext::new(
            Value::Null,
            Arc::new(Capabilities::new().with_llm(EchoLlm)),
            Arc::new(AtomRegistry::new()),
            1000,
            8,
        );
        let s = Step::try_from(json!({"op": "llm.embed", "text": "abcd"})).unwrap();
        assert_eq!(embed(&s, &mut c).unwrap(), Value::List(vec![Value::Number(4.0)]));
    }
}
