//! Answer Generator
//!
//! Information Hiding:
//! - Model name and decoding temperature come from settings, not callers
//! - Every model failure is converted into the fixed degraded reply

use crate::core::llm::{ChatMessage, LLMClient};
use std::sync::Arc;

pub const DEGRADED_REPLY: &str =
    "I'm having trouble responding right now. Please try again in a moment.";

#[derive(Debug, Clone, PartialEq)]
pub enum Generation {
    Answer(String),
    /// The model call failed; `reply` is always `DEGRADED_REPLY`
    Degraded { reply: String, error: String },
}

impl Generation {
    pub fn reply(&self) -> &str {
        match self {
            Generation::Answer(reply) => reply,
            Generation::Degraded { reply, .. } => reply,
        }
    }
}

pub struct AnswerGenerator {
    client: Arc<LLMClient>,
    model: String,
    temperature: f32,
}

impl AnswerGenerator {
    pub fn new(client: Arc<LLMClient>) -> Self {
        let model = client.config().model.clone();
        let temperature = client.config().temperature;
        Self {
            client,
            model,
            temperature,
        }
    }

    /// One attempt, no retry.
    pub async fn generate(&self, window: &[ChatMessage]) -> Generation {
        match self.client.chat(&self.model, window, self.temperature).await {
            Ok(answer) => Generation::Answer(answer),
            Err(e) => {
                tracing::warn!("[AnswerGenerator] Generation failed, returning degraded reply: {}", e);
                Generation::Degraded {
                    reply: DEGRADED_REPLY.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }
}
