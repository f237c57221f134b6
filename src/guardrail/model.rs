use super::{ClassificationResult, TopicClassifier};
use crate::core::llm::{ChatMessage, JsonSchemaFormat, LLMClient, ResponseFormat};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const CLASSIFIER_PROMPT: &str = "You are a topic filter for a workplace HR assistant.\n\n\
In scope: human resources topics such as leave and time off, vacation, benefits, pay and payroll, \
hiring and onboarding, termination, harassment and workplace conduct, performance reviews, \
managers and employee relations, and company HR policies.\n\n\
Out of scope: general programming or coding help, math problems, trivia, and any other \
subject that is not about the workplace relationship between an employer and its employees.\n\n\
Decide whether the user's message is in scope. Respond only with the JSON object \
{\"inDomain\": boolean, \"reason\": short explanation}.";

/// Language-model classifier using structured output and deterministic decoding
pub struct ModelClassifier {
    client: Arc<LLMClient>,
    model: String,
    format: ResponseFormat,
}

impl ModelClassifier {
    pub fn new(client: Arc<LLMClient>) -> Self {
        let model = client.config().classifier_model.clone();
        Self {
            client,
            model,
            format: classification_format(),
        }
    }
}

fn classification_format() -> ResponseFormat {
    ResponseFormat::JsonSchema {
        json_schema: JsonSchemaFormat {
            name: "topic_classification".to_string(),
            description: Some("Whether a message is an HR topic".to_string()),
            schema: json!({
                "type": "object",
                "properties": {
                    "inDomain": {"type": "boolean"},
                    "reason": {"type": "string"}
                },
                "required": ["inDomain", "reason"],
                "additionalProperties": false
            }),
            strict: true,
        },
    }
}

#[async_trait]
impl TopicClassifier for ModelClassifier {
    fn name(&self) -> &'static str {
        "model"
    }

    async fn classify(&self, utterance: &str) -> Result<ClassificationResult> {
        let messages = [
            ChatMessage::system(CLASSIFIER_PROMPT),
            ChatMessage::user(utterance),
        ];

        let raw = self
            .client
            .chat_with_format(&self.model, &messages, 0.0, Some(&self.format))
            .await?;

        serde_json::from_str::<ClassificationResult>(raw.trim())
            .context("Classifier returned malformed JSON")
    }
}
