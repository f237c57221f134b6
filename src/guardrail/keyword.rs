use super::{ClassificationResult, TopicClassifier};
use anyhow::Result;
use async_trait::async_trait;

/// Safety-net vocabulary. Deliberately narrow: "vacation" is not listed.
pub const HR_KEYWORDS: &[&str] = &[
    "leave",
    "benefits",
    "payroll",
    "termination",
    "harassment",
    "policy",
    "performance",
    "manager",
    "employee",
];

/// Case-insensitive substring match over `HR_KEYWORDS`
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, utterance: &str) -> ClassificationResult {
        let text = utterance.to_lowercase();
        match HR_KEYWORDS.iter().find(|keyword| text.contains(*keyword)) {
            Some(keyword) => ClassificationResult::new(true, format!("fallback: matched '{}'", keyword)),
            None => ClassificationResult::new(false, "fallback: no HR keyword"),
        }
    }
}

#[async_trait]
impl TopicClassifier for KeywordClassifier {
    fn name(&self) -> &'static str {
        "keyword"
    }

    async fn classify(&self, utterance: &str) -> Result<ClassificationResult> {
        Ok(self.evaluate(utterance))
    }
}
