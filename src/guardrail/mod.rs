//! Topic Guardrail
//!
//! Information Hiding:
//! - Classifier strategies hidden behind the `TopicClassifier` trait
//! - Degrade policy lives in one place: `Guardrail::classify`
//! - Callers only see a `ClassificationResult`, never a classifier error

pub mod keyword;
pub mod model;

pub use keyword::{KeywordClassifier, HR_KEYWORDS};
pub use model::ModelClassifier;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Decision for one utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "inDomain")]
    pub in_domain: bool,
    pub reason: String,
}

impl ClassificationResult {
    pub fn new(in_domain: bool, reason: impl Into<String>) -> Self {
        Self {
            in_domain,
            reason: reason.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(false, "empty")
    }

    /// True when the keyword safety net produced this result
    pub fn is_fallback(&self) -> bool {
        self.reason.starts_with("fallback")
    }
}

/// A strategy for deciding whether an utterance is an HR topic
#[async_trait]
pub trait TopicClassifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn classify(&self, utterance: &str) -> Result<ClassificationResult>;
}

/// Two-tier classifier: a preferred strategy with the keyword list as safety net
pub struct Guardrail {
    primary: Arc<dyn TopicClassifier>,
    fallback: KeywordClassifier,
}

impl Guardrail {
    pub fn new(primary: Arc<dyn TopicClassifier>) -> Self {
        Self {
            primary,
            fallback: KeywordClassifier::new(),
        }
    }

    pub async fn classify(&self, utterance: &str) -> ClassificationResult {
        if utterance.trim().is_empty() {
            return ClassificationResult::empty();
        }

        match self.primary.classify(utterance).await {
            Ok(result) => {
                tracing::debug!(
                    "[Guardrail] {} classifier: in_domain={}, reason={}",
                    self.primary.name(),
                    result.in_domain,
                    result.reason
                );
                result
            }
            Err(e) => {
                tracing::warn!(
                    "[Guardrail] {} classifier failed, using keyword fallback: {}",
                    self.primary.name(),
                    e
                );
                self.fallback.evaluate(utterance)
            }
        }
    }
}
