//! Answering pipeline
//!
//! Information Hiding:
//! - Stage ordering and the concurrent classify/retrieve join are internal
//! - Degrade policy per stage: guardrail falls back, retrieval fails the turn,
//!   generation turns into a canned reply
//! - Session state is passed in by the caller; nothing is global

use crate::config::{ConversationConfig, Settings};
use crate::core::llm::LLMClient;
use crate::generator::{AnswerGenerator, Generation};
use crate::guardrail::{ClassificationResult, Guardrail, ModelClassifier};
use crate::prompts;
use crate::retrieval::{OpenAIEmbedder, RetrievalError, Retriever};
use crate::sanitize::sanitize;
use crate::session::{Session, TurnRole};
use anyhow::Result;
use std::fmt;
use std::sync::Arc;

pub const REFUSAL_REPLY: &str = "I can only help with HR-related questions.";

/// Request state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    Received,
    Sanitized,
    Classified,
    Rejected,
    Accepted,
    Retrieved,
    Assembled,
    Generated,
    Degraded,
}

impl fmt::Display for TurnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnStage::Received => "RECEIVED",
            TurnStage::Sanitized => "SANITIZED",
            TurnStage::Classified => "CLASSIFIED",
            TurnStage::Rejected => "REJECTED",
            TurnStage::Accepted => "ACCEPTED",
            TurnStage::Retrieved => "RETRIEVED",
            TurnStage::Assembled => "ASSEMBLED",
            TurnStage::Generated => "GENERATED",
            TurnStage::Degraded => "DEGRADED",
        };
        f.write_str(name)
    }
}

/// Terminal result of one turn. `user_message` is the sanitized input.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Rejected {
        user_message: String,
        classification: ClassificationResult,
    },
    Answered {
        user_message: String,
        classification: ClassificationResult,
        reply: String,
    },
    Degraded {
        user_message: String,
        classification: ClassificationResult,
        reply: String,
        error: String,
    },
}

impl TurnOutcome {
    pub fn reply(&self) -> &str {
        match self {
            TurnOutcome::Rejected { .. } => REFUSAL_REPLY,
            TurnOutcome::Answered { reply, .. } | TurnOutcome::Degraded { reply, .. } => reply,
        }
    }

    pub fn user_message(&self) -> &str {
        match self {
            TurnOutcome::Rejected { user_message, .. }
            | TurnOutcome::Answered { user_message, .. }
            | TurnOutcome::Degraded { user_message, .. } => user_message,
        }
    }

    pub fn classification(&self) -> &ClassificationResult {
        match self {
            TurnOutcome::Rejected { classification, .. }
            | TurnOutcome::Answered { classification, .. }
            | TurnOutcome::Degraded { classification, .. } => classification,
        }
    }

    pub fn stage(&self) -> TurnStage {
        match self {
            TurnOutcome::Rejected { .. } => TurnStage::Rejected,
            TurnOutcome::Answered { .. } => TurnStage::Generated,
            TurnOutcome::Degraded { .. } => TurnStage::Degraded,
        }
    }
}

pub struct Assistant {
    guardrail: Guardrail,
    retriever: Retriever,
    generator: AnswerGenerator,
    conversation: ConversationConfig,
    concurrent_retrieval: bool,
}

impl Assistant {
    /// Wire every stage to the hosted model API described by `settings`.
    pub fn new(settings: &Settings, api_key: String) -> Result<Self> {
        let client = Arc::new(LLMClient::new(api_key, settings.llm.clone())?);

        let guardrail = Guardrail::new(Arc::new(ModelClassifier::new(client.clone())));
        let retriever = Retriever::new(
            Arc::new(OpenAIEmbedder::new(client.clone())),
            &settings.retrieval,
        );
        let generator = AnswerGenerator::new(client);

        Ok(Self::from_parts(guardrail, retriever, generator, settings))
    }

    pub fn from_parts(
        guardrail: Guardrail,
        retriever: Retriever,
        generator: AnswerGenerator,
        settings: &Settings,
    ) -> Self {
        Self {
            guardrail,
            retriever,
            generator,
            conversation: settings.conversation.clone(),
            concurrent_retrieval: settings.pipeline.concurrent_retrieval,
        }
    }

    pub fn start_session(&self) -> Session {
        Session::new(&self.conversation)
    }

    pub fn guardrail(&self) -> &Guardrail {
        &self.guardrail
    }

    /// Process one utterance to completion.
    ///
    /// Only a retrieval failure is returned as an error. Rejected turns leave
    /// the history untouched; accepted turns append the user message and the
    /// reply, degraded or not.
    pub async fn handle_turn(
        &self,
        session: &mut Session,
        utterance: &str,
    ) -> Result<TurnOutcome, RetrievalError> {
        trace_stage(TurnStage::Received);
        let user_message = sanitize(utterance);
        trace_stage(TurnStage::Sanitized);

        let concurrent = self.concurrent_retrieval && !user_message.trim().is_empty();
        let (classification, early_context) = if concurrent {
            let (classification, context) = tokio::join!(
                self.guardrail.classify(&user_message),
                self.retriever.retrieve_default(&user_message)
            );
            (classification, Some(context))
        } else {
            (self.guardrail.classify(&user_message).await, None)
        };
        trace_stage(TurnStage::Classified);

        if !classification.in_domain {
            tracing::info!("[Assistant] Rejected utterance: {}", classification.reason);
            trace_stage(TurnStage::Rejected);
            return Ok(TurnOutcome::Rejected {
                user_message,
                classification,
            });
        }
        trace_stage(TurnStage::Accepted);

        let context = match early_context {
            Some(context) => context,
            None => self.retriever.retrieve_default(&user_message).await,
        }
        .map_err(|e| {
            tracing::error!("[Assistant] Retrieval failed: {}", e);
            e
        })?;
        trace_stage(TurnStage::Retrieved);

        let prior_turns = session.history().window();
        session.history_mut().append(TurnRole::User, &user_message);

        let window = prompts::assemble(&context, &prior_turns, &user_message);
        trace_stage(TurnStage::Assembled);

        let generation = self.generator.generate(&window).await;
        session
            .history_mut()
            .append(TurnRole::Assistant, generation.reply());

        let outcome = match generation {
            Generation::Answer(reply) => TurnOutcome::Answered {
                user_message,
                classification,
                reply,
            },
            Generation::Degraded { reply, error } => TurnOutcome::Degraded {
                user_message,
                classification,
                reply,
                error,
            },
        };
        trace_stage(outcome.stage());

        Ok(outcome)
    }
}

fn trace_stage(stage: TurnStage) {
    tracing::debug!("[Assistant] -> {}", stage);
}
