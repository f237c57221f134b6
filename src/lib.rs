//! HR Assistant - retrieval-augmented answers to workplace policy questions
//!
//! An utterance is sanitized, checked by a topic guardrail, grounded with the
//! nearest indexed policy passages and answered by a hosted language model.
//! Each stage degrades on its own terms: the guardrail falls back to keywords,
//! retrieval failures are surfaced, generation failures become a canned reply.

pub mod assistant;
pub mod cli;
pub mod config;
pub mod core;
pub mod generator;
pub mod guardrail;
pub mod ingest;
pub mod prompts;
pub mod retrieval;
pub mod sanitize;
pub mod session;
pub mod utils;

pub use assistant::{Assistant, TurnOutcome, TurnStage, REFUSAL_REPLY};
pub use config::Settings;
pub use generator::DEGRADED_REPLY;
pub use guardrail::ClassificationResult;
pub use retrieval::RetrievalError;
pub use sanitize::sanitize;
pub use session::Session;
