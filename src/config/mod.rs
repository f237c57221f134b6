mod settings;

pub use settings::{
    ConversationConfig, IngestConfig, LLMConfig, LoggingConfig, PipelineConfig, RetrievalConfig,
    Settings,
};
