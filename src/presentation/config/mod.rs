mod settings;

pub use settings::{
    ChatSettings, ChunkingSettings, ConfigError, ModelSettings, RetrievalSettings, RetrySettings,
    SearchSettings, ServerSettings, Settings,
};
