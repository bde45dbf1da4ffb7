mod chat_model;
mod index_schema;
mod search_index;

pub use chat_model::{ChatMessage, ChatModel, ChatModelError, MessageRole, SamplingParams};
pub use index_schema::{FieldKind, IndexField, IndexSchema, SemanticConfiguration};
pub use search_index::{
    QueryKind, SearchHit, SearchIndex, SearchIndexError, SearchOptions, UploadOutcome,
};
