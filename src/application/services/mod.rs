mod chat_service;
mod chunker;
mod field_mapping;
mod indexing_service;
mod prompt_assembler;
mod retrieval_service;
mod retry;
mod token_estimate;

pub use chat_service::{ChatService, ChatTurn, ChatTurnError};
pub use chunker::{ChunkSlice, Chunker};
pub use field_mapping::{FieldMapping, ResolvedFields};
pub use indexing_service::{IndexingError, IndexingReport, IndexingService};
pub use prompt_assembler::{
    NoContextPolicy, PromptAssembler, PromptBudgetExceeded, NO_INFORMATION_REPLY, SYSTEM_PROMPT,
};
pub use retrieval_service::{RetrievalPolicy, RetrievalService, RetrievedContext};
pub use retry::{with_retry, RetrySchedule};
pub use token_estimate::estimate_tokens;
