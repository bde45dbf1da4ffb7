use std::sync::Arc;

use super::{
    with_retry, NoContextPolicy, PromptAssembler, PromptBudgetExceeded, RetrievalService,
    RetrySchedule, NO_INFORMATION_REPLY,
};
use crate::application::ports::{ChatModel, ChatModelError, SamplingParams, SearchIndex};
use crate::domain::{extract_citations, Citation};

/// Replies shorter than this are not worth a correction round-trip.
const CORRECTION_MIN_REPLY_CHARS: usize = 50;
const NO_INFORMATION_MARKER: &str = "keine Informationen zu dieser Frage finden";

#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub reply: String,
    pub sources: Vec<Citation>,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatTurnError {
    #[error("rate limited after all retry attempts")]
    RateLimited,
    #[error(transparent)]
    BudgetExceeded(#[from] PromptBudgetExceeded),
    #[error("completion failed: {0}")]
    Completion(ChatModelError),
}

/// One chat turn end to end: retrieve, assemble, complete with backoff,
/// correct missing citations once, extract sources.
pub struct ChatService<S: SearchIndex, M: ChatModel> {
    retrieval_service: Arc<RetrievalService<S>>,
    chat_model: Arc<M>,
    prompt_assembler: PromptAssembler,
    sampling: SamplingParams,
    retry_schedule: RetrySchedule,
    correction_enabled: bool,
}

impl<S: SearchIndex, M: ChatModel> ChatService<S, M> {
    pub fn new(
        retrieval_service: Arc<RetrievalService<S>>,
        chat_model: Arc<M>,
        prompt_assembler: PromptAssembler,
        sampling: SamplingParams,
        retry_schedule: RetrySchedule,
        correction_enabled: bool,
    ) -> Self {
        Self {
            retrieval_service,
            chat_model,
            prompt_assembler,
            sampling,
            retry_schedule,
            correction_enabled,
        }
    }

    pub async fn answer(&self, question: &str) -> Result<ChatTurn, ChatTurnError> {
        let context = self
            .retrieval_service
            .retrieve_with_fallback(question)
            .await;

        if context.passages.is_empty()
            && self.prompt_assembler.no_context_policy() == NoContextPolicy::StrictRefusal
        {
            tracing::info!("No relevant documents found, returning canonical refusal");
            return Ok(ChatTurn {
                reply: NO_INFORMATION_REPLY.to_string(),
                sources: Vec::new(),
            });
        }

        let messages = self
            .prompt_assembler
            .assemble(question, &context.context_text)?;

        let reply = with_retry(self.retry_schedule, || {
            self.chat_model.complete(&messages, &self.sampling)
        })
        .await
        .map_err(map_completion_error)?;

        let sources = extract_citations(&reply);

        if self.needs_correction(&reply, &sources) {
            tracing::warn!("Reply carries no citations, requesting one correction turn");

            let correction_messages = self.prompt_assembler.assemble_correction(&messages, &reply);
            let correction_sampling = SamplingParams {
                temperature: 0.0,
                top_p: None,
                ..self.sampling.clone()
            };

            // The corrected reply is accepted as-is; a failed correction
            // request falls back to the original answer.
            match self
                .chat_model
                .complete(&correction_messages, &correction_sampling)
                .await
            {
                Ok(corrected) => {
                    let corrected_sources = extract_citations(&corrected);
                    tracing::info!(
                        citations = corrected_sources.len(),
                        "Correction turn completed"
                    );
                    return Ok(ChatTurn {
                        reply: corrected,
                        sources: corrected_sources,
                    });
                }
                Err(error) => {
                    tracing::error!(%error, "Correction request failed, keeping original reply");
                }
            }
        }

        Ok(ChatTurn { reply, sources })
    }

    fn needs_correction(&self, reply: &str, sources: &[Citation]) -> bool {
        self.correction_enabled
            && sources.is_empty()
            && reply.chars().count() > CORRECTION_MIN_REPLY_CHARS
            && !reply.contains(NO_INFORMATION_MARKER)
    }
}

fn map_completion_error(error: ChatModelError) -> ChatTurnError {
    match error {
        ChatModelError::RateLimited => ChatTurnError::RateLimited,
        // The chars/4 estimate is approximate; the model remains the final
        // arbiter of its own context window.
        ChatModelError::ContextLengthExceeded(detail) => {
            tracing::warn!(%detail, "Model rejected prompt for context length");
            ChatTurnError::BudgetExceeded(PromptBudgetExceeded {
                estimated: 0,
                available: 0,
            })
        }
        other => ChatTurnError::Completion(other),
    }
}
