use std::sync::Arc;

use crate::application::ports::{ChatModel, SearchIndex};
use crate::application::services::{ChatService, RetrievalService};
use crate::presentation::config::Settings;

pub struct AppState<S, M>
where
    S: SearchIndex,
    M: ChatModel,
{
    pub chat_service: Arc<ChatService<S, M>>,
    pub retrieval_service: Arc<RetrievalService<S>>,
    pub search_index: Arc<S>,
    pub settings: Settings,
}

impl<S, M> Clone for AppState<S, M>
where
    S: SearchIndex,
    M: ChatModel,
{
    fn clone(&self) -> Self {
        Self {
            chat_service: Arc::clone(&self.chat_service),
            retrieval_service: Arc::clone(&self.retrieval_service),
            search_index: Arc::clone(&self.search_index),
            settings: self.settings.clone(),
        }
    }
}
