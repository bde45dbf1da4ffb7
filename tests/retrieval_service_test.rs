use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use quellbot::application::ports::{
    IndexSchema, QueryKind, SearchHit, SearchIndex, SearchIndexError, SearchOptions, UploadOutcome,
};
use quellbot::application::services::{RetrievalPolicy, RetrievalService};
use quellbot::domain::IndexedRecord;

struct ScriptedSearchIndex {
    responses: Mutex<VecDeque<Result<Vec<SearchHit>, SearchIndexError>>>,
    queries: Mutex<Vec<(String, SearchOptions)>>,
}

impl ScriptedSearchIndex {
    fn new(responses: Vec<Result<Vec<SearchHit>, SearchIndexError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    fn recorded_queries(&self) -> Vec<(String, SearchOptions)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchIndex for ScriptedSearchIndex {
    async fn ensure_index(&self, _schema: &IndexSchema) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn upload_batch(
        &self,
        _records: &[IndexedRecord],
    ) -> Result<Vec<UploadOutcome>, SearchIndexError> {
        Ok(Vec::new())
    }

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchHit>, SearchIndexError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), options.clone()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn hit(fields: Vec<(&str, Value)>) -> SearchHit {
    let mut map = Map::new();
    for (name, value) in fields {
        map.insert(name.to_string(), value);
    }
    SearchHit {
        fields: map,
        score: Some(1.0),
    }
}

fn service(
    index: Arc<ScriptedSearchIndex>,
    policy: RetrievalPolicy,
) -> RetrievalService<ScriptedSearchIndex> {
    RetrievalService::new(index, policy)
}

#[tokio::test]
async fn given_hits_with_known_fields_when_retrieving_then_passages_are_normalized() {
    let index = Arc::new(ScriptedSearchIndex::new(vec![Ok(vec![hit(vec![
        ("content", json!("Die BKB betreibt einen Chatbot.")),
        ("filename", json!("Report")),
        ("page_number", json!(4)),
    ])])]));
    let service = service(Arc::clone(&index), RetrievalPolicy::default());

    let context = service.retrieve("Was macht die BKB?").await;

    assert_eq!(context.passages.len(), 1);
    assert_eq!(context.passages[0].document_name, "Report");
    assert_eq!(context.passages[0].page_number, 4);
    assert!(context.context_text.contains("Dokument: Report"));
    assert!(context.context_text.contains("Seite: 4"));
    assert!(context
        .context_text
        .contains("Inhalt: Die BKB betreibt einen Chatbot."));
}

#[tokio::test]
async fn given_hits_with_unknown_field_names_when_retrieving_then_keyword_heuristic_resolves_them()
{
    let index = Arc::new(ScriptedSearchIndex::new(vec![Ok(vec![hit(vec![
        ("body_text", json!("Inhalt aus fremdem Index.")),
        ("doc_title", json!("Fremdbericht")),
        ("page_no", json!("12")),
    ])])]));
    let service = service(Arc::clone(&index), RetrievalPolicy::default());

    let context = service.retrieve("frage").await;

    assert_eq!(context.passages.len(), 1);
    assert_eq!(context.passages[0].content, "Inhalt aus fremdem Index.");
    assert_eq!(context.passages[0].document_name, "Fremdbericht");
    assert_eq!(context.passages[0].page_number, 12);
}

#[tokio::test]
async fn given_passages_beyond_token_budget_when_retrieving_then_only_a_prefix_is_kept() {
    let long_content = "a".repeat(60);
    let index = Arc::new(ScriptedSearchIndex::new(vec![Ok(vec![
        hit(vec![
            ("content", json!(long_content.clone())),
            ("filename", json!("Doc")),
            ("page_number", json!(1)),
        ]),
        hit(vec![
            ("content", json!(long_content)),
            ("filename", json!("Doc")),
            ("page_number", json!(2)),
        ]),
    ])]));
    let policy = RetrievalPolicy {
        context_token_budget: 30,
        ..RetrievalPolicy::default()
    };
    let service = service(Arc::clone(&index), policy);

    let context = service.retrieve("frage").await;

    assert_eq!(context.passages.len(), 1);
    assert!(context.estimated_tokens <= 30);
}

#[tokio::test]
async fn given_oversized_passage_when_retrieving_then_content_is_capped_before_estimation() {
    let index = Arc::new(ScriptedSearchIndex::new(vec![Ok(vec![hit(vec![
        ("content", json!("b".repeat(500))),
        ("filename", json!("Doc")),
        ("page_number", json!(1)),
    ])])]));
    let policy = RetrievalPolicy {
        per_passage_char_cap: 10,
        ..RetrievalPolicy::default()
    };
    let service = service(Arc::clone(&index), policy);

    let context = service.retrieve("frage").await;

    assert_eq!(context.passages.len(), 1);
    assert_eq!(context.passages[0].content, format!("{}...", "b".repeat(10)));
}

#[tokio::test]
async fn given_primary_search_failure_when_retrieving_then_minimal_fallback_query_is_used() {
    let index = Arc::new(ScriptedSearchIndex::new(vec![
        Err(SearchIndexError::SearchFailed("broken".to_string())),
        Ok(vec![hit(vec![
            ("content", json!("Gefunden trotz Fehler.")),
            ("filename", json!("Doc")),
            ("page_number", json!(3)),
        ])]),
    ]));
    let service = service(Arc::clone(&index), RetrievalPolicy::default());

    let context = service.retrieve("frage").await;

    assert_eq!(context.passages.len(), 1);
    let queries = index.recorded_queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[1].1.query_kind, QueryKind::Simple);
    assert_eq!(queries[1].1.top, 10);
    assert!(queries[1].1.select.is_empty());
    assert!(queries[1].1.semantic_configuration.is_none());
}

#[tokio::test]
async fn given_large_top_k_when_primary_search_fails_then_fallback_honors_the_knob() {
    let index = Arc::new(ScriptedSearchIndex::new(vec![
        Err(SearchIndexError::SearchFailed("broken".to_string())),
        Ok(Vec::new()),
    ]));
    let policy = RetrievalPolicy {
        top_k: 25,
        ..RetrievalPolicy::default()
    };
    let service = service(Arc::clone(&index), policy);

    service.retrieve("frage").await;

    let queries = index.recorded_queries();
    assert_eq!(queries[1].1.top, 25);
}

#[tokio::test]
async fn given_repeated_search_failure_when_retrieving_then_context_is_empty_not_an_error() {
    let index = Arc::new(ScriptedSearchIndex::new(vec![
        Err(SearchIndexError::SearchFailed("broken".to_string())),
        Err(SearchIndexError::SearchFailed("still broken".to_string())),
    ]));
    let service = service(Arc::clone(&index), RetrievalPolicy::default());

    let context = service.retrieve("frage").await;

    assert!(context.passages.is_empty());
    assert!(context.context_text.is_empty());
}

#[tokio::test]
async fn given_empty_primary_result_when_retrieving_with_fallback_then_simplified_query_is_tried() {
    let index = Arc::new(ScriptedSearchIndex::new(vec![
        Ok(Vec::new()),
        Ok(vec![hit(vec![
            ("content", json!("Antwort auf die einfachere Suche.")),
            ("filename", json!("Doc")),
            ("page_number", json!(2)),
        ])]),
    ]));
    let service = service(Arc::clone(&index), RetrievalPolicy::default());

    let context = service
        .retrieve_with_fallback("Was macht die BKB im Wissensmanagement?")
        .await;

    assert_eq!(context.passages.len(), 1);
    let queries = index.recorded_queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[1].0, "Was macht die");
}

#[tokio::test]
async fn given_runtime_field_override_when_retrieving_then_new_field_takes_priority() {
    let index = Arc::new(ScriptedSearchIndex::new(vec![Ok(vec![hit(vec![
        ("chunk_body", json!("Inhalt über Override.")),
        ("content", json!("")),
        ("filename", json!("Doc")),
        ("page_number", json!(1)),
    ])])]));
    let service = service(Arc::clone(&index), RetrievalPolicy::default());

    service
        .set_field_mapping("chunk_body".to_string(), None, None)
        .await;
    let context = service.retrieve("frage").await;

    assert_eq!(context.passages.len(), 1);
    assert_eq!(context.passages[0].content, "Inhalt über Override.");
}
