use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::application::ports::{
    FieldKind, IndexSchema, SearchHit, SearchIndex, SearchIndexError, SearchOptions, UploadOutcome,
};
use crate::domain::IndexedRecord;

const API_VERSION: &str = "2023-11-01";

/// Azure AI Search REST client for one index.
pub struct AzureSearchClient {
    client: Client,
    endpoint: String,
    api_key: String,
    index_name: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    value: Vec<Map<String, Value>>,
}

#[derive(Deserialize)]
struct IndexBatchResponse {
    value: Vec<IndexActionResult>,
}

#[derive(Deserialize)]
struct IndexActionResult {
    key: String,
    status: bool,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
}

impl AzureSearchClient {
    pub fn new(endpoint: String, api_key: String, index_name: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            index_name,
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    fn index_url(&self, name: &str) -> String {
        format!(
            "{}/indexes/{}?api-version={}",
            self.endpoint, name, API_VERSION
        )
    }

    fn docs_url(&self, operation: &str) -> String {
        format!(
            "{}/indexes/{}/docs/{}?api-version={}",
            self.endpoint, self.index_name, operation, API_VERSION
        )
    }

    fn schema_body(schema: &IndexSchema) -> Value {
        let fields: Vec<Value> = schema
            .fields
            .iter()
            .map(|f| {
                json!({
                    "name": f.name,
                    "type": match f.kind {
                        FieldKind::String => "Edm.String",
                        FieldKind::Int32 => "Edm.Int32",
                    },
                    "key": f.key,
                    "searchable": f.searchable,
                    "filterable": f.filterable,
                    "sortable": f.sortable,
                    "facetable": f.facetable,
                })
            })
            .collect();

        let mut body = json!({ "name": schema.name, "fields": fields });

        if let Some(semantic) = &schema.semantic {
            body["semantic"] = json!({
                "configurations": [{
                    "name": semantic.name,
                    "prioritizedFields": {
                        "titleField": { "fieldName": semantic.title_field },
                        "prioritizedContentFields": semantic
                            .content_fields
                            .iter()
                            .map(|f| json!({ "fieldName": f }))
                            .collect::<Vec<_>>(),
                        "prioritizedKeywordsFields": [],
                    }
                }]
            });
        }

        body
    }
}

#[async_trait]
impl SearchIndex for AzureSearchClient {
    async fn ensure_index(&self, schema: &IndexSchema) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .put(self.index_url(&schema.name))
            .header("api-key", &self.api_key)
            .json(&Self::schema_body(schema))
            .send()
            .await
            .map_err(|e| SearchIndexError::IndexCreationFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();

        // The service reports an unsupported or malformed semantic section as
        // a 400; callers downgrade to the plain schema on this signal.
        if schema.semantic.is_some()
            && (body.to_lowercase().contains("semantic") || status == reqwest::StatusCode::BAD_REQUEST)
        {
            return Err(SearchIndexError::SemanticConfigRejected(body));
        }

        Err(SearchIndexError::IndexCreationFailed(format!(
            "HTTP {}: {}",
            status, body
        )))
    }

    async fn upload_batch(
        &self,
        records: &[IndexedRecord],
    ) -> Result<Vec<UploadOutcome>, SearchIndexError> {
        let actions: Vec<Value> = records
            .iter()
            .map(|record| {
                let mut action = serde_json::to_value(record).unwrap_or_default();
                action["@search.action"] = json!("mergeOrUpload");
                action
            })
            .collect();

        let response = self
            .client
            .post(self.docs_url("index"))
            .header("api-key", &self.api_key)
            .json(&json!({ "value": actions }))
            .send()
            .await
            .map_err(|e| SearchIndexError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SearchIndexError::RateLimited);
        }

        // 207 carries per-record results; anything else non-success is fatal
        // for the batch.
        if !status.is_success() && status != reqwest::StatusCode::MULTI_STATUS {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::UploadFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let batch: IndexBatchResponse = response
            .json()
            .await
            .map_err(|e| SearchIndexError::UploadFailed(e.to_string()))?;

        Ok(batch
            .value
            .into_iter()
            .map(|r| UploadOutcome {
                key: r.key,
                succeeded: r.status,
                error_message: r.error_message,
            })
            .collect())
    }

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchHit>, SearchIndexError> {
        let mut body = json!({
            "search": query,
            "top": options.top,
            "queryType": options.query_kind.as_str(),
        });

        if !options.select.is_empty() {
            body["select"] = json!(options.select.join(","));
        }
        if let Some(config) = &options.semantic_configuration {
            body["semanticConfiguration"] = json!(config);
        }
        if let Some(language) = &options.query_language {
            body["queryLanguage"] = json!(language);
        }

        let response = self
            .client
            .post(self.docs_url("search"))
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchIndexError::SearchFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SearchIndexError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::SearchFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let results: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchIndexError::SearchFailed(e.to_string()))?;

        Ok(results
            .value
            .into_iter()
            .map(|mut fields| {
                let score = fields
                    .remove("@search.score")
                    .and_then(|v| v.as_f64());
                fields.retain(|key, _| !key.starts_with("@search."));
                SearchHit { fields, score }
            })
            .collect())
    }
}
