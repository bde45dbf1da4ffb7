use std::str::FromStr;
use std::time::Duration;

use crate::application::services::{NoContextPolicy, RetrievalPolicy, RetrySchedule};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub model: ModelSettings,
    pub retrieval: RetrievalSettings,
    pub chat: ChatSettings,
    pub retry: RetrySettings,
    pub chunking: ChunkingSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub endpoint: String,
    pub api_key: String,
    pub index_name: String,
    pub use_semantic: bool,
}

#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub max_model_tokens: usize,
    pub reserved_completion_tokens: usize,
    pub max_completion_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct RetrievalSettings {
    pub top_k: usize,
    pub per_passage_char_cap: usize,
    pub context_token_budget: usize,
}

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub no_context_policy: NoContextPolicy,
    pub correction_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ChunkingSettings {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Settings {
    /// Reads the full server configuration. Missing required variables are a
    /// startup error the binary treats as fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerSettings {
                port: parse_or("SERVER_PORT", 3000)?,
            },
            search: SearchSettings::from_env()?,
            model: ModelSettings {
                endpoint: required("AZURE_OPENAI_ENDPOINT")?,
                api_key: required("AZURE_OPENAI_API_KEY")?,
                deployment: required("AZURE_OPENAI_DEPLOYMENT_NAME")?,
                max_model_tokens: parse_or("MAX_MODEL_TOKENS", 16000)?,
                reserved_completion_tokens: parse_or("RESERVED_COMPLETION_TOKENS", 1000)?,
                max_completion_tokens: parse_or("MAX_COMPLETION_TOKENS", 800)?,
                temperature: parse_or("MODEL_TEMPERATURE", 0.1)?,
            },
            retrieval: RetrievalSettings {
                top_k: parse_or("RETRIEVAL_TOP_K", 5)?,
                per_passage_char_cap: parse_or("PER_PASSAGE_CHAR_CAP", 2000)?,
                context_token_budget: parse_or("CONTEXT_TOKEN_BUDGET", 3000)?,
            },
            chat: ChatSettings {
                no_context_policy: no_context_policy_from_env()?,
                correction_enabled: flag_or("ENABLE_CITATION_CORRECTION", true),
            },
            retry: RetrySettings {
                max_attempts: parse_or("RETRY_MAX_ATTEMPTS", 3)?,
                base_delay_ms: parse_or("RETRY_BASE_DELAY_MS", 65_000)?,
            },
            chunking: ChunkingSettings::from_env()?,
        })
    }

    pub fn retrieval_policy(&self) -> RetrievalPolicy {
        RetrievalPolicy {
            top_k: self.retrieval.top_k,
            per_passage_char_cap: self.retrieval.per_passage_char_cap,
            context_token_budget: self.retrieval.context_token_budget,
            use_semantic: self.search.use_semantic,
            ..RetrievalPolicy::default()
        }
    }

    pub fn retry_schedule(&self) -> RetrySchedule {
        RetrySchedule {
            max_attempts: self.retry.max_attempts,
            base_delay: Duration::from_millis(self.retry.base_delay_ms),
        }
    }
}

impl SearchSettings {
    /// The subset the offline indexer needs; it has no model dependency.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: required("AZURE_SEARCH_ENDPOINT")?,
            api_key: required("AZURE_SEARCH_API_KEY")?,
            index_name: required("AZURE_SEARCH_INDEX_NAME")?,
            use_semantic: flag_or("USE_SEMANTIC_SEARCH", false),
        })
    }

    /// First and last four characters only, for diagnostic endpoints.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 8 {
            return "****".to_string();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

impl ChunkingSettings {
    /// A zero-sized window or an overlap covering the whole window would
    /// stall the chunking cursor, so both are rejected at startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        let chunk_size = parse_or("CHUNK_SIZE", 1000)?;
        if chunk_size == 0 {
            return Err(ConfigError::Invalid {
                name: "CHUNK_SIZE",
                reason: "must be greater than zero".to_string(),
            });
        }

        let overlap = parse_or("CHUNK_OVERLAP", 200)?;
        if overlap >= chunk_size {
            return Err(ConfigError::Invalid {
                name: "CHUNK_OVERLAP",
                reason: format!("must be smaller than CHUNK_SIZE ({chunk_size})"),
            });
        }

        Ok(Self {
            chunk_size,
            overlap,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if !raw.is_empty() => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        _ => Ok(default),
    }
}

fn flag_or(name: &'static str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(default)
}

fn no_context_policy_from_env() -> Result<NoContextPolicy, ConfigError> {
    match std::env::var("NO_CONTEXT_POLICY") {
        Err(_) => Ok(NoContextPolicy::StrictRefusal),
        Ok(raw) => match raw.to_lowercase().as_str() {
            "" | "strict" => Ok(NoContextPolicy::StrictRefusal),
            "general" => Ok(NoContextPolicy::LabeledGeneralKnowledge),
            other => Err(ConfigError::Invalid {
                name: "NO_CONTEXT_POLICY",
                reason: format!("expected 'strict' or 'general', got '{}'", other),
            }),
        },
    }
}
