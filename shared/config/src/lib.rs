//! Typed configuration for the MedGraph RAG services.
//!
//! Values come from the process environment (after loading an optional
//! `.env` file). Every setting has a default except credentials, which are
//! left as `None` and validated by the client that needs them.

pub mod feature_toggles;

use feature_toggles::FeatureToggles;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Neo4j connection settings
#[derive(Debug, Clone)]
pub struct Neo4jSettings {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub fetch_size: usize,
    pub max_connections: usize,
}

/// OpenAI-compatible chat completion settings for the two LLM oracles
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub translation_model: String,
    pub translation_temperature: f32,
    pub synthesis_model: String,
    pub synthesis_temperature: f32,
    pub timeout_secs: u64,
    /// Sent as `HTTP-Referer` for OpenRouter app attribution
    pub app_referer: Option<String>,
    /// Sent as `X-Title` for OpenRouter app attribution
    pub app_title: Option<String>,
}

/// Vector index and query embedding settings
#[derive(Debug, Clone)]
pub struct VectorSettings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub collection: String,
    pub text_field: String,
    pub embedding_base_url: String,
    pub embedding_model: String,
    pub embedding_api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct RagSettings {
    /// Upper bound for each translate / execute / synthesize step
    pub step_timeout_secs: Option<u64>,
    /// Number of nearest chunks fetched by the semantic path
    pub semantic_depth: usize,
}

impl RagSettings {
    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub graph_rag_port: u16,
    pub vector_rag_port: u16,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub neo4j: Neo4jSettings,
    pub llm: LlmSettings,
    pub vector: VectorSettings,
    pub rag: RagSettings,
    pub server: ServerSettings,
    pub feature_toggles: FeatureToggles,
}

impl AppConfig {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> ConfigResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup: &lookup };

        let neo4j = Neo4jSettings {
            uri: env.string_or("NEO4J_URI", "bolt://localhost:7687"),
            user: env.string_or("NEO4J_USER", "neo4j"),
            password: env.string_or("NEO4J_PASSWORD", "password"),
            database: env.string_or("NEO4J_DATABASE", "neo4j"),
            fetch_size: env.parse_or("NEO4J_FETCH_SIZE", 500)?,
            max_connections: env.parse_or("NEO4J_MAX_CONNECTIONS", 10)?,
        };

        let llm = LlmSettings {
            base_url: env.string_or("LLM_BASE_URL", "https://openrouter.ai/api/v1"),
            api_key: env.optional("LLM_API_KEY").or_else(|| env.optional("OPENROUTER_API_KEY")),
            translation_model: env.string_or("TRANSLATION_MODEL", "google/gemini-2.0-flash-001"),
            translation_temperature: env.parse_or("TRANSLATION_TEMPERATURE", 0.0)?,
            synthesis_model: env.string_or("SYNTHESIS_MODEL", "openai/gpt-4o-mini"),
            synthesis_temperature: env.parse_or("SYNTHESIS_TEMPERATURE", 0.3)?,
            timeout_secs: env.parse_or("LLM_TIMEOUT_SECS", 60)?,
            app_referer: env.optional("LLM_APP_REFERER"),
            app_title: env.optional("LLM_APP_TITLE"),
        };

        let vector = VectorSettings {
            endpoint: env.optional("ZILLIZ_ENDPOINT"),
            api_key: env.optional("ZILLIZ_API_KEY"),
            collection: env.string_or("VECTOR_COLLECTION", "drug_interactions"),
            text_field: env.string_or("VECTOR_TEXT_FIELD", "text"),
            embedding_base_url: env.string_or("EMBEDDING_BASE_URL", "https://api.openai.com/v1"),
            embedding_model: env.string_or("EMBEDDING_MODEL", "text-embedding-3-small"),
            embedding_api_key: env.optional("OPENAI_API_KEY"),
            timeout_secs: env.parse_or("VECTOR_TIMEOUT_SECS", 30)?,
        };

        let step_timeout_secs: Option<u64> = env.parse_optional("RAG_STEP_TIMEOUT_SECS")?;
        let rag = RagSettings {
            step_timeout_secs: step_timeout_secs
                .map(|secs| non_zero("RAG_STEP_TIMEOUT_SECS", secs))
                .transpose()?,
            semantic_depth: non_zero("SEMANTIC_DEPTH", env.parse_or("SEMANTIC_DEPTH", 2usize)?)?,
        };

        let server = ServerSettings {
            host: env.string_or("HOST", "0.0.0.0"),
            graph_rag_port: env.parse_or("GRAPH_RAG_PORT", 8006)?,
            vector_rag_port: env.parse_or("VECTOR_RAG_PORT", 8082)?,
        };

        let feature_toggles = FeatureToggles::from_path(env.optional("FEATURE_TOGGLES_PATH"));

        Ok(Self {
            neo4j,
            llm,
            vector,
            rag,
            server,
            feature_toggles,
        })
    }
}

struct Env<'a, F: Fn(&str) -> Option<String>> {
    lookup: &'a F,
}

impl<'a, F: Fn(&str) -> Option<String>> Env<'a, F> {
    /// Present and non-blank
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_optional<T>(&self, key: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => raw.parse::<T>().map(Some).map_err(|e| ConfigError::Invalid {
                key: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
            None => Ok(None),
        }
    }

    fn parse_or<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.parse_optional(key)?.unwrap_or(default))
    }
}

fn non_zero<T>(key: &str, value: T) -> ConfigResult<T>
where
    T: Default + PartialEq + ToString,
{
    if value == T::default() {
        return Err(ConfigError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}
