use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Graph database connection
    pub graph: GraphConfig,
    /// LLM provider configuration (chat + embeddings)
    pub llm: LlmConfig,
    /// Retry policy for completion calls
    pub retry: RetryConfig,
    /// Retrieval parameters for normal and trend queries
    pub retrieval: RetrievalConfig,
}

/// Connection settings for the Neo4j HTTP endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Base URL of the Neo4j HTTP API (e.g. "http://localhost:7474")
    pub url: String,
    pub username: String,
    pub password: String,
    pub database: String,
    /// Per-query timeout in seconds
    pub query_timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:7474".to_string(),
            username: "neo4j".to_string(),
            password: String::new(),
            database: "neo4j".to_string(),
            query_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for chat completions
    pub chat_model: String,
    /// Model name for embeddings
    pub embedding_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
    /// Sampling temperature for completions
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            api_key: None,
            temperature: 0.0,
        }
    }
}

/// Bounded retry for transient completion failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
    /// Multiplier applied to the delay after each failed attempt (1.0 = fixed delay)
    pub backoff: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
            backoff: 1.0,
        }
    }
}

/// How many titles to keep and how similar they must be.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrievalMode {
    pub top: usize,
    pub threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Q&A lookups: few titles, high precision
    pub normal: RetrievalMode,
    /// Trend questions: many titles, broad recall
    pub trend: RetrievalMode,
    /// Cap on candidate question nodes fetched from the graph (None = all)
    pub candidate_limit: Option<usize>,
    /// Include view count and date in the context of normal answers
    pub normal_includes_metadata: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            normal: RetrievalMode {
                top: 2,
                threshold: 0.9,
            },
            trend: RetrievalMode {
                top: 50,
                threshold: 0.3,
            },
            candidate_limit: None,
            normal_includes_metadata: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            graph: GraphConfig::default(),
            llm: LlmConfig::default(),
            retry: RetryConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Unparseable values
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("KG_QA_BIND_ADDR") {
            config.bind_addr = addr;
        }

        // Graph
        if let Some(url) = lookup("NEO4J_URL") {
            config.graph.url = url;
        }
        if let Some(user) = lookup("NEO4J_USERNAME") {
            config.graph.username = user;
        }
        if let Some(password) = lookup("NEO4J_PASSWORD") {
            config.graph.password = password;
        }
        if let Some(db) = lookup("NEO4J_DATABASE") {
            config.graph.database = db;
        }
        if let Some(v) = parse_var(&lookup, "NEO4J_QUERY_TIMEOUT_SECS") {
            config.graph.query_timeout_secs = v;
        }

        // LLM
        if let Some(provider) = lookup("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Some(url) = lookup("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Some(model) = lookup("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Some(model) = lookup("LLM_EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }
        if let Some(key) = lookup("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Some(v) = parse_var(&lookup, "LLM_TEMPERATURE") {
            config.llm.temperature = v;
        }

        // Retry
        if let Some(v) = parse_var(&lookup, "LLM_RETRY_MAX_ATTEMPTS") {
            config.retry.max_attempts = v;
        }
        if let Some(v) = parse_var(&lookup, "LLM_RETRY_DELAY_MS") {
            config.retry.delay_ms = v;
        }
        if let Some(v) = parse_var::<f64>(&lookup, "LLM_RETRY_BACKOFF") {
            if v.is_finite() && v >= 0.0 {
                config.retry.backoff = v;
            } else {
                tracing::warn!("Ignoring LLM_RETRY_BACKOFF={v}: must be a finite, non-negative number");
            }
        }

        // Retrieval
        if let Some(v) = parse_var(&lookup, "KG_QA_NORMAL_TOP") {
            config.retrieval.normal.top = v;
        }
        if let Some(v) = parse_var(&lookup, "KG_QA_NORMAL_THRESHOLD") {
            config.retrieval.normal.threshold = v;
        }
        if let Some(v) = parse_var(&lookup, "KG_QA_TREND_TOP") {
            config.retrieval.trend.top = v;
        }
        if let Some(v) = parse_var(&lookup, "KG_QA_TREND_THRESHOLD") {
            config.retrieval.trend.threshold = v;
        }
        if let Some(v) = parse_var(&lookup, "KG_QA_CANDIDATE_LIMIT") {
            config.retrieval.candidate_limit = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "KG_QA_NORMAL_METADATA") {
            config.retrieval.normal_includes_metadata = v;
        }

        config
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}
