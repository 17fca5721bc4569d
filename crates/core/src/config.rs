//! Configuration management for fplscout.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Environment variables
//! - Command-line flags
//! - Config files (.fplscout/config.yaml)
//!
//! The configuration is data-directory-centric: documents and the persisted
//! index live under `<data_dir>/.fplscout/`. Credentials are resolved here,
//! once, and handed to the components that need them; nothing downstream
//! reads ambient process state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default base URL of the Fantasy Premier League feed.
pub const DEFAULT_FEED_URL: &str = "https://fantasy.premierleague.com/api/";

/// Main application configuration.
///
/// This struct holds all global configuration options that affect
/// behavior across commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the data directory root (contains .fplscout/)
    pub data_dir: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Base URL of the upstream statistics feed
    pub feed_base_url: String,

    /// Completion provider (e.g., "openai", "ollama")
    pub provider: String,

    /// Completion model identifier
    pub model: String,

    /// Sampling temperature for answers (lower = more deterministic)
    pub temperature: f32,

    /// Embedding provider (e.g., "ollama", "openai", "mock")
    pub embedding_provider: String,

    /// Embedding model identifier
    pub embedding_model: String,

    /// Embedding vector dimensions
    pub embedding_dimensions: usize,

    /// API key for the completion/embedding provider
    pub api_key: Option<String>,

    /// Maximum chunk length in characters
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,

    /// Number of chunks to retrieve per query
    pub top_k: usize,

    /// Number of conversation turns retained in chat sessions
    pub history_window: usize,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Provider tables from config.yaml
    pub llm: Option<LlmConfig>,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(rename = "activeEmbeddingProvider")]
    pub active_embedding_provider: String,

    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    OpenAI {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        #[serde(rename = "embeddingModel")]
        embedding_model: Option<String>,
        endpoint: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        #[serde(rename = "embeddingModel")]
        embedding_model: Option<String>,
        timeout: Option<u64>,
    },
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    feed: Option<FeedConfig>,
    retrieval: Option<RetrievalConfig>,
    data: Option<DataConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FeedConfig {
    #[serde(rename = "baseUrl")]
    base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RetrievalConfig {
    #[serde(rename = "chunkSize")]
    chunk_size: Option<usize>,
    #[serde(rename = "chunkOverlap")]
    chunk_overlap: Option<usize>,
    #[serde(rename = "topK")]
    top_k: Option<usize>,
    #[serde(rename = "historyWindow")]
    history_window: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DataConfig {
    dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            feed_base_url: DEFAULT_FEED_URL.to_string(),
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            embedding_provider: "ollama".to_string(), // Local-first default
            embedding_model: "nomic-embed-text".to_string(),
            embedding_dimensions: 768,
            api_key: None,
            chunk_size: 1000,
            chunk_overlap: 100,
            top_k: 5,
            history_window: 2,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `FPLSCOUT_DATA_DIR`: Override data directory
    /// - `FPLSCOUT_CONFIG`: Path to config file
    /// - `FPLSCOUT_PROVIDER`: Completion provider
    /// - `FPLSCOUT_MODEL`: Completion model identifier
    /// - `FPLSCOUT_API_KEY`: API key
    /// - `FPLSCOUT_FEED_URL`: Feed base URL
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("FPLSCOUT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Ok(config_file) = std::env::var("FPLSCOUT_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.data_dir.exists() {
            return Err(AppError::Config(format!(
                "Data directory does not exist: {:?}",
                config.data_dir
            )));
        }

        // Load from YAML config file if it exists
        let config_path = if let Some(ref cf) = config.config_file {
            cf.clone()
        } else {
            config.data_dir.join(".fplscout/config.yaml")
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
            tracing::debug!("Merged config file {:?}", config_path);
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("FPLSCOUT_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("FPLSCOUT_MODEL") {
            config.model = model;
        }

        if let Ok(url) = std::env::var("FPLSCOUT_FEED_URL") {
            config.feed_base_url = url;
        }

        config.api_key = std::env::var("FPLSCOUT_API_KEY").ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(data) = config_file.data {
            if let Some(dir) = data.dir {
                result.data_dir = PathBuf::from(dir);
            }
        }

        if let Some(feed) = config_file.feed {
            if let Some(url) = feed.base_url {
                result.feed_base_url = url;
            }
        }

        if let Some(retrieval) = config_file.retrieval {
            if let Some(size) = retrieval.chunk_size {
                result.chunk_size = size;
            }
            if let Some(overlap) = retrieval.chunk_overlap {
                result.chunk_overlap = overlap;
            }
            if let Some(top_k) = retrieval.top_k {
                result.top_k = top_k;
            }
            if let Some(window) = retrieval.history_window {
                result.history_window = window;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = match provider_config {
                    ProviderConfig::OpenAI { model, .. } => model.clone(),
                    ProviderConfig::Ollama { model, .. } => model.clone(),
                };
            }

            result.embedding_provider = llm.active_embedding_provider.clone();
            if let Some(embedding_config) = llm.providers.get(&llm.active_embedding_provider) {
                let embedding_model = match embedding_config {
                    ProviderConfig::OpenAI {
                        embedding_model, ..
                    } => embedding_model.clone(),
                    ProviderConfig::Ollama {
                        embedding_model, ..
                    } => embedding_model.clone(),
                };
                if let Some(model) = embedding_model {
                    result.embedding_model = model;
                }
            }

            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .fplscout directory.
    pub fn fplscout_dir(&self) -> PathBuf {
        self.data_dir.join(".fplscout")
    }

    /// Path of the collected documents file.
    pub fn documents_path(&self) -> PathBuf {
        self.fplscout_dir().join("documents.json")
    }

    /// Location of the persisted vector index.
    pub fn index_dir(&self) -> PathBuf {
        self.fplscout_dir().join("index")
    }

    /// Ensure the .fplscout directory exists.
    pub fn ensure_fplscout_dir(&self) -> AppResult<()> {
        let dir = self.fplscout_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AppError::Config(format!("Failed to create .fplscout directory: {}", e))
            })?;
        }
        Ok(())
    }

    /// Get the configuration table for a provider, if one was declared.
    pub fn get_provider_config(&self, provider: &str) -> Option<ProviderConfig> {
        self.llm
            .as_ref()
            .and_then(|llm| llm.providers.get(provider).cloned())
    }

    /// Resolve the API key for a provider.
    ///
    /// An explicit `FPLSCOUT_API_KEY` wins; otherwise the provider table's
    /// `apiKeyEnv` variable is consulted.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        if let Some(ProviderConfig::OpenAI { api_key_env, .. }) = self.get_provider_config(provider)
        {
            if let Ok(key) = std::env::var(&api_key_env) {
                return Some(key);
            }
        }

        None
    }

    /// Resolve the endpoint for a provider, if one was configured.
    pub fn resolve_endpoint(&self, provider: &str) -> Option<String> {
        match self.get_provider_config(provider)? {
            ProviderConfig::OpenAI { endpoint, .. } => endpoint,
            ProviderConfig::Ollama { endpoint, .. } => Some(endpoint),
        }
    }

    /// Validate configuration for the active providers.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["openai", "ollama"];
        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        let known_embedding_providers = ["openai", "ollama", "mock"];
        if !known_embedding_providers.contains(&self.embedding_provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding_provider,
                known_embedding_providers.join(", ")
            )));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.provider == "openai" && self.resolve_api_key("openai").is_none() {
            return Err(AppError::Config(
                "OpenAI provider selected but no API key found. Set FPLSCOUT_API_KEY \
                 or declare apiKeyEnv in .fplscout/config.yaml"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
