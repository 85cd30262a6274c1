use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
/// Dimension for text-embedding-3-small; must match the index dimension.
pub const EMBEDDING_DIMENSION: usize = 1536;

pub const DEFAULT_CHUNK_SIZE: usize = 800;
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;
pub const DEFAULT_UPSERT_BATCH_SIZE: usize = 100;
pub const DEFAULT_RAW_DATA_PATH: &str = "../data/raw";
pub const DEFAULT_LOG_FILE_PATH: &str = "data_processing.log";

/// Immutable run configuration, built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the embeddings API.
    pub openai_api_key: String,

    /// Credential for the vector index.
    pub pinecone_api_key: String,

    /// Name of the target index.
    pub index_name: String,

    /// Serverless cloud provider (e.g. "aws").
    pub cloud: String,

    /// Serverless region (e.g. "us-east-1").
    pub region: String,

    /// Embedding model identifier.
    pub embedding_model: String,

    /// Maximum chunk size in characters.
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters.
    pub chunk_overlap: usize,

    /// Number of chunk records per embed/upsert batch.
    pub upsert_batch_size: usize,

    /// Root of the raw document corpus.
    pub raw_data_path: PathBuf,

    /// Path of the file-backed log.
    pub log_file_path: PathBuf,
}

impl Config {
    /// Build configuration from process environment variables.
    ///
    /// Fails fast when any required credential or index setting is absent,
    /// before any processing begins.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary lookup function.
    ///
    /// Kept separate from [`Config::from_env`] so validation can be tested
    /// without mutating process-global environment state.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            get(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        let sized = |name: &'static str, default: usize| -> Result<usize, ConfigError> {
            match get(name) {
                None => Ok(default),
                Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    name,
                    reason: format!("expected a non-negative integer, got '{raw}'"),
                }),
            }
        };

        let config = Self {
            openai_api_key: required("OPENAI_API_KEY")?,
            pinecone_api_key: required("PINECONE_API_KEY")?,
            index_name: required("PINECONE_INDEX_NAME")?,
            cloud: required("PINECONE_CLOUD")?,
            region: required("PINECONE_REGION")?,
            embedding_model: get("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            chunk_size: sized("CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?,
            chunk_overlap: sized("CHUNK_OVERLAP", DEFAULT_CHUNK_OVERLAP)?,
            upsert_batch_size: sized("UPSERT_BATCH_SIZE", DEFAULT_UPSERT_BATCH_SIZE)?,
            raw_data_path: PathBuf::from(
                get("RAW_DATA_PATH").unwrap_or_else(|| DEFAULT_RAW_DATA_PATH.to_string()),
            ),
            log_file_path: PathBuf::from(
                get("LOG_FILE_PATH").unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
            ),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "CHUNK_SIZE",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::InvalidValue {
                name: "CHUNK_OVERLAP",
                reason: format!(
                    "must be smaller than the chunk size ({} >= {})",
                    self.chunk_overlap, self.chunk_size
                ),
            });
        }
        if self.upsert_batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "UPSERT_BATCH_SIZE",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
