mod chunk;
mod config;
mod metadata;

pub use chunk::{ChunkRecord, UpsertRecord};
pub use config::{
    Config, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_EMBEDDING_MODEL,
    DEFAULT_LOG_FILE_PATH, DEFAULT_RAW_DATA_PATH, DEFAULT_UPSERT_BATCH_SIZE, EMBEDDING_DIMENSION,
};
pub use metadata::ChunkMetadata;
