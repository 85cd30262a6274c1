mod batch;
mod chunker;
mod embedding;
mod metadata;
mod pipeline;
mod vector_store;

pub use batch::assemble_batches;
pub use chunker::TextChunker;
pub use embedding::{Embedder, OpenAiEmbedder};
pub use metadata::resolve_metadata;
pub use pipeline::{IngestPipeline, RunSummary};
pub use vector_store::{PineconeIndex, VectorIndex};
