//! Data sources for the ingestion pipeline.

mod loader;

pub use loader::{DocumentLoader, FsLoader};
