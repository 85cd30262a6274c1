//! Pipeline driver: traverse, chunk, enrich, batch, embed, upsert.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::models::{ChunkRecord, Config, UpsertRecord};
use crate::services::batch::assemble_batches;
use crate::services::chunker::TextChunker;
use crate::services::embedding::Embedder;
use crate::services::metadata::resolve_metadata;
use crate::services::vector_store::VectorIndex;
use crate::sources::DocumentLoader;

/// Outcome of a pipeline run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Files visited by the traversal (hidden files excluded).
    pub files_scanned: usize,
    /// Files that produced no chunks (load failure, unsupported, empty).
    pub files_skipped: usize,
    /// Chunk records accumulated across all files.
    pub chunks_total: usize,
    /// Batches assembled from the global chunk sequence.
    pub batches_total: usize,
    /// Batches skipped after an embedding failure or count mismatch.
    pub batches_skipped: usize,
    /// Chunk records successfully upserted.
    pub chunks_upserted: usize,
    /// True when the run halted early on an upsert failure.
    pub halted: bool,
}

/// Orchestrates one ingestion run over a directory tree.
///
/// Failure policy: a load failure costs one file, an embedding failure costs
/// one batch, an upsert failure halts the run. Batches are processed strictly
/// in order, one in flight at a time.
pub struct IngestPipeline<'a> {
    config: &'a Config,
    loader: &'a dyn DocumentLoader,
    embedder: &'a dyn Embedder,
    index: &'a dyn VectorIndex,
    chunker: TextChunker,
}

impl<'a> IngestPipeline<'a> {
    pub fn new(
        config: &'a Config,
        loader: &'a dyn DocumentLoader,
        embedder: &'a dyn Embedder,
        index: &'a dyn VectorIndex,
    ) -> Self {
        Self {
            config,
            loader,
            embedder,
            index,
            chunker: TextChunker::new(config.chunk_size, config.chunk_overlap),
        }
    }

    /// Run the full pipeline rooted at `root`.
    pub async fn run(&self, root: &Path) -> RunSummary {
        info!(root = %root.display(), "starting ingestion pipeline");

        let mut summary = RunSummary::default();
        let records = self.collect_records(root, &mut summary);
        summary.chunks_total = records.len();

        info!(
            total_chunks = summary.chunks_total,
            files_scanned = summary.files_scanned,
            "total chunks to process and upsert"
        );

        let batches = assemble_batches(records, self.config.upsert_batch_size);
        summary.batches_total = batches.len();

        let progress = ProgressBar::new(batches.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap()
                .progress_chars("#>-"),
        );

        for (batch_index, batch) in batches.into_iter().enumerate() {
            let keep_going = self.process_batch(batch_index, batch, &mut summary).await;
            progress.inc(1);
            if !keep_going {
                break;
            }
        }

        progress.finish_and_clear();

        info!(
            upserted = summary.chunks_upserted,
            skipped_batches = summary.batches_skipped,
            halted = summary.halted,
            "pipeline finished"
        );

        summary
    }

    /// Embed and upsert one batch. Returns false when the run must halt.
    async fn process_batch(
        &self,
        batch_index: usize,
        batch: Vec<ChunkRecord>,
        summary: &mut RunSummary,
    ) -> bool {
        let texts: Vec<String> = batch.iter().map(|record| record.text.clone()).collect();

        let embeddings = match self.embedder.embed(&texts).await {
            Ok(vectors) => vectors,
            Err(e) => {
                error!(
                    batch = batch_index + 1,
                    error = %e,
                    "skipping batch due to embedding generation error"
                );
                summary.batches_skipped += 1;
                return true;
            }
        };

        if embeddings.len() != batch.len() {
            error!(
                batch = batch_index + 1,
                expected = batch.len(),
                received = embeddings.len(),
                "skipping batch due to embedding count mismatch"
            );
            summary.batches_skipped += 1;
            return true;
        }

        let records: Vec<UpsertRecord> = batch
            .into_iter()
            .zip(embeddings)
            .map(|(record, values)| UpsertRecord {
                id: record.id,
                values,
                metadata: record.metadata,
            })
            .collect();
        let ids: Vec<String> = records.iter().map(|record| record.id.clone()).collect();

        match self.index.upsert(records).await {
            Ok(()) => {
                for id in &ids {
                    info!(chunk_id = %id, "SUCCESS_UPSERT");
                }
                summary.chunks_upserted += ids.len();
                true
            }
            Err(e) => {
                error!(
                    batch = batch_index + 1,
                    error = %e,
                    "failed to upsert batch, halting pipeline"
                );
                summary.halted = true;
                false
            }
        }
    }

    /// Walk the tree in stable order, loading and chunking each visible file
    /// into one global ordered record sequence.
    fn collect_records(&self, root: &Path, summary: &mut RunSummary) -> Vec<ChunkRecord> {
        let mut records = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            // Hidden files never reach the loader.
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            summary.files_scanned += 1;

            let file_records = self.process_file(entry.path());
            if file_records.is_empty() {
                summary.files_skipped += 1;
                continue;
            }

            debug!(
                path = %entry.path().display(),
                chunks = file_records.len(),
                "file chunked"
            );
            records.extend(file_records);
        }

        records
    }

    /// Load, chunk, and enrich a single file.
    fn process_file(&self, path: &Path) -> Vec<ChunkRecord> {
        let text = self.loader.load(path);
        if text.is_empty() {
            return Vec::new();
        }

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base_metadata = resolve_metadata(path);

        self.chunker
            .chunk(&text)
            .into_iter()
            .enumerate()
            .map(|(index, chunk)| {
                let mut metadata = base_metadata.clone();
                metadata.text = Some(chunk.clone());
                ChunkRecord::new(&filename, index, chunk, metadata)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::error::{EmbeddingError, VectorStoreError};

    fn test_config() -> Config {
        Config::from_lookup(|key| {
            Some(
                match key {
                    "OPENAI_API_KEY" => "sk-test",
                    "PINECONE_API_KEY" => "pc-test",
                    "PINECONE_INDEX_NAME" => "idx",
                    "PINECONE_CLOUD" => "aws",
                    "PINECONE_REGION" => "us-east-1",
                    "CHUNK_SIZE" => "10000",
                    "CHUNK_OVERLAP" => "0",
                    "UPSERT_BATCH_SIZE" => "5",
                    _ => return None,
                }
                .to_string(),
            )
        })
        .unwrap()
    }

    /// Loader that records every path it is asked for.
    struct RecordingLoader {
        calls: Mutex<Vec<PathBuf>>,
        text: String,
    }

    impl RecordingLoader {
        fn new(text: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                text: text.to_string(),
            }
        }
    }

    impl DocumentLoader for RecordingLoader {
        fn load(&self, path: &Path) -> String {
            self.calls.lock().unwrap().push(path.to_path_buf());
            self.text.clone()
        }
    }

    /// Embedder returning one small vector per input, optionally returning
    /// the wrong count or an error on selected calls.
    struct FakeEmbedder {
        calls: AtomicUsize,
        short_on_call: Option<usize>,
        fail_on_call: Option<usize>,
    }

    impl FakeEmbedder {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                short_on_call: None,
                fail_on_call: None,
            }
        }

        fn short_on(call: usize) -> Self {
            Self {
                short_on_call: Some(call),
                ..Self::ok()
            }
        }

        fn fail_on(call: usize) -> Self {
            Self {
                fail_on_call: Some(call),
                ..Self::ok()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_call == Some(call) {
                return Err(EmbeddingError::ServerError("boom".to_string()));
            }
            let count = if self.short_on_call == Some(call) {
                texts.len().saturating_sub(2)
            } else {
                texts.len()
            };
            Ok(vec![vec![0.1, 0.2, 0.3]; count])
        }
    }

    /// Index that records upserted batches, optionally failing a call.
    struct RecordingIndex {
        upserts: Mutex<Vec<Vec<UpsertRecord>>>,
        fail_on_call: Option<usize>,
        calls: AtomicUsize,
    }

    impl RecordingIndex {
        fn ok() -> Self {
            Self {
                upserts: Mutex::new(Vec::new()),
                fail_on_call: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn fail_on(call: usize) -> Self {
            Self {
                fail_on_call: Some(call),
                ..Self::ok()
            }
        }
    }

    #[async_trait]
    impl VectorIndex for RecordingIndex {
        async fn upsert(&self, records: Vec<UpsertRecord>) -> Result<(), VectorStoreError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_call == Some(call) {
                return Err(VectorStoreError::UpsertError("store down".to_string()));
            }
            self.upserts.lock().unwrap().push(records);
            Ok(())
        }
    }

    /// One `.txt` file per name; each yields exactly one chunk under the
    /// test config's large chunk size.
    fn corpus(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), "placeholder").unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_hidden_files_never_reach_the_loader() {
        let dir = corpus(&["visible.txt", ".hidden.txt", ".env"]);
        let config = test_config();
        let loader = RecordingLoader::new("some text");
        let embedder = FakeEmbedder::ok();
        let index = RecordingIndex::ok();

        let pipeline = IngestPipeline::new(&config, &loader, &embedder, &index);
        let summary = pipeline.run(dir.path()).await;

        let calls = loader.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].ends_with("visible.txt"));
        assert_eq!(summary.files_scanned, 1);
        assert_eq!(summary.chunks_upserted, 1);
    }

    #[tokio::test]
    async fn test_empty_text_file_contributes_zero_chunks() {
        let dir = corpus(&["a.txt", "b.txt"]);
        let config = test_config();
        let loader = RecordingLoader::new("");
        let embedder = FakeEmbedder::ok();
        let index = RecordingIndex::ok();

        let pipeline = IngestPipeline::new(&config, &loader, &embedder, &index);
        let summary = pipeline.run(dir.path()).await;

        assert_eq!(summary.files_scanned, 2);
        assert_eq!(summary.files_skipped, 2);
        assert_eq!(summary.chunks_total, 0);
        assert_eq!(summary.batches_total, 0);
        assert!(!summary.halted);
    }

    #[tokio::test]
    async fn test_embedding_count_mismatch_skips_batch_and_continues() {
        // 10 files -> 10 chunks -> 2 batches of 5; first embed call is short.
        let names: Vec<String> = (0..10).map(|i| format!("doc{i:02}.txt")).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let dir = corpus(&name_refs);
        let config = test_config();
        let loader = RecordingLoader::new("body");
        let embedder = FakeEmbedder::short_on(0);
        let index = RecordingIndex::ok();

        let pipeline = IngestPipeline::new(&config, &loader, &embedder, &index);
        let summary = pipeline.run(dir.path()).await;

        assert_eq!(summary.batches_total, 2);
        assert_eq!(summary.batches_skipped, 1);
        assert_eq!(summary.chunks_upserted, 5);
        assert!(!summary.halted);
        assert_eq!(index.upserts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_embedding_error_skips_batch_and_continues() {
        let names: Vec<String> = (0..10).map(|i| format!("doc{i:02}.txt")).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let dir = corpus(&name_refs);
        let config = test_config();
        let loader = RecordingLoader::new("body");
        let embedder = FakeEmbedder::fail_on(0);
        let index = RecordingIndex::ok();

        let pipeline = IngestPipeline::new(&config, &loader, &embedder, &index);
        let summary = pipeline.run(dir.path()).await;

        assert_eq!(summary.batches_skipped, 1);
        assert_eq!(summary.chunks_upserted, 5);
        assert!(!summary.halted);
    }

    #[tokio::test]
    async fn test_upsert_failure_halts_remaining_batches() {
        // 20 files -> 4 batches of 5; upsert fails on the second call.
        let names: Vec<String> = (0..20).map(|i| format!("doc{i:02}.txt")).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let dir = corpus(&name_refs);
        let config = test_config();
        let loader = RecordingLoader::new("body");
        let embedder = FakeEmbedder::ok();
        let index = RecordingIndex::fail_on(1);

        let pipeline = IngestPipeline::new(&config, &loader, &embedder, &index);
        let summary = pipeline.run(dir.path()).await;

        assert!(summary.halted);
        assert_eq!(summary.batches_total, 4);
        assert_eq!(summary.chunks_upserted, 5);
        // Batches 3 and 4 are never attempted.
        assert_eq!(embedder.call_count(), 2);
        assert_eq!(index.upserts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_chunk_ids_and_metadata_text_in_upserted_records() {
        let dir = corpus(&["guide.txt"]);
        let config = test_config();
        let loader = RecordingLoader::new("the body of the guide");
        let embedder = FakeEmbedder::ok();
        let index = RecordingIndex::ok();

        let pipeline = IngestPipeline::new(&config, &loader, &embedder, &index);
        pipeline.run(dir.path()).await;

        let upserts = index.upserts.lock().unwrap();
        let record = &upserts[0][0];
        assert_eq!(record.id, "guide.txt-chunk-0");
        assert_eq!(record.metadata.text.as_deref(), Some("the body of the guide"));
        assert_eq!(record.metadata.language, "en");
    }

    #[tokio::test]
    async fn test_traversal_order_is_stable() {
        let dir = corpus(&["b.txt", "a.txt", "c.txt"]);
        let config = test_config();
        let loader = RecordingLoader::new("text");
        let embedder = FakeEmbedder::ok();
        let index = RecordingIndex::ok();

        let pipeline = IngestPipeline::new(&config, &loader, &embedder, &index);
        pipeline.run(dir.path()).await;

        let ids: Vec<String> = index.upserts.lock().unwrap()[0]
            .iter()
            .map(|record| record.id.clone())
            .collect();
        assert_eq!(
            ids,
            vec!["a.txt-chunk-0", "b.txt-chunk-0", "c.txt-chunk-0"]
        );
    }
}
