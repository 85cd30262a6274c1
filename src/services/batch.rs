//! Batch assembly over the flattened chunk sequence.

use crate::models::ChunkRecord;

/// Slice records into contiguous batches of at most `batch_size`, preserving
/// order. The global sequence is sliced as a whole, so a batch may mix chunks
/// from different files; the last batch may be shorter.
///
/// `batch_size` is assumed positive (configuration contract).
pub fn assemble_batches(records: Vec<ChunkRecord>, batch_size: usize) -> Vec<Vec<ChunkRecord>> {
    let mut batches = Vec::with_capacity(records.len().div_ceil(batch_size.max(1)));
    let mut batch = Vec::with_capacity(batch_size.min(records.len()));

    for record in records {
        batch.push(record);
        if batch.len() == batch_size {
            batches.push(std::mem::replace(&mut batch, Vec::with_capacity(batch_size)));
        }
    }

    if !batch.is_empty() {
        batches.push(batch);
    }

    batches
}
