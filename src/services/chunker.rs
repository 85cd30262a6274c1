//! Text chunking with overlap for embedding.

/// Splits raw text into an ordered sequence of overlapping windows bounded
/// by a maximum size (in characters).
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Create a chunker. `overlap` must be smaller than `chunk_size`
    /// (enforced by the configuration contract).
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Chunk text into consecutive windows of at most `chunk_size` characters.
    ///
    /// Windows prefer to end on a natural boundary (paragraph, newline,
    /// sentence, word) found near the size limit, falling back to a hard cut.
    /// Each window starts up to `overlap` characters before the previous
    /// window's end, so context spanning a boundary lands in both chunks.
    /// Empty input yields an empty sequence. Deterministic.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();

        if total <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < total {
            let target_end = (start + self.chunk_size).min(total);
            let end = self.find_break_point(&chars, target_end, total);

            chunks.push(chars[start..end].iter().collect());

            if end >= total {
                break;
            }

            // Step back into the emitted window so the trailing context is
            // repeated; the max() guarantees forward progress.
            start = end.saturating_sub(self.overlap).max(start + 1);
        }

        chunks
    }

    /// Find a natural break point near the target end position.
    fn find_break_point(&self, chars: &[char], target_end: usize, total: usize) -> usize {
        if target_end >= total {
            return total;
        }

        // Only search the last 20% of the window; a break earlier than that
        // wastes too much of the size budget.
        let search_start = target_end.saturating_sub(self.chunk_size / 5);
        let search_range = &chars[search_start..target_end];

        // Priority: paragraph break > newline > sentence end > word break.
        let mut paragraph_break = None;
        let mut last_newline = None;
        let mut last_sentence = None;
        let mut last_space = None;

        for (i, c) in search_range.iter().enumerate() {
            let pos = search_start + i;
            match c {
                '\n' => {
                    if i > 0 && search_range.get(i - 1) == Some(&'\n') {
                        paragraph_break = Some(pos + 1);
                    }
                    last_newline = Some(pos + 1);
                }
                '.' | '!' | '?' => {
                    // Look past the window edge so a terminator on the last
                    // position still counts as a sentence end.
                    if chars.get(pos + 1).is_some_and(|c| c.is_whitespace()) {
                        last_sentence = Some(pos + 1);
                    }
                }
                ' ' | '\t' => {
                    last_space = Some(pos + 1);
                }
                _ => {}
            }
        }

        paragraph_break
            .or(last_newline)
            .or(last_sentence)
            .or(last_space)
            .unwrap_or(target_end)
    }
}
