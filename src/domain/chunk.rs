/// A fixed-size slice of extracted document text, produced by the chunker
/// before it is written to the search index. Immutable once indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChunk {
    pub id: String,
    pub text: String,
    pub document_name: String,
    pub page_number: u32,
    pub sequence_index: usize,
}

impl DocumentChunk {
    pub fn new(
        text: String,
        document_name: String,
        page_number: u32,
        sequence_index: usize,
    ) -> Self {
        Self {
            id: chunk_id(&document_name, sequence_index),
            text,
            document_name,
            page_number,
            sequence_index,
        }
    }
}

/// Derives the deterministic index key for a chunk: the document name with
/// whitespace collapsed to underscores and the file extension stripped,
/// suffixed with the chunk index. Re-indexing the same document overwrites
/// the same keys instead of accumulating duplicates.
pub fn chunk_id(document_name: &str, sequence_index: usize) -> String {
    let underscored: String = document_name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    let stem = match underscored.rfind('.') {
        Some(dot) if dot > 0 => &underscored[..dot],
        _ => underscored.as_str(),
    };

    format!("{}_chunk_{}", stem, sequence_index)
}
