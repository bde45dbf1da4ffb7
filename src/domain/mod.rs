mod chunk;
mod citation;
mod passage;
mod record;

pub use chunk::{chunk_id, DocumentChunk};
pub use citation::{extract_citations, Citation};
pub use passage::RetrievedPassage;
pub use record::IndexedRecord;
