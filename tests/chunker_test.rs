use quellbot::application::services::Chunker;

const CHUNK_SIZE: usize = 10;
const OVERLAP: usize = 2;

#[test]
fn given_empty_text_when_chunking_then_returns_no_chunks() {
    let chunker = Chunker::new(CHUNK_SIZE, OVERLAP);

    let chunks = chunker.chunk("", 1, 1);

    assert!(chunks.is_empty());
}

#[test]
fn given_text_shorter_than_chunk_size_when_chunking_then_returns_single_chunk() {
    let chunker = Chunker::new(CHUNK_SIZE, OVERLAP);
    let text = "short";

    let chunks = chunker.chunk(text, 1, 1);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "short");
    assert_eq!(chunks[0].page, 1);
}

#[test]
fn given_long_text_when_chunking_then_chunk_count_matches_window_formula() {
    let chunker = Chunker::new(CHUNK_SIZE, OVERLAP);
    let text: String = "x".repeat(42);

    let chunks = chunker.chunk(&text, 1, 1);

    // ceil((len - overlap) / (chunk_size - overlap))
    let expected = (42 - OVERLAP).div_ceil(CHUNK_SIZE - OVERLAP);
    assert_eq!(chunks.len(), expected);
}

#[test]
fn given_overlapping_chunks_when_reassembled_then_they_cover_the_original_text() {
    let chunker = Chunker::new(CHUNK_SIZE, OVERLAP);
    let text = "The quick brown fox jumps over the lazy dog again.";

    let chunks = chunker.chunk(text, 1, 1);

    let mut reassembled = chunks[0].text.clone();
    for chunk in &chunks[1..] {
        let tail: String = chunk.text.chars().skip(OVERLAP).collect();
        reassembled.push_str(&tail);
    }
    assert_eq!(reassembled, text);
}

#[test]
fn given_tail_shorter_than_overlap_when_chunking_then_chunking_terminates() {
    let chunker = Chunker::new(CHUNK_SIZE, OVERLAP);
    // 11 chars: the second window covers only one new char beyond the first.
    let text = "abcdefghijk";

    let chunks = chunker.chunk(text, 1, 1);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text, "abcdefghij");
    assert_eq!(chunks[1].text, "ijk");
}

#[test]
fn given_zero_chunk_size_when_chunking_then_window_is_clamped_and_terminates() {
    let chunker = Chunker::new(0, 200);

    let chunks = chunker.chunk("abc", 1, 1);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].text, "a");
    assert_eq!(chunks[1].text, "b");
    assert_eq!(chunks[2].text, "c");
}

#[test]
fn given_overlap_at_least_chunk_size_when_chunking_then_cursor_still_advances() {
    let chunker = Chunker::new(4, 9);

    // Overlap clamps to 3, so each window advances by one character.
    let chunks = chunker.chunk("abcdefgh", 1, 1);

    assert_eq!(chunks.len(), 5);
    assert_eq!(chunks[0].text, "abcd");
    assert_eq!(chunks[4].text, "efgh");
}

#[test]
fn given_text_with_page_markers_when_chunking_then_chunks_carry_marked_pages() {
    let chunker = Chunker::new(100, 10);
    let text = "[Seite 1]\nErster Seitentext.\n\n[Seite 2]\nZweiter Seitentext.";

    let chunks = chunker.chunk(text, 1, 2);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].page, 1);
    assert!(chunks[0].text.contains("Erster Seitentext."));
    assert_eq!(chunks[1].page, 2);
    assert!(chunks[1].text.contains("Zweiter Seitentext."));
}

#[test]
fn given_marked_page_longer_than_chunk_size_when_chunking_then_page_is_windowed() {
    let chunker = Chunker::new(CHUNK_SIZE, OVERLAP);
    let long_page = "y".repeat(25);
    let text = format!("[Seite 7]\n{}", long_page);

    let chunks = chunker.chunk(&text, 1, 7);

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert_eq!(chunk.page, 7);
        assert!(chunk.text.chars().count() <= CHUNK_SIZE);
    }
}

#[test]
fn given_unmarked_text_when_chunking_then_pages_are_estimated_by_offset() {
    let chunker = Chunker::new(100, 0);
    let text: String = "z".repeat(400);

    let chunks = chunker.chunk(&text, 1, 5);

    assert_eq!(chunks.len(), 4);
    // Linear interpolation of the start offset between page 1 and 5.
    assert_eq!(chunks[0].page, 1);
    assert_eq!(chunks[1].page, 2);
    assert_eq!(chunks[2].page, 3);
    assert_eq!(chunks[3].page, 4);
}

#[test]
fn given_any_text_when_chunking_then_chunks_appear_in_source_order() {
    let chunker = Chunker::new(CHUNK_SIZE, OVERLAP);
    let text = "0123456789abcdefghijklmnop";

    let chunks = chunker.chunk(text, 1, 1);

    let positions: Vec<usize> = chunks
        .iter()
        .map(|c| text.find(&c.text).expect("chunk must come from source"))
        .collect();
    for pair in positions.windows(2) {
        assert!(pair[0] < pair[1], "chunk starts must strictly increase");
    }
}
