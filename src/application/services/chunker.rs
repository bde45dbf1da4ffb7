use std::sync::LazyLock;

use regex::Regex;

static PAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[Seite (\d+)\]").expect("page marker pattern must compile"));

/// One windowed slice of source text with the page it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkSlice {
    pub text: String,
    pub page: u32,
}

/// Splits extracted document text into fixed-size, overlapping windows.
/// Page-aware when the text carries `[Seite N]` markers; otherwise page
/// numbers are estimated by linear interpolation over the character offset.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    /// Sizes are clamped so every window advances the cursor: the window is
    /// at least one character and the overlap stays below the window size.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    /// Output order is append order over the source text. Window starts are
    /// strictly increasing; the loop terminates once a window end reaches the
    /// text length, so a tail shorter than the overlap cannot spin forever.
    pub fn chunk(&self, text: &str, start_page: u32, total_pages: u32) -> Vec<ChunkSlice> {
        if text.is_empty() {
            return Vec::new();
        }

        if PAGE_MARKER.is_match(text) {
            self.chunk_paginated(text)
        } else {
            self.chunk_unpaginated(text, start_page, total_pages)
        }
    }

    fn chunk_paginated(&self, text: &str) -> Vec<ChunkSlice> {
        let mut chunks = Vec::new();

        let markers: Vec<(usize, usize, u32)> = PAGE_MARKER
            .captures_iter(text)
            .filter_map(|captures| {
                let whole = captures.get(0)?;
                let page: u32 = captures[1].parse().ok()?;
                Some((whole.start(), whole.end(), page))
            })
            .collect();

        for (i, &(_, body_start, page)) in markers.iter().enumerate() {
            let body_end = markers
                .get(i + 1)
                .map(|&(next_start, _, _)| next_start)
                .unwrap_or(text.len());
            let page_text = text[body_start..body_end].trim();

            if page_text.is_empty() {
                continue;
            }

            for window in self.windows(page_text) {
                chunks.push(ChunkSlice {
                    text: window,
                    page,
                });
            }
        }

        chunks
    }

    fn chunk_unpaginated(&self, text: &str, start_page: u32, total_pages: u32) -> Vec<ChunkSlice> {
        let chars: Vec<char> = text.chars().collect();
        let total_len = chars.len();
        let mut chunks = Vec::new();
        let mut start = 0usize;

        loop {
            let end = (start + self.chunk_size).min(total_len);
            let progress = start as f64 / total_len as f64;
            let span = total_pages.saturating_sub(start_page);
            let page = start_page + (progress * span as f64).floor() as u32;

            chunks.push(ChunkSlice {
                text: chars[start..end].iter().collect(),
                page,
            });

            if end >= total_len {
                break;
            }
            start = end - self.overlap;
        }

        chunks
    }

    fn windows(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let total_len = chars.len();
        let mut windows = Vec::new();
        let mut start = 0usize;

        loop {
            let end = (start + self.chunk_size).min(total_len);
            windows.push(chars[start..end].iter().collect());

            if end >= total_len {
                break;
            }
            start = end - self.overlap;
        }

        windows
    }
}
