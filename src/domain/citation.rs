use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// A (document, page) pair substantiating a claim in generated text.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Citation {
    pub document: String,
    pub page: u32,
}

static CITATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(Quelle: ([^,]+), Seite (\d+)\)").expect("citation pattern must compile")
});

/// Scans a model reply for citations in the form
/// `(Quelle: Dokumentname, Seite N)`. Duplicate (document, page) pairs are
/// dropped; the first occurrence wins and insertion order is preserved.
pub fn extract_citations(text: &str) -> Vec<Citation> {
    let mut citations: Vec<Citation> = Vec::new();

    for captures in CITATION_PATTERN.captures_iter(text) {
        let document = captures[1].trim().to_string();
        let page: u32 = match captures[2].parse() {
            Ok(page) => page,
            Err(_) => continue,
        };

        if !citations
            .iter()
            .any(|c| c.document == document && c.page == page)
        {
            citations.push(Citation { document, page });
        }
    }

    citations
}
