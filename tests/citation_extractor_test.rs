use quellbot::domain::{extract_citations, Citation};

#[test]
fn given_reply_with_citations_when_extracting_then_returns_document_page_pairs() {
    let text = "Die BKB betreibt einen Chatbot. (Quelle: Report, Seite 4)";

    let citations = extract_citations(text);

    assert_eq!(
        citations,
        vec![Citation {
            document: "Report".to_string(),
            page: 4
        }]
    );
}

#[test]
fn given_duplicate_citations_when_extracting_then_first_occurrence_wins_in_order() {
    let text = "... (Quelle: A, Seite 4) ... (Quelle: A, Seite 4) ... (Quelle: B, Seite 1)";

    let citations = extract_citations(text);

    assert_eq!(
        citations,
        vec![
            Citation {
                document: "A".to_string(),
                page: 4
            },
            Citation {
                document: "B".to_string(),
                page: 1
            },
        ]
    );
}

#[test]
fn given_same_document_on_different_pages_when_extracting_then_both_are_kept() {
    let text = "(Quelle: Bericht, Seite 2) und (Quelle: Bericht, Seite 9)";

    let citations = extract_citations(text);

    assert_eq!(citations.len(), 2);
    assert_eq!(citations[0].page, 2);
    assert_eq!(citations[1].page, 9);
}

#[test]
fn given_document_name_with_spaces_when_extracting_then_name_is_trimmed() {
    let text = "(Quelle: 2024_Safarik_Basler Kantonalbank_Bachelorarbeit, Seite 19)";

    let citations = extract_citations(text);

    assert_eq!(citations.len(), 1);
    assert_eq!(
        citations[0].document,
        "2024_Safarik_Basler Kantonalbank_Bachelorarbeit"
    );
    assert_eq!(citations[0].page, 19);
}

#[test]
fn given_text_without_citation_pattern_when_extracting_then_returns_empty() {
    let citations = extract_citations("Eine Antwort ohne jede Quellenangabe.");

    assert!(citations.is_empty());
}

#[test]
fn given_malformed_citations_when_extracting_then_they_are_ignored() {
    let text = "(Quelle: A Seite 4) (Quelle: B, Seite vier) (Source: C, Seite 2)";

    let citations = extract_citations(text);

    assert!(citations.is_empty());
}
