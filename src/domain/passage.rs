/// A read projection of one indexed record, produced per search query and
/// discarded after the chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedPassage {
    pub content: String,
    pub document_name: String,
    pub page_number: u32,
}
