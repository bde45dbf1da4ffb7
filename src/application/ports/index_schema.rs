#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Int32,
}

#[derive(Debug, Clone)]
pub struct IndexField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub key: bool,
    pub searchable: bool,
    pub filterable: bool,
    pub sortable: bool,
    pub facetable: bool,
}

#[derive(Debug, Clone)]
pub struct SemanticConfiguration {
    pub name: String,
    pub title_field: &'static str,
    pub content_fields: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct IndexSchema {
    pub name: String,
    pub fields: Vec<IndexField>,
    pub semantic: Option<SemanticConfiguration>,
}

impl IndexSchema {
    /// The fixed chunk schema: key id, searchable content, filterable and
    /// sortable document name, non-searchable url, numeric page, paragraph
    /// and chunk counters.
    pub fn document_chunks(index_name: impl Into<String>) -> Self {
        Self {
            name: index_name.into(),
            fields: vec![
                IndexField {
                    name: "id",
                    kind: FieldKind::String,
                    key: true,
                    searchable: false,
                    filterable: false,
                    sortable: false,
                    facetable: false,
                },
                IndexField {
                    name: "content",
                    kind: FieldKind::String,
                    key: false,
                    searchable: true,
                    filterable: false,
                    sortable: false,
                    facetable: false,
                },
                IndexField {
                    name: "document_name",
                    kind: FieldKind::String,
                    key: false,
                    searchable: true,
                    filterable: true,
                    sortable: true,
                    facetable: true,
                },
                IndexField {
                    name: "document_url",
                    kind: FieldKind::String,
                    key: false,
                    searchable: false,
                    filterable: false,
                    sortable: false,
                    facetable: false,
                },
                IndexField {
                    name: "page_number",
                    kind: FieldKind::Int32,
                    key: false,
                    searchable: false,
                    filterable: true,
                    sortable: true,
                    facetable: true,
                },
                IndexField {
                    name: "paragraph_number",
                    kind: FieldKind::Int32,
                    key: false,
                    searchable: false,
                    filterable: true,
                    sortable: true,
                    facetable: false,
                },
                IndexField {
                    name: "chunk_number",
                    kind: FieldKind::Int32,
                    key: false,
                    searchable: false,
                    filterable: true,
                    sortable: true,
                    facetable: false,
                },
            ],
            semantic: Some(SemanticConfiguration {
                name: "default".to_string(),
                title_field: "document_name",
                content_fields: vec!["content"],
            }),
        }
    }

    pub fn without_semantic(mut self) -> Self {
        self.semantic = None;
        self
    }
}
