use serde_json::{Map, Value};

use crate::domain::RetrievedPassage;

const UNKNOWN_DOCUMENT: &str = "Unbekanntes Dokument";

/// Ordered candidate field names for each canonical passage attribute.
/// Indexes built elsewhere disagree on naming (`document_name` vs `title` vs
/// `filename`), so resolution walks the candidates in priority order and
/// falls back to the first field whose name contains a matching keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    pub content: Vec<String>,
    pub title: Vec<String>,
    pub page: Vec<String>,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            content: vec!["content".into(), "text".into()],
            title: vec![
                "filename".into(),
                "title".into(),
                "document_name".into(),
                "name".into(),
            ],
            page: vec!["page_number".into(), "page".into(), "filepath".into()],
        }
    }
}

/// The concrete field names a mapping resolved to for one hit shape.
#[derive(Debug, Clone, serde::Serialize, PartialEq)]
pub struct ResolvedFields {
    pub content_field: Option<String>,
    pub title_field: Option<String>,
    pub page_field: Option<String>,
}

impl FieldMapping {
    /// Replaces the highest-priority candidate per attribute; the previous
    /// candidates stay as fallbacks for hits that lack the new field.
    pub fn override_fields(
        &mut self,
        content_field: String,
        title_field: Option<String>,
        page_field: Option<String>,
    ) {
        self.content.insert(0, content_field);
        if let Some(title) = title_field {
            self.title.insert(0, title);
        }
        if let Some(page) = page_field {
            self.page.insert(0, page);
        }
    }

    /// The union of all candidate names, used as the `select` list of the
    /// primary query.
    pub fn select_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        for candidate in self
            .content
            .iter()
            .chain(self.title.iter())
            .chain(self.page.iter())
        {
            if !fields.contains(candidate) {
                fields.push(candidate.clone());
            }
        }
        fields
    }

    pub fn resolve(&self, field_names: &[String]) -> ResolvedFields {
        ResolvedFields {
            content_field: pick(field_names, &self.content, &["content", "text"]),
            title_field: pick(field_names, &self.title, &["name", "title"]),
            page_field: pick(field_names, &self.page, &["page"]),
        }
    }

    /// Maps one raw hit onto the canonical passage shape. Hits without any
    /// resolvable content field map to an empty passage the caller skips.
    pub fn project(&self, fields: &Map<String, Value>) -> RetrievedPassage {
        let names: Vec<String> = fields.keys().cloned().collect();
        let resolved = self.resolve(&names);

        let content = resolved
            .content_field
            .and_then(|f| fields.get(&f))
            .map(value_as_text)
            .unwrap_or_default();

        let document_name = resolved
            .title_field
            .and_then(|f| fields.get(&f))
            .map(value_as_text)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_DOCUMENT.to_string());

        let page_number = resolved
            .page_field
            .and_then(|f| fields.get(&f))
            .and_then(value_as_page)
            .unwrap_or(1);

        RetrievedPassage {
            content,
            document_name,
            page_number,
        }
    }
}

fn pick(field_names: &[String], candidates: &[String], keywords: &[&str]) -> Option<String> {
    for candidate in candidates {
        if field_names.iter().any(|f| f == candidate) {
            return Some(candidate.clone());
        }
    }

    field_names
        .iter()
        .find(|f| {
            let lower = f.to_lowercase();
            keywords.iter().any(|k| lower.contains(k))
        })
        .cloned()
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn value_as_page(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().map(|p| p as u32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
