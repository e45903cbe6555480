use serde::{Deserialize, Serialize};

/// A stored book.
///
/// Every field but `id` may be absent; absent fields are left out of the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Storage-assigned identifier (24 hex digits)
    pub id: String,
    /// Title of the book
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// URL of the cover art
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Request model for creating a new book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl BookDraft {
    pub fn new(name: &str, img: &str, summary: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            img: Some(img.to_string()),
            summary: Some(summary.to_string()),
        }
    }

    /// Attach an identifier, producing the stored form.
    pub fn into_book(self, id: String) -> Book {
        Book {
            id,
            name: self.name,
            img: self.img,
            summary: self.summary,
        }
    }
}

/// Partial update: only the fields present are replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.img.is_none() && self.summary.is_none()
    }

    /// Present fields paired with their names, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (BookField, &str)> {
        [
            (BookField::Name, self.name.as_deref()),
            (BookField::Img, self.img.as_deref()),
            (BookField::Summary, self.summary.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
    }

    pub fn apply_to(&self, book: &mut Book) {
        if let Some(name) = &self.name {
            book.name = Some(name.clone());
        }
        if let Some(img) = &self.img {
            book.img = Some(img.clone());
        }
        if let Some(summary) = &self.summary {
            book.summary = Some(summary.clone());
        }
    }
}

/// Queryable book fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Name,
    Img,
    Summary,
}

impl BookField {
    /// Field name as stored in the document.
    pub fn as_str(self) -> &'static str {
        match self {
            BookField::Name => "name",
            BookField::Img => "img",
            BookField::Summary => "summary",
        }
    }

    pub fn value_of(self, book: &Book) -> Option<&str> {
        match self {
            BookField::Name => book.name.as_deref(),
            BookField::Img => book.img.as_deref(),
            BookField::Summary => book.summary.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_fields_are_omitted() {
        let book = BookDraft {
            name: Some("X".to_string()),
            ..BookDraft::default()
        }
        .into_book("abc".to_string());

        assert_eq!(
            serde_json::to_value(&book).unwrap(),
            json!({"id": "abc", "name": "X"})
        );
    }

    #[test]
    fn draft_ignores_unknown_fields() {
        let draft: BookDraft =
            serde_json::from_value(json!({"name": "X", "author": "nobody"})).unwrap();
        assert_eq!(draft.name.as_deref(), Some("X"));
        assert!(draft.img.is_none());
    }

    #[test]
    fn draft_rejects_non_string_fields() {
        assert!(serde_json::from_value::<BookDraft>(json!({"name": ["X"]})).is_err());
    }

    #[test]
    fn patch_replaces_only_present_fields() {
        let mut book = BookDraft::new("X", "Y", "Z").into_book("abc".to_string());
        let patch = BookPatch {
            summary: Some("new".to_string()),
            ..BookPatch::default()
        };

        patch.apply_to(&mut book);

        assert_eq!(book.name.as_deref(), Some("X"));
        assert_eq!(book.img.as_deref(), Some("Y"));
        assert_eq!(book.summary.as_deref(), Some("new"));
        assert_eq!(
            patch.fields().collect::<Vec<_>>(),
            vec![(BookField::Summary, "new")]
        );
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(BookPatch::default().is_empty());
        let patch: BookPatch = serde_json::from_value(json!({"img": "u"})).unwrap();
        assert!(!patch.is_empty());
    }
}
