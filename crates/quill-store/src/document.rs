use serde_json::Value;

use quill_types::DocumentId;

/// Field holding a document's native identifier.
pub const ID_FIELD: &str = "_id";

/// A schemaless stored document.
pub type Document = serde_json::Map<String, Value>;

/// Selects documents within a collection.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// Matches the document with this native identifier.
    Id(DocumentId),
    /// Matches documents whose top-level `field` equals `value`.
    Eq { field: String, value: Value },
}

impl Filter {
    /// The empty filter.
    pub fn all() -> Self {
        Self::All
    }

    pub fn by_id(id: DocumentId) -> Self {
        Self::Id(id)
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns `true` if `doc` is selected by this filter.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Id(id) => document_id(doc) == Some(*id),
            Self::Eq { field, value } => doc.get(field) == Some(value),
        }
    }
}

/// Read the native identifier of a stored document, if it has a valid one.
pub fn document_id(doc: &Document) -> Option<DocumentId> {
    doc.get(ID_FIELD)
        .and_then(Value::as_str)
        .and_then(|s| DocumentId::from_hex(s).ok())
}

/// Acknowledgment of a single-document insert.
///
/// The inserted identifier is reported in the backend's own representation;
/// callers must convert it before use.
#[derive(Clone, Debug, PartialEq)]
pub struct InsertAck {
    pub inserted_id: Value,
}

/// Acknowledgment of a single-document replace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplaceAck {
    /// Documents selected by the identifier (0 or 1).
    pub matched: u64,
    /// Documents whose body actually changed (0 or 1).
    pub modified: u64,
}

/// Acknowledgment of a single-document delete.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeleteAck {
    /// Documents removed (0 or 1).
    pub deleted: u64,
}
