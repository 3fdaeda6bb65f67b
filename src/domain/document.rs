//! Item payloads and per-request response metadata

use super::errors::NosqlError;
use super::ids::ItemId;
use super::result::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the identifier field every stored document carries
pub const ID_FIELD: &str = "id";

/// A stored document: a JSON object mapping field names to values
pub type Document = Map<String, Value>;

/// Serializes an item into a document suitable for storage
///
/// The item must serialize to a JSON object with a string `id` field.
///
/// # Examples
///
/// ```
/// use cosmos_nosql::domain::document::to_document;
/// use serde_json::json;
///
/// let doc = to_document(&json!({"id": "1", "email": "a@b.com"})).unwrap();
/// assert_eq!(doc["email"], "a@b.com");
///
/// assert!(to_document(&json!(["not", "an", "object"])).is_err());
/// assert!(to_document(&json!({"email": "a@b.com"})).is_err());
/// ```
pub fn to_document<T: Serialize + ?Sized>(item: &T) -> Result<Document> {
    match serde_json::to_value(item)? {
        Value::Object(document) => {
            document_id(&document)?;
            Ok(document)
        }
        other => Err(NosqlError::Serialization(format!(
            "Item must serialize to a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Extracts the `id` of a document
pub fn document_id(document: &Document) -> Result<ItemId> {
    match document.get(ID_FIELD) {
        Some(Value::String(id)) => ItemId::new(id.as_str()).map_err(|e| {
            NosqlError::Serialization(format!("Item has an invalid '{ID_FIELD}' field: {e}"))
        }),
        Some(other) => Err(NosqlError::Serialization(format!(
            "Item field '{ID_FIELD}' must be a string, got {}",
            json_kind(other)
        ))),
        None => Err(NosqlError::Serialization(format!(
            "Item is missing the '{ID_FIELD}' field"
        ))),
    }
}

/// Decodes a document into a caller-chosen shape
pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T> {
    serde_json::from_value(Value::Object(document)).map_err(|e| {
        NosqlError::Serialization(format!("Failed to decode document: {e}"))
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Metadata the service reports for every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDiagnostics {
    /// HTTP status code of the response
    pub status: u16,

    /// Service-assigned activity identifier (`x-ms-activity-id`)
    pub activity_id: Option<String>,

    /// Request units consumed (`x-ms-request-charge`)
    pub request_charge: Option<f64>,
}

impl ResponseDiagnostics {
    /// Builds diagnostics from raw header values
    pub fn new(status: u16, activity_id: Option<&str>, request_charge: Option<&str>) -> Self {
        Self {
            status,
            activity_id: activity_id.map(str::to_string),
            request_charge: request_charge.and_then(|c| c.trim().parse().ok()),
        }
    }

    /// Request charge, or 0 when the service did not report one
    pub fn charge(&self) -> f64 {
        self.request_charge.unwrap_or_default()
    }

    /// Activity id, or `-` when the service did not report one
    pub fn activity(&self) -> &str {
        self.activity_id.as_deref().unwrap_or("-")
    }
}

/// Result of an idempotent create
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// The resource was created by this call
    Created(ResponseDiagnostics),

    /// The resource already existed; nothing was changed
    AlreadyExists,
}

impl CreateOutcome {
    /// Returns `true` if this call created the resource
    pub fn is_created(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }

    /// Diagnostics of the create response, if the resource was created
    pub fn diagnostics(&self) -> Option<&ResponseDiagnostics> {
        match self {
            CreateOutcome::Created(d) => Some(d),
            CreateOutcome::AlreadyExists => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Person {
        id: String,
        email: String,
        name: String,
    }

    #[test]
    fn test_to_document_from_struct() {
        let person = Person {
            id: "X".to_string(),
            email: "a@b.com".to_string(),
            name: "John Doe".to_string(),
        };

        let doc = to_document(&person).unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(document_id(&doc).unwrap().as_str(), "X");
    }

    #[test]
    fn test_to_document_rejects_non_string_id() {
        let err = to_document(&json!({"id": 42})).unwrap_err();
        assert!(matches!(err, NosqlError::Serialization(_)));
        assert!(err.to_string().contains("must be a string"));
    }

    #[test]
    fn test_to_document_rejects_scalar() {
        let err = to_document(&"just a string").unwrap_err();
        assert!(err.to_string().contains("a string"));
    }

    #[test]
    fn test_from_document_decodes_shape() {
        let doc = to_document(&json!({
            "id": "X",
            "email": "a@b.com",
            "name": "John Doe",
            "_etag": "\"0000\""
        }))
        .unwrap();

        let person: Person = from_document(doc).unwrap();
        assert_eq!(person.name, "John Doe");
    }

    #[test]
    fn test_from_document_missing_field() {
        let doc = to_document(&json!({"id": "X"})).unwrap();
        let err = from_document::<Person>(doc).unwrap_err();
        assert!(matches!(err, NosqlError::Serialization(_)));
    }

    #[test]
    fn test_diagnostics_parsing() {
        let d = ResponseDiagnostics::new(201, Some("abc-123"), Some("5.71"));
        assert_eq!(d.status, 201);
        assert_eq!(d.activity(), "abc-123");
        assert!((d.charge() - 5.71).abs() < f64::EPSILON);

        let d = ResponseDiagnostics::new(200, None, Some("not-a-number"));
        assert_eq!(d.request_charge, None);
        assert_eq!(d.activity(), "-");
        assert_eq!(d.charge(), 0.0);
    }

    #[test]
    fn test_create_outcome() {
        let created = CreateOutcome::Created(ResponseDiagnostics::new(201, None, None));
        assert!(created.is_created());
        assert_eq!(created.diagnostics().map(|d| d.status), Some(201));
        assert!(!CreateOutcome::AlreadyExists.is_created());
        assert!(CreateOutcome::AlreadyExists.diagnostics().is_none());
    }
}
