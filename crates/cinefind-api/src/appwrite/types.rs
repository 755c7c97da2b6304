//! Appwrite request/response types and the search-count record shape.

use serde::{Deserialize, Deserializer, Serialize};

/// Response from the list-documents endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList<T> {
    /// Total number of documents matching the queries.
    #[serde(default)]
    pub total: u64,
    /// Documents on this page.
    #[serde(default = "Vec::new")]
    pub documents: Vec<T>,
}

/// Appwrite error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteErrorResponse {
    /// Human-readable error message.
    pub message: String,
    /// HTTP-like error code.
    #[serde(default)]
    pub code: u16,
    /// Machine-readable error type (e.g. `document_not_found`).
    #[serde(default, rename = "type")]
    pub error_type: String,
}

/// Body of a create-document request.
#[derive(Debug, Serialize)]
pub(crate) struct CreateDocumentBody<'a, D> {
    /// Document ID, or `unique()` to let the server generate one.
    #[serde(rename = "documentId")]
    pub document_id: &'a str,
    /// Document attributes.
    pub data: &'a D,
}

/// Body of an update-document request.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateDocumentBody<'a, D> {
    /// Attributes to change.
    pub data: &'a D,
}

/// Attributes of a search-count record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCountRecord {
    /// Exact search term the record is keyed by.
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    /// Number of successful searches for the term.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub count: u64,
    /// TMDB ID of the representative movie (first result).
    #[serde(default)]
    pub movie_id: Option<u64>,
    /// Full poster URL of the representative movie.
    #[serde(default)]
    pub poster_url: Option<String>,
    /// Title of the representative movie.
    #[serde(default)]
    pub title: Option<String>,
}

/// A stored search-count document (`$id` plus attributes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCountDocument {
    /// Appwrite document ID.
    #[serde(rename = "$id")]
    pub id: String,
    /// Record attributes.
    #[serde(flatten)]
    pub record: SearchCountRecord,
}

/// Reads a nullable integer attribute, mapping `null` to zero.
fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}
