//! Appwrite Databases client module.
//!
//! Lists, creates and updates documents in a single collection over the
//! Appwrite REST API. The search-count analytics records live there.

mod api;
mod client;
mod query;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalSearchCountStore, SearchCountStore};
#[allow(clippy::module_name_repetitions)]
pub use client::{AppwriteClient, AppwriteClientBuilder, DEFAULT_ENDPOINT};
pub use query::Query;
pub use types::{AppwriteErrorResponse, DocumentList, SearchCountDocument, SearchCountRecord};
