//! `AppwriteClient` - Appwrite Databases REST client.

use anyhow::{Context, Result, anyhow, bail};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::SearchCountStore;
use super::query::Query;
use super::types::{
    AppwriteErrorResponse, CreateDocumentBody, DocumentList, SearchCountDocument,
    SearchCountRecord, UpdateDocumentBody,
};

/// Default Appwrite Cloud endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://fra.cloud.appwrite.io/v1";

/// Project header required on every request.
const PROJECT_HEADER: &str = "X-Appwrite-Project";

/// Document ID placeholder that asks the server to generate one.
const UNIQUE_ID: &str = "unique()";

/// Appwrite client bound to a single collection.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct AppwriteClient {
    /// HTTP client.
    http_client: Client,
    /// API endpoint (e.g. `https://fra.cloud.appwrite.io/v1`).
    endpoint: Url,
    /// Project ID sent in `X-Appwrite-Project`.
    project_id: String,
    /// Database ID.
    database_id: String,
    /// Collection ID.
    collection_id: String,
}

/// Builder for `AppwriteClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct AppwriteClientBuilder {
    endpoint: Option<Url>,
    project_id: Option<String>,
    database_id: Option<String>,
    collection_id: Option<String>,
    user_agent: Option<String>,
}

impl AppwriteClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            endpoint: None,
            project_id: None,
            database_id: None,
            collection_id: None,
            user_agent: None,
        }
    }

    /// Overrides the endpoint (default: Appwrite Cloud Frankfurt).
    #[must_use]
    pub fn endpoint(mut self, url: Url) -> Self {
        self.endpoint = Some(url);
        self
    }

    /// Sets the project ID (required).
    #[must_use]
    pub fn project_id(mut self, id: impl Into<String>) -> Self {
        self.project_id = Some(id.into());
        self
    }

    /// Sets the database ID (required).
    #[must_use]
    pub fn database_id(mut self, id: impl Into<String>) -> Self {
        self.database_id = Some(id.into());
        self
    }

    /// Sets the collection ID (required).
    #[must_use]
    pub fn collection_id(mut self, id: impl Into<String>) -> Self {
        self.collection_id = Some(id.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `project_id`, `database_id`, `collection_id` or `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<AppwriteClient> {
        let project_id = self.project_id.context("project_id is required")?;
        let database_id = self.database_id.context("database_id is required")?;
        let collection_id = self.collection_id.context("collection_id is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let endpoint = if let Some(url) = self.endpoint {
            url
        } else {
            let result = Url::parse(DEFAULT_ENDPOINT);
            result.context("invalid default endpoint")?
        };
        if endpoint.cannot_be_a_base() {
            bail!("endpoint cannot be used as a base URL: {endpoint}");
        }

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(AppwriteClient {
            http_client,
            endpoint,
            project_id,
            database_id,
            collection_id,
        })
    }
}

impl AppwriteClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> AppwriteClientBuilder {
        AppwriteClientBuilder::new()
    }

    /// Builds `{endpoint}/databases/{db}/collections/{col}/documents[/{id}]`.
    fn documents_url(&self, document_id: Option<&str>) -> Result<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| anyhow!("endpoint cannot be used as a base URL"))?;
            segments.pop_if_empty().extend([
                "databases",
                self.database_id.as_str(),
                "collections",
                self.collection_id.as_str(),
                "documents",
            ]);
            if let Some(id) = document_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Sends a request with the project header and decodes the JSON body.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, op: &str) -> Result<T> {
        let request = request
            .header(PROJECT_HEADER, &self.project_id)
            .build()
            .with_context(|| format!("failed to build request: {op}"))?;

        tracing::debug!(method = %request.method(), url = %request.url(), "Appwrite API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {op}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<AppwriteErrorResponse>(&body) {
                bail!(
                    "Appwrite API error (HTTP {}): type={}, message={}",
                    status,
                    error_response.error_type,
                    error_response.message,
                );
            }
            bail!("Appwrite API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {op}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        raw_result.with_context(|| format!("failed to decode JSON response: {op}"))
    }

    /// Lists documents in the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if a query cannot be serialized, the request fails,
    /// or the response cannot be decoded as `T`.
    #[instrument(skip_all)]
    pub async fn list_documents<T: DeserializeOwned>(
        &self,
        queries: &[Query],
    ) -> Result<DocumentList<T>> {
        let url = self.documents_url(None)?;
        let params = queries
            .iter()
            .map(|q| q.to_query_string().map(|s| ("queries[]", s)))
            .collect::<Result<Vec<_>>>()?;
        let request = self.http_client.get(url).query(&params);
        self.send_json(request, "listDocuments").await
    }

    /// Creates a document with a server-generated ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip_all)]
    pub async fn create_document<D, T>(&self, data: &D) -> Result<T>
    where
        D: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.documents_url(None)?;
        let body = CreateDocumentBody {
            document_id: UNIQUE_ID,
            data,
        };
        let request = self.http_client.post(url).json(&body);
        self.send_json(request, "createDocument").await
    }

    /// Updates attributes of an existing document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip_all, fields(document_id = document_id))]
    pub async fn update_document<D, T>(&self, document_id: &str, data: &D) -> Result<T>
    where
        D: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.documents_url(Some(document_id))?;
        let body = UpdateDocumentBody { data };
        let request = self.http_client.patch(url).json(&body);
        self.send_json(request, "updateDocument").await
    }
}

impl SearchCountStore for AppwriteClient {
    async fn list_search_counts(&self, queries: &[Query]) -> Result<Vec<SearchCountDocument>> {
        let list: DocumentList<SearchCountDocument> = self.list_documents(queries).await?;
        Ok(list.documents)
    }

    async fn create_search_count(
        &self,
        record: &SearchCountRecord,
    ) -> Result<SearchCountDocument> {
        self.create_document(record).await
    }

    async fn update_search_count(
        &self,
        document_id: &str,
        count: u64,
    ) -> Result<SearchCountDocument> {
        let data = serde_json::json!({ "count": count });
        self.update_document(document_id, &data).await
    }
}
