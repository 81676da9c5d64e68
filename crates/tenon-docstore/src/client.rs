//! Cosmos DB REST client for a single container.

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use crate::auth::{auth_header, request_date};
use crate::config::DocStoreConfig;
use crate::error::{DocStoreError, DocStoreResult};

/// REST API version pinned for all requests.
const API_VERSION: &str = "2018-12-31";

/// Provisioned throughput for a freshly created container (RU/s).
const CONTAINER_THROUGHPUT: &str = "400";

/// A stored document: an arbitrary JSON object keyed by its `id` field.
pub type Document = serde_json::Map<String, Value>;

/// Error body returned by the store.
#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Response shape of a document query page.
#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(rename = "Documents", default)]
    documents: Vec<Document>,
}

/// Client for one Cosmos DB container, partition key path `/id`.
///
/// Cheap to clone; the inner reqwest client is reference counted.
#[derive(Clone)]
pub struct DocStoreClient {
    http: reqwest::Client,
    config: DocStoreConfig,
}

impl std::fmt::Debug for DocStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocStoreClient")
            .field("config", &self.config)
            .finish()
    }
}

impl DocStoreClient {
    /// Create a client after validating the configuration.
    pub fn new(config: DocStoreConfig) -> DocStoreResult<Self> {
        config.validate()?;
        Ok(Self {
            http: reqwest::Client::new(),
            config,
        })
    }

    fn collection_link(&self) -> String {
        format!(
            "dbs/{}/colls/{}",
            self.config.database, self.config.container
        )
    }

    fn document_link(&self, id: &str) -> String {
        format!("{}/docs/{}", self.collection_link(), id)
    }

    /// Build a signed request for the given resource.
    fn signed(
        &self,
        method: Method,
        url: String,
        resource_type: &str,
        resource_link: &str,
    ) -> DocStoreResult<reqwest::RequestBuilder> {
        let date = request_date();
        let authorization = auth_header(
            self.config.key.expose_secret(),
            method.as_str(),
            resource_type,
            resource_link,
            &date,
        )?;
        Ok(self
            .http
            .request(method, url)
            .header("authorization", authorization)
            .header("x-ms-date", date)
            .header("x-ms-version", API_VERSION))
    }

    /// Translate a non-success response into a [`DocStoreError`].
    async fn error_from(response: reqwest::Response) -> DocStoreError {
        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => DocStoreError::NotFound,
            StatusCode::PRECONDITION_FAILED => DocStoreError::Conflict,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DocStoreError::Unauthorized,
            _ => {
                let body = response
                    .json::<StoreErrorBody>()
                    .await
                    .unwrap_or(StoreErrorBody {
                        code: String::new(),
                        message: String::new(),
                    });
                DocStoreError::Api {
                    status: status.as_u16(),
                    message: if body.message.is_empty() {
                        body.code
                    } else {
                        body.message
                    },
                }
            }
        }
    }

    /// Create the database and container if they do not exist yet.
    ///
    /// Both creates treat 409 Conflict (already present) as success, so this
    /// is safe to run unconditionally at startup.
    #[instrument(skip(self), fields(database = %self.config.database, container = %self.config.container))]
    pub async fn ensure_container(&self) -> DocStoreResult<()> {
        let url = format!("{}/dbs", self.config.base_url());
        let response = self
            .signed(Method::POST, url, "dbs", "")?
            .json(&json!({ "id": self.config.database }))
            .send()
            .await?;
        match response.status() {
            StatusCode::CREATED => debug!("Database created"),
            StatusCode::CONFLICT => debug!("Database already exists"),
            _ => return Err(Self::error_from(response).await),
        }

        let db_link = format!("dbs/{}", self.config.database);
        let url = format!("{}/{}/colls", self.config.base_url(), db_link);
        let response = self
            .signed(Method::POST, url, "colls", &db_link)?
            .header("x-ms-offer-throughput", CONTAINER_THROUGHPUT)
            .json(&json!({
                "id": self.config.container,
                "partitionKey": { "paths": ["/id"], "kind": "Hash" },
            }))
            .send()
            .await?;
        match response.status() {
            StatusCode::CREATED => debug!("Container created"),
            StatusCode::CONFLICT => debug!("Container already exists"),
            _ => return Err(Self::error_from(response).await),
        }
        Ok(())
    }

    /// Create or fully replace the document keyed by its `id` field.
    ///
    /// Returns the document as stored, including server-assigned system
    /// fields such as `_etag`.
    #[instrument(skip(self, document))]
    pub async fn upsert(&self, document: Document) -> DocStoreResult<Document> {
        let id = required_id(&document)?.to_string();
        let link = self.collection_link();
        let url = format!("{}/{}/docs", self.config.base_url(), link);
        let response = self
            .signed(Method::POST, url, "docs", &link)?
            .header("x-ms-documentdb-is-upsert", "true")
            .header("x-ms-documentdb-partitionkey", partition_key(&id))
            .json(&document)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    /// Point read by document id (which is also the partition key).
    #[instrument(skip(self))]
    pub async fn read(&self, id: &str) -> DocStoreResult<Document> {
        let link = self.document_link(id);
        let url = format!("{}/{}", self.config.base_url(), link);
        let response = self
            .signed(Method::GET, url, "docs", &link)?
            .header("x-ms-documentdb-partitionkey", partition_key(id))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    /// Fetch every document in the container via a cross-partition scan.
    ///
    /// O(n) in the container size; follows continuation tokens until the
    /// feed is exhausted.
    #[instrument(skip(self))]
    pub async fn query_all(&self) -> DocStoreResult<Vec<Document>> {
        self.query(json!({ "query": "SELECT * FROM c", "parameters": [] }))
            .await
    }

    /// First document whose top-level `field` equals `value`, if any.
    ///
    /// This is a non-unique filtered lookup: multiple documents may match
    /// and only the first one the scan yields is returned. Callers that
    /// need unique-key semantics must use [`read`](Self::read).
    #[instrument(skip(self))]
    pub async fn find_by_field(&self, field: &str, value: &str) -> DocStoreResult<Document> {
        // Field names cannot be bound as query parameters; restrict them to
        // identifier characters so caller input cannot splice into the query.
        if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(DocStoreError::InvalidDocument(format!(
                "invalid field name: {field:?}"
            )));
        }
        let query = json!({
            "query": format!("SELECT * FROM c WHERE c.{field} = @value"),
            "parameters": [{ "name": "@value", "value": value }],
        });
        let mut matches = self.query(query).await?;
        if matches.is_empty() {
            return Err(DocStoreError::NotFound);
        }
        if matches.len() > 1 {
            warn!(field, value, count = matches.len(), "Filtered lookup matched multiple documents");
        }
        Ok(matches.swap_remove(0))
    }

    /// Run a query against the document feed, draining all pages.
    async fn query(&self, query: Value) -> DocStoreResult<Vec<Document>> {
        let link = self.collection_link();
        let url = format!("{}/{}/docs", self.config.base_url(), link);
        let body = serde_json::to_vec(&query)?;

        let mut documents = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let mut request = self
                .signed(Method::POST, url.clone(), "docs", &link)?
                .header("content-type", "application/query+json")
                .header("x-ms-documentdb-isquery", "true")
                .header("x-ms-documentdb-query-enablecrosspartition", "true")
                .body(body.clone());
            if let Some(token) = &continuation {
                request = request.header("x-ms-continuation", token);
            }
            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(Self::error_from(response).await);
            }
            continuation = response
                .headers()
                .get("x-ms-continuation")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let page: QueryPage = response.json().await?;
            documents.extend(page.documents);
            if continuation.is_none() {
                break;
            }
        }
        Ok(documents)
    }

    /// Delete the document with the given id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> DocStoreResult<()> {
        let link = self.document_link(id);
        let url = format!("{}/{}", self.config.base_url(), link);
        let response = self
            .signed(Method::DELETE, url, "docs", &link)?
            .header("x-ms-documentdb-partitionkey", partition_key(id))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    /// Replace the document at `id` with `document`.
    ///
    /// The document's `id` field must match the addressed id: the partition
    /// key derives from it, so changing it would orphan the record. When
    /// `if_match` carries the etag from a prior read, a concurrent change
    /// since that read surfaces as [`DocStoreError::Conflict`].
    #[instrument(skip(self, document))]
    pub async fn replace(
        &self,
        id: &str,
        document: Document,
        if_match: Option<&str>,
    ) -> DocStoreResult<Document> {
        if required_id(&document)? != id {
            return Err(DocStoreError::InvalidDocument(
                "document 'id' must match the addressed id".into(),
            ));
        }
        let link = self.document_link(id);
        let url = format!("{}/{}", self.config.base_url(), link);
        let mut request = self
            .signed(Method::PUT, url, "docs", &link)?
            .header("x-ms-documentdb-partitionkey", partition_key(id))
            .json(&document);
        if let Some(etag) = if_match {
            request = request.header("if-match", etag);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }
}

/// Partition key header value: a one-element JSON array.
fn partition_key(id: &str) -> String {
    json!([id]).to_string()
}

/// Extract the required non-empty string `id` from a document.
fn required_id(document: &Document) -> DocStoreResult<&str> {
    document
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            DocStoreError::InvalidDocument("'id' is required and must be a non-empty string".into())
        })
}
