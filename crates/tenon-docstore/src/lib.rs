//! Cosmos DB document store client for tenon.
//!
//! Talks to the Cosmos DB SQL REST API directly over reqwest, signing each
//! request with the account master key (HMAC-SHA256). Documents are arbitrary
//! JSON objects whose `id` field doubles as the partition key, so every
//! operation addresses a single logical partition except the cross-partition
//! queries.
//!
//! # Example
//!
//! ```no_run
//! use tenon_docstore::{DocStoreClient, DocStoreConfig};
//!
//! # async fn example() -> Result<(), tenon_docstore::DocStoreError> {
//! let config = DocStoreConfig::new(
//!     "https://myaccount.documents.azure.com:443/",
//!     "base64-master-key".to_string(),
//!     "mydb",
//!     "mycontainer",
//! );
//! let store = DocStoreClient::new(config)?;
//! store.ensure_container().await?;
//! let doc = store.read("tenant-1").await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod config;
mod error;

pub use client::{DocStoreClient, Document};
pub use config::DocStoreConfig;
pub use error::{DocStoreError, DocStoreResult};
