//! Router configuration for the records API.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tenon_docstore::DocStoreClient;

use crate::handlers::{
    delete_handler, edit_handler, retrieve_all_handler, retrieve_by_field_handler,
    retrieve_handler, write_handler,
};

/// Shared state for the records API.
#[derive(Clone)]
pub struct RecordsState {
    /// Document store client; the store is the sole source of truth.
    pub store: Arc<DocStoreClient>,
}

/// Create the records router.
pub fn records_router(store: Arc<DocStoreClient>) -> Router {
    let state = RecordsState { store };

    Router::new()
        .route("/write", post(write_handler))
        .route("/retrieve-all", get(retrieve_all_handler))
        .route("/retrieve/by/:field/:value", get(retrieve_by_field_handler))
        .route("/retrieve/:id", get(retrieve_handler))
        .route("/delete/:id", delete(delete_handler))
        .route("/edit/:id", put(edit_handler))
        .with_state(state)
}
