//! Document CRUD HTTP API.
//!
//! Exposes the document store as a small REST surface:
//!
//! - `POST /write` — create or fully replace a record (requires `id`)
//! - `GET /retrieve/:id` — point read by primary key
//! - `GET /retrieve-all` — cross-partition scan of every record
//! - `GET /retrieve/by/:field/:value` — first match on a secondary field
//! - `PUT /edit/:id` — shallow merge patch with optimistic concurrency
//! - `DELETE /delete/:id` — delete by primary key
//!
//! The two lookup routes are deliberately distinct: `/retrieve/:id` has
//! unique-key semantics, `/retrieve/by/...` is a non-unique filtered lookup
//! returning the first match.

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;

pub use error::RecordsError;
pub use router::{records_router, RecordsState};
