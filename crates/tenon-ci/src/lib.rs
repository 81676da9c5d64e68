//! GitHub Actions workflow dispatch client.
//!
//! A deliberately small client: one authenticated POST to the workflow
//! dispatch endpoint of the configured owner's repository. GitHub answers a
//! successful dispatch with 204 No Content; anything else is surfaced as a
//! dispatch failure carrying the upstream status so the HTTP layer can
//! mirror it.

mod client;
mod error;

pub use client::{CiConfig, DispatchClient};
pub use error::{CiError, CiResult};
