//! Tenant provisioning and deploy-trigger HTTP API.
//!
//! - `POST /createApp` — run the identity-provider provisioning chain
//!   (application, organization, connection, invitation)
//! - `POST /trigger-deploy` — dispatch a CI workflow run
//!
//! Both endpoints validate their input fully before issuing any remote call;
//! a 400 response guarantees nothing was created or triggered upstream.

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;

pub use error::OnboardingError;
pub use router::{onboarding_router, OnboardingState};
