//! Auth0 Management API client and tenant provisioning workflow.
//!
//! The [`ManagementClient`] wraps the handful of Management API v2 calls this
//! service needs (clients, organizations, organization connections,
//! invitations), authenticating with a cached machine-to-machine access token
//! obtained via the client-credentials grant.
//!
//! The [`ProvisioningWorkflow`] chains those calls into the tenant onboarding
//! sequence: application, organization, connection attachment, invitation.
//! Remote objects created before a mid-chain failure are rolled back in
//! reverse order so a failed provisioning attempt leaves nothing behind.

mod config;
mod error;
mod management;
mod slug;
mod token;
mod workflow;

pub use config::IdpConfig;
pub use error::{IdpError, IdpResult};
pub use management::{CreatedClient, CreatedInvitation, CreatedOrganization, ManagementClient};
pub use slug::org_slug;
pub use token::TokenCache;
pub use workflow::{ProvisionOutcome, ProvisionRequest, ProvisioningWorkflow};
