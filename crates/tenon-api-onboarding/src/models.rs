//! Request and response models for the onboarding API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tenon_idp::ProvisionRequest;

use crate::error::OnboardingError;

/// A value that may arrive as a single string or a sequence of strings.
///
/// Callers historically sent `callback_urls` both ways; a single string is
/// normalized to a one-element list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrVec {
    One(String),
    Many(Vec<String>),
}

impl From<StringOrVec> for Vec<String> {
    fn from(value: StringOrVec) -> Self {
        match value {
            StringOrVec::One(s) => vec![s],
            StringOrVec::Many(v) => v,
        }
    }
}

/// Body of `POST /createApp`.
///
/// The wire field for the application name is `app`.
#[derive(Debug, Deserialize)]
pub struct CreateAppRequest {
    #[serde(default)]
    pub app: Option<String>,
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub initiate_login_uri: Option<String>,
    #[serde(default)]
    pub callback_urls: Option<StringOrVec>,
    #[serde(default)]
    pub logout_urls: Option<StringOrVec>,
}

impl CreateAppRequest {
    /// Validate presence of the required fields and convert into a
    /// provisioning request. The error names exactly the missing fields.
    pub fn into_provision_request(self) -> Result<ProvisionRequest, OnboardingError> {
        let mut missing = Vec::new();
        if self.app.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("app");
        }
        if self.org_name.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("org_name");
        }
        if self.email.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("email");
        }
        if !missing.is_empty() {
            return Err(OnboardingError::MissingFields { missing });
        }

        Ok(ProvisionRequest {
            app_name: self.app.unwrap_or_default(),
            org_name: self.org_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            initiate_login_uri: self.initiate_login_uri,
            callback_urls: self.callback_urls.map(Vec::from),
            logout_urls: self.logout_urls.map(Vec::from),
        })
    }
}

/// Body of `POST /trigger-deploy`.
#[derive(Debug, Deserialize)]
pub struct TriggerDeployRequest {
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub inputs: Option<Value>,
}

impl TriggerDeployRequest {
    /// Validate presence of `repo` and `workflow_id`.
    pub fn validate(&self) -> Result<(), OnboardingError> {
        let mut missing = Vec::new();
        if self.repo.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("repo");
        }
        if self
            .workflow_id
            .as_deref()
            .map_or(true, |s| s.trim().is_empty())
        {
            missing.push("workflow_id");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(OnboardingError::MissingFields { missing })
        }
    }
}

/// Success body of `POST /trigger-deploy`.
#[derive(Debug, Serialize)]
pub struct TriggerDeployResponse {
    pub status: String,
    pub repo: String,
    pub workflow_id: String,
    pub inputs: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_string_normalizes_to_one_element_list() {
        let request: CreateAppRequest = serde_json::from_value(json!({
            "app": "A",
            "org_name": "O",
            "email": "e@x.test",
            "callback_urls": "https://x.test/cb",
        }))
        .unwrap();
        let provision = request.into_provision_request().unwrap();
        assert_eq!(
            provision.callback_urls,
            Some(vec!["https://x.test/cb".to_string()])
        );
    }

    #[test]
    fn test_list_of_strings_passes_through() {
        let request: CreateAppRequest = serde_json::from_value(json!({
            "app": "A",
            "org_name": "O",
            "email": "e@x.test",
            "logout_urls": ["https://x.test/a", "https://x.test/b"],
        }))
        .unwrap();
        let provision = request.into_provision_request().unwrap();
        assert_eq!(provision.logout_urls.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_missing_fields_are_all_named() {
        let request: CreateAppRequest = serde_json::from_value(json!({
            "org_name": "O",
        }))
        .unwrap();
        match request.into_provision_request() {
            Err(OnboardingError::MissingFields { missing }) => {
                assert_eq!(missing, vec!["app", "email"]);
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let request: CreateAppRequest = serde_json::from_value(json!({
            "app": "  ",
            "org_name": "O",
            "email": "e@x.test",
        }))
        .unwrap();
        assert!(matches!(
            request.into_provision_request(),
            Err(OnboardingError::MissingFields { .. })
        ));
    }

    #[test]
    fn test_trigger_deploy_requires_workflow_id() {
        let request: TriggerDeployRequest = serde_json::from_value(json!({
            "repo": "webapp",
        }))
        .unwrap();
        match request.validate() {
            Err(OnboardingError::MissingFields { missing }) => {
                assert_eq!(missing, vec!["workflow_id"]);
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }
}
