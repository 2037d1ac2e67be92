//! Deployment context and resource naming.

use serde::{Deserialize, Serialize};

/// Deployment context shared by every declared unit.
///
/// Immutable after construction: units receive it by reference and derive
/// resource names from it. There is no process-global naming state, so a
/// unit cannot observe an unconfigured context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeploymentContext {
    /// Organization identifier used as the first naming segment.
    pub organization: String,
    /// Deployment stage (dev, staging, prod).
    pub stage: String,
    /// Target account identifier, if pinned.
    pub account: Option<String>,
    /// Target region, if pinned.
    pub region: Option<String>,
    /// Root domain name the deployment serves.
    pub domain_name: String,
}

impl DeploymentContext {
    /// Create a context with the given organization and stage.
    pub fn new(organization: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            stage: stage.into(),
            account: None,
            region: None,
            domain_name: String::new(),
        }
    }

    /// Set the root domain name.
    pub fn with_domain(mut self, domain_name: impl Into<String>) -> Self {
        self.domain_name = domain_name.into();
        self
    }

    /// Pin the target account and region.
    pub fn with_env(mut self, account: impl Into<String>, region: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self.region = Some(region.into());
        self
    }

    /// Derive a resource name: `{organization}-{stage}-{logical}`.
    ///
    /// Pure given the context. Uniqueness within a deployment is the
    /// caller's responsibility; the graph layer separately rejects
    /// duplicate logical ids.
    pub fn resource_name(&self, logical: &str) -> String {
        format!("{}-{}-{}", self.organization, self.stage, logical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_name_derivation() {
        let ctx = DeploymentContext::new("ctt", "dev");
        assert_eq!(ctx.resource_name("db"), "ctt-dev-db");
    }

    #[test]
    fn test_resource_name_is_deterministic() {
        let ctx = DeploymentContext::new("ctt", "prod").with_domain("example.com");
        assert_eq!(ctx.resource_name("vpc"), ctx.resource_name("vpc"));
    }

    #[test]
    fn test_context_builder() {
        let ctx = DeploymentContext::new("ctt", "dev")
            .with_domain("cloudcodetree.com")
            .with_env("123456789012", "us-east-1");

        assert_eq!(ctx.domain_name, "cloudcodetree.com");
        assert_eq!(ctx.account.as_deref(), Some("123456789012"));
        assert_eq!(ctx.region.as_deref(), Some("us-east-1"));
    }
}
