//! Deployment manifest: the checked-in constants of a deployment.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use cirrus_graph::DeploymentContext;
use cirrus_stacks::{Profile, WordpressConfig};

/// The YAML manifest describing one deployment.
///
/// Organization, stage, and domain are deployment constants and live in
/// the repository; account and region come from the process environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentManifest {
    pub organization: String,
    pub stage: String,
    pub domain_name: String,
    #[serde(default = "default_profile")]
    pub profile: Profile,
}

fn default_profile() -> Profile {
    Profile::Small
}

impl DeploymentManifest {
    /// Load a manifest from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {path:?}"))?;
        let manifest: DeploymentManifest =
            serde_yaml::from_str(&raw).with_context(|| format!("Malformed manifest {path:?}"))?;
        Ok(manifest)
    }

    /// Build the deployment context, pinning account and region when given.
    pub fn context(&self, account: Option<String>, region: Option<String>) -> DeploymentContext {
        let mut ctx = DeploymentContext::new(&self.organization, &self.stage)
            .with_domain(&self.domain_name);
        if let (Some(account), Some(region)) = (account, region) {
            ctx = ctx.with_env(account, region);
        }
        ctx
    }

    /// Application configuration for the manifest's profile.
    pub fn config(&self) -> WordpressConfig {
        WordpressConfig::for_profile(self.profile)
    }
}
