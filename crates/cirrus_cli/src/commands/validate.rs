//! Validate command - structural validation of the resource graph.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use cirrus_stacks::Deployment;

use crate::manifest::DeploymentManifest;

#[derive(Args)]
pub struct ValidateArgs {
    /// Deployment manifest file
    #[arg(short, long, default_value = "cirrus.yaml")]
    manifest: PathBuf,

    /// Target account identifier
    #[arg(long, env = "CIRRUS_ACCOUNT")]
    account: Option<String>,

    /// Target region
    #[arg(long, env = "CIRRUS_REGION")]
    region: Option<String>,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    let manifest = DeploymentManifest::load(&args.manifest)?;
    info!("Validating deployment for {}", manifest.domain_name);

    let ctx = manifest.context(args.account, args.region);
    let app = Deployment::build(&ctx, &manifest.config())
        .context("Failed to compose the deployment")?;

    app.validate().context("Graph validation failed")?;

    let resources: usize = app.stacks().iter().map(|s| s.resources().count()).sum();
    println!(
        "Graph is valid: {} stacks, {} resources",
        app.stacks().len(),
        resources
    );
    Ok(())
}
