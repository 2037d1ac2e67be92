//! Synth command - build the graph and write engine templates.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use cirrus_stacks::Deployment;

use crate::manifest::DeploymentManifest;

#[derive(Args)]
pub struct SynthArgs {
    /// Deployment manifest file
    #[arg(short, long, default_value = "cirrus.yaml")]
    manifest: PathBuf,

    /// Output directory for synthesized templates
    #[arg(short, long, default_value = "cirrus.out")]
    out: PathBuf,

    /// Target account identifier
    #[arg(long, env = "CIRRUS_ACCOUNT")]
    account: Option<String>,

    /// Target region
    #[arg(long, env = "CIRRUS_REGION")]
    region: Option<String>,
}

pub fn execute(args: SynthArgs) -> Result<()> {
    let manifest = DeploymentManifest::load(&args.manifest)?;
    info!(
        "Synthesizing {} ({}-{})",
        manifest.domain_name, manifest.organization, manifest.stage
    );

    let ctx = manifest.context(args.account, args.region);
    let app = Deployment::build(&ctx, &manifest.config())
        .context("Failed to compose the deployment")?;

    let synthesized = app
        .synth(&args.out)
        .context("Failed to synthesize templates")?;

    println!("Synthesized {} stacks to {:?}", synthesized.stacks.len(), args.out);
    for entry in &synthesized.stacks {
        println!("  {} -> {}", entry.name, entry.template_file);
    }

    Ok(())
}
