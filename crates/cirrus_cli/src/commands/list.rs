//! List command - print stacks in deployment order.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cirrus_stacks::Deployment;

use crate::manifest::DeploymentManifest;

#[derive(Args)]
pub struct ListArgs {
    /// Deployment manifest file
    #[arg(short, long, default_value = "cirrus.yaml")]
    manifest: PathBuf,
}

pub fn execute(args: ListArgs) -> Result<()> {
    let manifest = DeploymentManifest::load(&args.manifest)?;
    let ctx = manifest.context(None, None);
    let app = Deployment::build(&ctx, &manifest.config())?;

    for stack in app.stacks() {
        println!("{}", stack.name());
    }
    Ok(())
}
