//! CLI command definitions.

use clap::{Parser, Subcommand};

pub mod list;
pub mod synth;
pub mod validate;

/// Cirrus - declarative cloud deployment synthesis
#[derive(Parser)]
#[command(name = "cirrus")]
#[command(version, about = "Cirrus - declarative cloud deployment synthesis")]
#[command(long_about = r#"
Cirrus declares the deployment as a typed resource graph and synthesizes
one template per stack for the provisioning engine to apply.

WORKFLOWS:
  synth     → Build the graph and write templates to the output directory
  validate  → Build the graph and run structural validation only
  list      → Print the stacks in deployment order

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize deployment templates
    Synth(synth::SynthArgs),

    /// Validate the resource graph without writing templates
    Validate(validate::ValidateArgs),

    /// List stacks in deployment order
    List(list::ListArgs),
}
