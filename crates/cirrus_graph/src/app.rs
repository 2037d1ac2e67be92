//! The application: an ordered collection of stacks and the synthesis step.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{GraphError, GraphResult};
use crate::stack::Stack;

/// Ordered collection of stacks forming one deployment.
///
/// Construction is synchronous and single-pass; the only side effect is
/// `synth`, which writes one template per stack for the provisioning
/// engine to consume.
#[derive(Debug, Default)]
pub struct App {
    stacks: Vec<Stack>,
}

impl App {
    pub fn new() -> Self {
        Self { stacks: Vec::new() }
    }

    /// Add a stack. Stack names must be unique within the app.
    pub fn add_stack(&mut self, stack: Stack) -> GraphResult<()> {
        if self.stacks.iter().any(|s| s.name() == stack.name()) {
            return Err(GraphError::DuplicateStack(stack.name().to_string()));
        }
        self.stacks.push(stack);
        Ok(())
    }

    /// Stacks in declaration order.
    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    /// Look up a stack by name.
    pub fn stack(&self, name: &str) -> Option<&Stack> {
        self.stacks.iter().find(|s| s.name() == name)
    }

    /// Validate the whole graph.
    ///
    /// Each stack must pass its local checks, and every `Ref`/`Fn::GetAtt`
    /// target must be declared somewhere in the app. References may cross
    /// stack boundaries: handles threaded from one unit into another render
    /// as references into the producing stack, and the engine resolves them
    /// at apply time.
    pub fn validate(&self) -> GraphResult<()> {
        let declared: HashSet<&str> = self
            .stacks
            .iter()
            .flat_map(|s| s.resource_ids())
            .collect();

        for stack in &self.stacks {
            stack.validate()?;
            for target in stack.reference_targets() {
                // Pseudo parameters such as AWS::Region resolve inside the engine.
                if target.starts_with("AWS::") {
                    continue;
                }
                if !declared.contains(target.as_str()) {
                    return Err(GraphError::UnknownResource {
                        stack: stack.name().to_string(),
                        reference: target,
                    });
                }
            }
        }
        Ok(())
    }

    /// Synthesize every stack template into `out_dir`.
    pub fn synth(&self, out_dir: &Path) -> GraphResult<SynthManifest> {
        self.validate()?;
        fs::create_dir_all(out_dir)?;

        let mut entries = Vec::new();
        for stack in &self.stacks {
            let file_name = format!("{}.template.json", stack.name());
            let path = out_dir.join(&file_name);
            let template = serde_json::to_string_pretty(&stack.to_template())?;
            fs::write(&path, template)?;
            debug!("Wrote template {:?}", path);

            entries.push(SynthStackEntry {
                name: stack.name().to_string(),
                template_file: file_name,
                account: stack.env().account.clone(),
                region: stack.env().region.clone(),
            });
        }

        let manifest = SynthManifest { stacks: entries };
        let manifest_json = serde_json::to_string_pretty(&manifest)?;
        fs::write(out_dir.join("manifest.json"), manifest_json)?;

        info!("Synthesized {} stacks to {:?}", self.stacks.len(), out_dir);
        Ok(manifest)
    }
}

/// Manifest describing one synthesis run, in stack declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct SynthManifest {
    pub stacks: Vec<SynthStackEntry>,
}

/// One synthesized stack.
#[derive(Debug, Clone, Serialize)]
pub struct SynthStackEntry {
    pub name: String,
    pub template_file: String,
    pub account: Option<String>,
    pub region: Option<String>,
}

impl SynthManifest {
    /// Template path for a stack, relative to the synthesis directory.
    pub fn template_for(&self, stack_name: &str) -> Option<PathBuf> {
        self.stacks
            .iter()
            .find(|e| e.name == stack_name)
            .map(|e| PathBuf::from(&e.template_file))
    }
}
