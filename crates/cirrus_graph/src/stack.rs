//! Stacks: named, independently deployable groups of declared resources.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{GraphError, GraphResult};
use crate::resource::Resource;

/// Target environment for a stack.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StackEnv {
    pub account: Option<String>,
    pub region: Option<String>,
}

impl StackEnv {
    pub fn new(account: Option<String>, region: Option<String>) -> Self {
        Self { account, region }
    }
}

/// A stack output recorded in the synthesized template.
#[derive(Debug, Clone, Serialize)]
pub struct Output {
    #[serde(rename = "Value")]
    pub value: Value,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named group of declared resources, synthesized to one template.
#[derive(Debug, Clone)]
pub struct Stack {
    name: String,
    env: StackEnv,
    resources: IndexMap<String, Resource>,
    outputs: IndexMap<String, Output>,
}

impl Stack {
    /// Create an empty stack.
    pub fn new(name: impl Into<String>, env: StackEnv) -> Self {
        Self {
            name: name.into(),
            env,
            resources: IndexMap::new(),
            outputs: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env(&self) -> &StackEnv {
        &self.env
    }

    /// Declare a resource in this stack.
    ///
    /// Rejects duplicate logical ids; everything else is taken as-is and
    /// judged by the provisioning engine at plan/apply time.
    pub fn add_resource(&mut self, resource: Resource) -> GraphResult<()> {
        if self.resources.contains_key(&resource.logical_id) {
            return Err(GraphError::DuplicateLogicalId {
                stack: self.name.clone(),
                logical_id: resource.logical_id,
            });
        }
        self.resources.insert(resource.logical_id.clone(), resource);
        Ok(())
    }

    /// Record a stack output.
    pub fn add_output(&mut self, key: &str, value: Value, description: Option<&str>) {
        self.outputs.insert(
            crate::resource::logical_id(key),
            Output {
                value,
                description: description.map(str::to_string),
            },
        );
    }

    /// Look up a declared resource by logical id.
    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    /// Logical ids in declaration order.
    pub fn resource_ids(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Declared resources in declaration order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Resources of the given engine type, in declaration order.
    pub fn resources_of_type<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = &'a Resource> {
        self.resources
            .values()
            .filter(move |r| r.resource_type == resource_type)
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Validate stack-local structure: at least one resource, and every
    /// explicit `DependsOn` edge targets a resource declared here.
    pub fn validate(&self) -> GraphResult<()> {
        if self.resources.is_empty() {
            return Err(GraphError::EmptyStack(self.name.clone()));
        }
        for resource in self.resources.values() {
            for dep in &resource.depends_on {
                if !self.resources.contains_key(dep) {
                    return Err(GraphError::UnknownResource {
                        stack: self.name.clone(),
                        reference: dep.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Collect every `Ref`/`Fn::GetAtt` target appearing in this stack's
    /// declared properties and outputs.
    pub fn reference_targets(&self) -> Vec<String> {
        let mut targets = Vec::new();
        for resource in self.resources.values() {
            collect_targets(&resource.properties, &mut targets);
        }
        for output in self.outputs.values() {
            collect_targets(&output.value, &mut targets);
        }
        targets
    }

    /// Render the stack as an engine template document.
    pub fn to_template(&self) -> Value {
        let resources: IndexMap<&str, &Resource> = self
            .resources
            .iter()
            .map(|(id, r)| (id.as_str(), r))
            .collect();

        let mut template = json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Resources": serde_json::to_value(&resources).unwrap_or(Value::Null),
        });
        if !self.outputs.is_empty() {
            template["Outputs"] =
                serde_json::to_value(&self.outputs).unwrap_or(Value::Null);
        }
        template
    }
}

/// Walk a property tree collecting reference targets.
fn collect_targets(value: &Value, targets: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(id)) = map.get("Ref") {
                    targets.push(id.clone());
                    return;
                }
                if let Some(Value::Array(parts)) = map.get("Fn::GetAtt") {
                    if let Some(Value::String(id)) = parts.first() {
                        targets.push(id.clone());
                        return;
                    }
                }
            }
            for nested in map.values() {
                collect_targets(nested, targets);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_targets(item, targets);
            }
        }
        _ => {}
    }
}
