//! Declared resources and attribute reference tokens.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Derive a template logical id from a resource name.
///
/// Non-alphanumeric characters split segments; each segment is
/// capitalized and the segments are joined: `ctt-dev-vpc` -> `CttDevVpc`.
pub fn logical_id(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| {
            let mut chars = s.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// An unresolved attribute reference.
///
/// Rendered into the template as `{"Ref": id}` or `{"Fn::GetAtt": [id, attr]}`
/// and resolved by the provisioning engine at apply time. Handles exchanged
/// between units carry these tokens; nothing in this repository ever holds
/// the resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attr {
    /// A `Ref` to a declared resource.
    Ref(String),
    /// A `Fn::GetAtt` on a declared resource.
    GetAtt(String, String),
}

impl Attr {
    /// Reference a resource by logical id.
    pub fn ref_to(logical_id: impl Into<String>) -> Self {
        Attr::Ref(logical_id.into())
    }

    /// Reference an attribute of a resource.
    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Attr::GetAtt(logical_id.into(), attribute.into())
    }

    /// Logical id of the referenced resource.
    pub fn target(&self) -> &str {
        match self {
            Attr::Ref(id) => id,
            Attr::GetAtt(id, _) => id,
        }
    }

    /// Render the token as a template value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for Attr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Attr::Ref(id) => map.serialize_entry("Ref", id)?,
            Attr::GetAtt(id, attr) => {
                map.serialize_entry("Fn::GetAtt", &[id.as_str(), attr.as_str()])?
            }
        }
        map.end()
    }
}

/// One declared cloud resource.
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    /// Template logical id, unique within the owning stack.
    #[serde(skip)]
    pub logical_id: String,
    /// Engine resource type, e.g. `AWS::EC2::VPC`.
    #[serde(rename = "Type")]
    pub resource_type: String,
    /// Declared properties.
    #[serde(rename = "Properties")]
    pub properties: Value,
    /// Explicit ordering edges beyond property references.
    #[serde(rename = "DependsOn", skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl Resource {
    /// Declare a resource. The logical id is derived from `name`.
    pub fn new(name: &str, resource_type: impl Into<String>, properties: Value) -> Self {
        Self {
            logical_id: logical_id(name),
            resource_type: resource_type.into(),
            properties,
            depends_on: Vec::new(),
        }
    }

    /// Add an explicit dependency on another resource.
    pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
        self.depends_on.push(logical_id.into());
        self
    }

    /// A `Ref` token for this resource.
    pub fn reference(&self) -> Attr {
        Attr::ref_to(&self.logical_id)
    }

    /// A `Fn::GetAtt` token for this resource.
    pub fn attr(&self, attribute: impl Into<String>) -> Attr {
        Attr::get_att(&self.logical_id, attribute)
    }
}
