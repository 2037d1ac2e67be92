//! Generated secrets and opaque secret value references.

use cirrus_graph::{Attr, Resource, Stack};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::AwsResult;

/// An opaque reference to a secret's value.
///
/// Renders as an engine dynamic reference that is substituted at apply
/// time. The plaintext never passes through this repository: consumers
/// (database credentials, container environment) receive the reference
/// itself, not an unwrapped value.
#[derive(Debug, Clone)]
pub struct SecretValue {
    reference: Value,
}

impl SecretValue {
    /// Render the reference as a template value.
    pub fn to_value(&self) -> Value {
        self.reference.clone()
    }
}

/// Handle to a declared secret.
#[derive(Debug, Clone)]
pub struct SecretHandle {
    /// Reference to the secret ARN.
    pub arn: Attr,
    logical_id: String,
}

impl SecretHandle {
    /// Opaque reference to the generated secret string.
    pub fn value(&self) -> SecretValue {
        SecretValue {
            reference: json!({
                "Fn::Sub": format!(
                    "{{{{resolve:secretsmanager:${{{}}}:SecretString}}}}",
                    self.logical_id
                ),
            }),
        }
    }
}

/// A secret with an engine-generated password.
pub struct Secret;

impl Secret {
    const PASSWORD_LENGTH: u32 = 20;

    /// Declare a secret whose value is generated at apply time:
    /// 20 characters, punctuation excluded.
    pub fn generated(stack: &mut Stack, name: &str, secret_name: &str) -> AwsResult<SecretHandle> {
        debug!("Declaring generated secret {}", secret_name);

        let secret = Resource::new(
            name,
            "AWS::SecretsManager::Secret",
            json!({
                "Name": secret_name,
                "GenerateSecretString": {
                    "PasswordLength": Self::PASSWORD_LENGTH,
                    "ExcludePunctuation": true,
                },
            }),
        );
        let arn = secret.reference();
        let logical_id = secret.logical_id.clone();
        stack.add_resource(secret)?;

        Ok(SecretHandle { arn, logical_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_graph::StackEnv;

    #[test]
    fn test_generated_secret_properties() {
        let mut stack = Stack::new("test-stack", StackEnv::new(None, None));
        let secret = Secret::generated(&mut stack, "ctt-dev-db-secret", "/wordpress-db").unwrap();

        let resource = stack
            .resources_of_type("AWS::SecretsManager::Secret")
            .next()
            .unwrap();
        assert_eq!(resource.properties["Name"], "/wordpress-db");
        assert_eq!(
            resource.properties["GenerateSecretString"]["PasswordLength"],
            20
        );
        assert_eq!(
            resource.properties["GenerateSecretString"]["ExcludePunctuation"],
            true
        );

        let value = secret.value().to_value();
        let rendered = value["Fn::Sub"].as_str().unwrap();
        assert!(rendered.starts_with("{{resolve:secretsmanager:"));
        assert!(rendered.contains("${CttDevDbSecret}"));
        assert!(rendered.ends_with(":SecretString}}"));
    }

    #[test]
    fn test_secret_value_is_opaque() {
        let mut stack = Stack::new("test-stack", StackEnv::new(None, None));
        let secret = Secret::generated(&mut stack, "ctt-dev-db-secret", "/wordpress-db").unwrap();

        // The reference carries no plaintext, only the engine substitution.
        let rendered = serde_json::to_string(&secret.value().to_value()).unwrap();
        assert!(rendered.contains("resolve:secretsmanager"));
    }
}
