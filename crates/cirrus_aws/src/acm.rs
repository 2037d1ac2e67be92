//! TLS certificates with DNS validation.

use cirrus_graph::{Attr, Resource, Stack};
use serde_json::json;
use tracing::debug;

use crate::error::AwsResult;
use crate::route53::ZoneHandle;

/// Handle to a requested certificate.
#[derive(Debug, Clone)]
pub struct CertificateHandle {
    /// Reference to the certificate ARN.
    pub arn: Attr,
    /// The covered domain name.
    pub domain_name: String,
}

/// A wildcard certificate validated against a hosted zone.
pub struct Certificate;

impl Certificate {
    /// Request a certificate for `domain_name` and `*.domain_name`,
    /// validated via DNS records written into the zone.
    pub fn wildcard(
        stack: &mut Stack,
        name: &str,
        domain_name: &str,
        zone: &ZoneHandle,
    ) -> AwsResult<CertificateHandle> {
        debug!("Declaring wildcard certificate for {}", domain_name);

        let certificate = Resource::new(
            name,
            "AWS::CertificateManager::Certificate",
            json!({
                "DomainName": domain_name,
                "SubjectAlternativeNames": [format!("*.{domain_name}")],
                "ValidationMethod": "DNS",
                "DomainValidationOptions": [{
                    "DomainName": domain_name,
                    "HostedZoneId": zone.zone_id,
                }],
            }),
        );
        let arn = certificate.reference();
        stack.add_resource(certificate)?;

        Ok(CertificateHandle {
            arn,
            domain_name: domain_name.to_string(),
        })
    }
}
