//! Certificate unit: wildcard TLS certificate validated against the zone.

use cirrus_aws::{Certificate, CertificateHandle, ZoneHandle};
use cirrus_graph::{DeploymentContext, Stack, StackEnv};
use tracing::info;

use crate::error::StackResult;

/// Requests a wildcard certificate for the domain and its direct
/// subdomains, validated via DNS records written into the zone.
pub struct CertificateStack {
    stack: Stack,
    certificate: CertificateHandle,
}

impl CertificateStack {
    pub fn new(ctx: &DeploymentContext, zone: &ZoneHandle) -> StackResult<Self> {
        let name = ctx.resource_name("acm-stack");
        info!("Declaring certificate stack {}", name);

        let mut stack = Stack::new(
            name,
            StackEnv::new(ctx.account.clone(), ctx.region.clone()),
        );
        let certificate = Certificate::wildcard(
            &mut stack,
            &ctx.resource_name("wildcard-cert"),
            &ctx.domain_name,
            zone,
        )?;
        stack.add_output(
            &ctx.resource_name("cert-arn"),
            certificate.arn.to_value(),
            Some("Wildcard certificate ARN"),
        );

        Ok(Self { stack, certificate })
    }

    /// Handle to the requested certificate.
    pub fn certificate(&self) -> &CertificateHandle {
        &self.certificate
    }

    pub fn into_stack(self) -> Stack {
        self.stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_aws::HostedZone;

    #[test]
    fn test_certificate_stack_output() {
        let ctx = DeploymentContext::new("ctt", "dev").with_domain("cloudcodetree.com");

        let mut zone_stack = Stack::new("zone", StackEnv::new(None, None));
        let zone = HostedZone::from_lookup(
            &mut zone_stack,
            &ctx.resource_name("hosted-zone"),
            &ctx.domain_name,
        )
        .unwrap();

        let certificate = CertificateStack::new(&ctx, &zone).unwrap();
        assert_eq!(certificate.certificate().domain_name, "cloudcodetree.com");

        let stack = certificate.into_stack();
        assert_eq!(stack.name(), "ctt-dev-acm-stack");
        let template = stack.to_template();
        assert!(template["Outputs"]["CttDevCertArn"]["Value"].is_object());
    }
}
