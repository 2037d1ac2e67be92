//! DNS unit: lookup of the pre-existing public hosted zone.

use cirrus_aws::{HostedZone, ZoneHandle};
use cirrus_graph::{DeploymentContext, Stack, StackEnv};
use tracing::info;

use crate::error::StackResult;

/// Resolves the hosted zone for the deployment's domain.
///
/// The zone must already exist in the target account; a missing zone
/// fails at the engine's apply step, not here.
pub struct DnsStack {
    stack: Stack,
    zone: ZoneHandle,
}

impl DnsStack {
    pub fn new(ctx: &DeploymentContext) -> StackResult<Self> {
        let name = ctx.resource_name("route53-stack");
        info!("Declaring DNS stack {} for {}", name, ctx.domain_name);

        let mut stack = Stack::new(
            name,
            StackEnv::new(ctx.account.clone(), ctx.region.clone()),
        );
        let zone = HostedZone::from_lookup(
            &mut stack,
            &ctx.resource_name("hosted-zone"),
            &ctx.domain_name,
        )?;

        Ok(Self { stack, zone })
    }

    /// Handle to the resolved zone.
    pub fn zone(&self) -> &ZoneHandle {
        &self.zone
    }

    pub fn into_stack(self) -> Stack {
        self.stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dns_stack_resolves_domain() {
        let ctx = DeploymentContext::new("ctt", "dev").with_domain("cloudcodetree.com");
        let dns = DnsStack::new(&ctx).unwrap();

        assert_eq!(dns.zone().zone_name, "cloudcodetree.com");
        assert_eq!(dns.into_stack().name(), "ctt-dev-route53-stack");
    }
}
