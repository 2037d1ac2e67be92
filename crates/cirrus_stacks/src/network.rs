//! Network unit: the isolated virtual network.

use cirrus_aws::{Vpc, VpcHandle};
use cirrus_graph::{DeploymentContext, Stack, StackEnv};
use tracing::info;

use crate::error::StackResult;

/// Declares the virtual network every other unit places resources into.
///
/// No configurable inputs beyond the derived name; all provisioning
/// failures are reported asynchronously by the external engine.
pub struct NetworkStack {
    stack: Stack,
    vpc: VpcHandle,
}

impl NetworkStack {
    pub fn new(ctx: &DeploymentContext) -> StackResult<Self> {
        let name = ctx.resource_name("vpc-stack");
        info!("Declaring network stack {}", name);

        let mut stack = Stack::new(
            name,
            StackEnv::new(ctx.account.clone(), ctx.region.clone()),
        );
        let vpc = Vpc::new(&mut stack, &ctx.resource_name("vpc"))?;

        Ok(Self { stack, vpc })
    }

    /// Handle to the declared network.
    pub fn vpc(&self) -> &VpcHandle {
        &self.vpc
    }

    pub fn into_stack(self) -> Stack {
        self.stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_stack_name_and_vpc() {
        let ctx = DeploymentContext::new("ctt", "dev").with_domain("cloudcodetree.com");
        let network = NetworkStack::new(&ctx).unwrap();

        assert_eq!(network.vpc().subnets(cirrus_aws::SubnetType::Public).len(), 2);

        let stack = network.into_stack();
        assert_eq!(stack.name(), "ctt-dev-vpc-stack");
        assert!(stack.resource("CttDevVpc").is_some());
    }
}
