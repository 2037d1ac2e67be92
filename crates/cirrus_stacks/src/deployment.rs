//! Composition root: instantiates every unit in order and threads handles.

use cirrus_graph::{App, DeploymentContext};
use tracing::info;

use crate::certificate::CertificateStack;
use crate::config::WordpressConfig;
use crate::dns::DnsStack;
use crate::error::StackResult;
use crate::network::NetworkStack;
use crate::wordpress::WordpressStack;

/// The full WordPress deployment.
pub struct Deployment;

impl Deployment {
    /// Build the application graph.
    ///
    /// Units are instantiated in fixed order (network, zone, certificate,
    /// application) and later units receive the handles of earlier ones by
    /// reference. Construction is pure graph building; the caller decides
    /// whether to validate or synthesize.
    pub fn build(ctx: &DeploymentContext, config: &WordpressConfig) -> StackResult<App> {
        info!(
            "Composing deployment for {} ({}-{})",
            ctx.domain_name, ctx.organization, ctx.stage
        );

        let network = NetworkStack::new(ctx)?;
        let dns = DnsStack::new(ctx)?;
        let certificate = CertificateStack::new(ctx, dns.zone())?;
        let wordpress = WordpressStack::new(
            ctx,
            network.vpc(),
            dns.zone(),
            certificate.certificate(),
            config,
        )?;

        let mut app = App::new();
        app.add_stack(network.into_stack())?;
        app.add_stack(dns.into_stack())?;
        app.add_stack(certificate.into_stack())?;
        app.add_stack(wordpress.into_stack())?;
        Ok(app)
    }
}
