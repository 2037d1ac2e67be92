//! Application unit: database, file store, compute, and routing.

use cirrus_aws::{
    enable_target_tracking, ARecord, CertificateHandle, DatabaseCluster, DatabaseProps, EfsVolume,
    FileSystem, LoadBalancedFargateService, LoadBalancedServiceProps, Secret, VpcHandle,
    ZoneHandle,
};
use cirrus_graph::{DeploymentContext, Stack, StackEnv};
use serde_json::json;
use tracing::info;

use crate::config::WordpressConfig;
use crate::error::StackResult;

/// Declares the managed database cluster, the shared file store, the
/// auto-scaled web service, and the DNS records publishing it.
///
/// Consumes the network, zone, and certificate handles read-only and
/// returns nothing for further composition; everything it declares is a
/// side effect on its own stack.
pub struct WordpressStack {
    stack: Stack,
}

impl WordpressStack {
    pub fn new(
        ctx: &DeploymentContext,
        vpc: &VpcHandle,
        zone: &ZoneHandle,
        certificate: &CertificateHandle,
        config: &WordpressConfig,
    ) -> StackResult<Self> {
        let name = ctx.resource_name("wordpress-stack");
        info!("Declaring application stack {}", name);

        let mut stack = Stack::new(
            name,
            StackEnv::new(ctx.account.clone(), ctx.region.clone()),
        );

        let secret = Secret::generated(
            &mut stack,
            &ctx.resource_name("db-secret"),
            &config.db_secret_name,
        )?;

        let db = DatabaseCluster::new(
            &mut stack,
            &ctx.resource_name("wp-db"),
            vpc,
            &secret.value(),
            &DatabaseProps {
                engine_version: config.db_engine_version,
                instance_type: config.db_instance_type,
                master_username: config.db_user.clone(),
                database_name: config.db_name.clone(),
            },
        )?;

        let fs = FileSystem::new(
            &mut stack,
            &ctx.resource_name("fx"),
            vpc,
            &config.file_system_name,
        )?;

        let volume_name = ctx.resource_name("wp-vol");
        let props = LoadBalancedServiceProps::new(&config.image, certificate.clone())
            .cpu(config.cpu)
            .memory_mib(config.memory_mib)
            .desired_count(config.desired_count)
            .health_check(&config.health_check_path, &config.healthy_http_codes)
            .env("WORDPRESS_DB_NAME", json!(config.db_name))
            .env("WORDPRESS_DB_USER", json!(config.db_user))
            .env("WORDPRESS_DB_PASSWORD", secret.value().to_value())
            .env("WORDPRESS_DB_HOST", db.endpoint.to_value())
            .env("WORDPRESS_TABLE_PREFIX", json!(config.table_prefix))
            .volume(EfsVolume {
                name: volume_name,
                file_system: fs.file_system.clone(),
                container_path: config.web_root.clone(),
                read_only: false,
            });

        let service = LoadBalancedFargateService::new(
            &mut stack,
            &ctx.resource_name("wp-srv"),
            vpc,
            &props,
        )?;

        // The only cross-unit access rules: compute into the data layer.
        db.allow_default_port_from(&mut stack, &service.security_group, "Service to database")?;
        fs.allow_default_port_from(&mut stack, &service.security_group, "Service to file store")?;

        enable_target_tracking(
            &mut stack,
            &ctx.resource_name("wp-srv"),
            &service,
            &config.scaling,
        )?;

        ARecord::alias(
            &mut stack,
            &ctx.resource_name("wp-a-record"),
            zone,
            &config.subdomain,
            &service.load_balancer_dns,
            &service.load_balancer_zone,
        )?;

        service.add_host_redirect(
            &mut stack,
            &ctx.resource_name("wordpress-redirect"),
            &ctx.domain_name,
            &format!("{}.{}", config.subdomain, ctx.domain_name),
            1,
        )?;

        Ok(Self { stack })
    }

    pub fn into_stack(self) -> Stack {
        self.stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_aws::{Certificate, HostedZone, Vpc};

    fn fixture() -> (DeploymentContext, Stack) {
        let ctx = DeploymentContext::new("ctt", "dev").with_domain("cloudcodetree.com");

        let mut infra = Stack::new("infra", StackEnv::new(None, None));
        let vpc = Vpc::new(&mut infra, &ctx.resource_name("vpc")).unwrap();
        let zone = HostedZone::from_lookup(
            &mut infra,
            &ctx.resource_name("hosted-zone"),
            &ctx.domain_name,
        )
        .unwrap();
        let cert = Certificate::wildcard(
            &mut infra,
            &ctx.resource_name("wildcard-cert"),
            &ctx.domain_name,
            &zone,
        )
        .unwrap();

        let wordpress =
            WordpressStack::new(&ctx, &vpc, &zone, &cert, &WordpressConfig::small()).unwrap();
        (ctx, wordpress.into_stack())
    }

    #[test]
    fn test_wordpress_stack_declares_all_layers() {
        let (_, stack) = fixture();

        assert_eq!(stack.resources_of_type("AWS::SecretsManager::Secret").count(), 1);
        assert_eq!(stack.resources_of_type("AWS::RDS::DBCluster").count(), 1);
        assert_eq!(stack.resources_of_type("AWS::EFS::FileSystem").count(), 1);
        assert_eq!(stack.resources_of_type("AWS::ECS::Service").count(), 1);
        assert_eq!(stack.resources_of_type("AWS::Route53::RecordSet").count(), 1);
        assert_eq!(
            stack
                .resources_of_type("AWS::ElasticLoadBalancingV2::ListenerRule")
                .count(),
            1
        );
        assert_eq!(
            stack
                .resources_of_type("AWS::ApplicationAutoScaling::ScalingPolicy")
                .count(),
            2
        );
    }

    #[test]
    fn test_container_environment_wiring() {
        let (_, stack) = fixture();

        let task = stack
            .resources_of_type("AWS::ECS::TaskDefinition")
            .next()
            .unwrap();
        let environment = task.properties["ContainerDefinitions"][0]["Environment"]
            .as_array()
            .unwrap();

        let value_of = |name: &str| {
            environment
                .iter()
                .find(|entry| entry["Name"] == name)
                .map(|entry| entry["Value"].clone())
                .unwrap()
        };

        assert_eq!(value_of("WORDPRESS_DB_NAME"), json!("wordpress"));
        assert_eq!(value_of("WORDPRESS_DB_USER"), json!("chris"));
        assert_eq!(value_of("WORDPRESS_TABLE_PREFIX"), json!("wp_"));

        // Endpoint and password are unresolved tokens, never literals.
        assert!(value_of("WORDPRESS_DB_HOST")["Fn::GetAtt"].is_array());
        assert!(value_of("WORDPRESS_DB_PASSWORD")["Fn::Sub"]
            .as_str()
            .unwrap()
            .contains("resolve:secretsmanager"));
    }

    #[test]
    fn test_web_root_volume_mount() {
        let (_, stack) = fixture();

        let task = stack
            .resources_of_type("AWS::ECS::TaskDefinition")
            .next()
            .unwrap();
        let mount = &task.properties["ContainerDefinitions"][0]["MountPoints"][0];
        assert_eq!(mount["ContainerPath"], "/var/www/html");
        assert_eq!(mount["SourceVolume"], "ctt-dev-wp-vol");
        assert_eq!(mount["ReadOnly"], false);
    }
}
