//! Containerized compute behind an application load balancer.

use cirrus_graph::{Attr, Resource, Stack};
use indexmap::IndexMap;
use serde_json::{json, Value};
use tracing::debug;

use crate::acm::CertificateHandle;
use crate::ec2::{SecurityGroup, SubnetType, VpcHandle};
use crate::error::AwsResult;

const CONTAINER_NAME: &str = "web";
const EXECUTION_ROLE_POLICY: &str =
    "arn:aws:iam::aws:policy/service-role/AmazonECSTaskExecutionRolePolicy";

/// A shared file store volume bound into the container.
#[derive(Debug, Clone)]
pub struct EfsVolume {
    /// Volume name within the task definition.
    pub name: String,
    /// Reference to the file system id.
    pub file_system: Attr,
    /// Mount path inside the container.
    pub container_path: String,
    pub read_only: bool,
}

/// Target group health check settings.
#[derive(Debug, Clone)]
pub struct HealthCheck {
    pub path: String,
    /// Success-code range, e.g. `200-399`.
    pub healthy_http_codes: String,
}

impl Default for HealthCheck {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            healthy_http_codes: "200-399".to_string(),
        }
    }
}

/// Declaration inputs for a load-balanced container service.
#[derive(Debug, Clone)]
pub struct LoadBalancedServiceProps {
    /// Container image reference.
    pub image: String,
    /// Container environment; values may be literals or unresolved tokens.
    pub environment: IndexMap<String, Value>,
    pub cpu: u32,
    pub memory_mib: u32,
    pub desired_count: u32,
    pub container_port: u16,
    /// Certificate attached to the HTTPS listener.
    pub certificate: CertificateHandle,
    /// Redirect HTTP traffic to HTTPS.
    pub redirect_http: bool,
    /// Whether the load balancer faces the internet.
    pub public_load_balancer: bool,
    pub health_check: HealthCheck,
    /// Optional file store volume mounted into the container.
    pub volume: Option<EfsVolume>,
}

impl LoadBalancedServiceProps {
    pub fn new(image: impl Into<String>, certificate: CertificateHandle) -> Self {
        Self {
            image: image.into(),
            environment: IndexMap::new(),
            cpu: 256,
            memory_mib: 512,
            desired_count: 1,
            container_port: 80,
            certificate,
            redirect_http: true,
            public_load_balancer: true,
            health_check: HealthCheck::default(),
            volume: None,
        }
    }

    pub fn env(mut self, key: impl Into<String>, value: Value) -> Self {
        self.environment.insert(key.into(), value);
        self
    }

    pub fn cpu(mut self, cpu: u32) -> Self {
        self.cpu = cpu;
        self
    }

    pub fn memory_mib(mut self, memory_mib: u32) -> Self {
        self.memory_mib = memory_mib;
        self
    }

    pub fn desired_count(mut self, count: u32) -> Self {
        self.desired_count = count;
        self
    }

    pub fn health_check(mut self, path: impl Into<String>, healthy_http_codes: impl Into<String>) -> Self {
        self.health_check = HealthCheck {
            path: path.into(),
            healthy_http_codes: healthy_http_codes.into(),
        };
        self
    }

    pub fn volume(mut self, volume: EfsVolume) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// Handle to a declared load-balanced service.
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    /// Reference to the service.
    pub service: Attr,
    /// Reference to the owning cluster.
    pub cluster: Attr,
    /// The service's security group; source of the data-layer access rules.
    pub security_group: SecurityGroup,
    /// Reference to the load balancer's DNS name.
    pub load_balancer_dns: Attr,
    /// Reference to the load balancer's canonical hosted zone id.
    pub load_balancer_zone: Attr,
    /// Reference to the HTTPS listener.
    pub https_listener: Attr,
    /// Reference to the target group.
    pub target_group: Attr,
    /// Reference to the service name, for scaling targets.
    pub service_name: Attr,
}

impl ServiceHandle {
    /// Redirect requests for `from_host` to `to_host`, keeping HTTPS.
    pub fn add_host_redirect(
        &self,
        stack: &mut Stack,
        name: &str,
        from_host: &str,
        to_host: &str,
        priority: u32,
    ) -> AwsResult<()> {
        stack.add_resource(Resource::new(
            name,
            "AWS::ElasticLoadBalancingV2::ListenerRule",
            json!({
                "ListenerArn": self.https_listener,
                "Priority": priority,
                "Conditions": [{
                    "Field": "host-header",
                    "HostHeaderConfig": { "Values": [from_host] },
                }],
                "Actions": [{
                    "Type": "redirect",
                    "RedirectConfig": {
                        "Host": to_host,
                        "Protocol": "HTTPS",
                        "Port": "443",
                        "StatusCode": "HTTP_301",
                    },
                }],
            }),
        ))?;
        Ok(())
    }
}

/// An auto-scalable container service fronted by an application load
/// balancer, with TLS termination and an HTTP-to-HTTPS redirect.
pub struct LoadBalancedFargateService;

impl LoadBalancedFargateService {
    /// Declare the cluster, task definition, load balancer, listeners,
    /// target group, and service.
    pub fn new(
        stack: &mut Stack,
        name: &str,
        vpc: &VpcHandle,
        props: &LoadBalancedServiceProps,
    ) -> AwsResult<ServiceHandle> {
        debug!("Declaring load-balanced service {}", name);

        let cluster = Resource::new(
            &format!("{name}-cluster"),
            "AWS::ECS::Cluster",
            json!({ "ClusterName": format!("{name}-cluster") }),
        );
        let cluster_ref = cluster.reference();
        stack.add_resource(cluster)?;

        let execution_role = Resource::new(
            &format!("{name}-exec-role"),
            "AWS::IAM::Role",
            json!({
                "AssumeRolePolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Effect": "Allow",
                        "Principal": { "Service": "ecs-tasks.amazonaws.com" },
                        "Action": "sts:AssumeRole",
                    }],
                },
                "ManagedPolicyArns": [EXECUTION_ROLE_POLICY],
            }),
        );
        let execution_role_arn = execution_role.attr("Arn");
        stack.add_resource(execution_role)?;

        let task_definition = Self::task_definition(stack, name, &execution_role_arn, props)?;

        let alb_sg = SecurityGroup::new(
            stack,
            &format!("{name}-alb-sg"),
            vpc,
            "Load balancer ingress",
        )?;
        alb_sg.allow_from_anywhere(stack, 443, "HTTPS from anywhere")?;
        if props.redirect_http {
            alb_sg.allow_from_anywhere(stack, 80, "HTTP from anywhere")?;
        }

        let service_sg =
            SecurityGroup::new(stack, &format!("{name}-sg"), vpc, "Service tasks")?;
        service_sg.allow_from(
            stack,
            &alb_sg,
            props.container_port,
            "Load balancer to service",
        )?;

        let lb_subnets = if props.public_load_balancer {
            vpc.subnets(SubnetType::Public)
        } else {
            vpc.subnets(SubnetType::PrivateWithEgress)
        };
        let load_balancer = Resource::new(
            &format!("{name}-alb"),
            "AWS::ElasticLoadBalancingV2::LoadBalancer",
            json!({
                "Type": "application",
                "Scheme": if props.public_load_balancer { "internet-facing" } else { "internal" },
                "Subnets": lb_subnets,
                "SecurityGroups": [alb_sg.id],
            }),
        );
        let load_balancer_ref = load_balancer.reference();
        let load_balancer_dns = load_balancer.attr("DNSName");
        let load_balancer_zone = load_balancer.attr("CanonicalHostedZoneID");
        stack.add_resource(load_balancer)?;

        let target_group = Resource::new(
            &format!("{name}-tg"),
            "AWS::ElasticLoadBalancingV2::TargetGroup",
            json!({
                "VpcId": vpc.vpc,
                "Port": props.container_port,
                "Protocol": "HTTP",
                "TargetType": "ip",
                "HealthCheckPath": props.health_check.path,
                "Matcher": { "HttpCode": props.health_check.healthy_http_codes },
            }),
        );
        let target_group_ref = target_group.reference();
        stack.add_resource(target_group)?;

        let https_listener = Resource::new(
            &format!("{name}-https"),
            "AWS::ElasticLoadBalancingV2::Listener",
            json!({
                "LoadBalancerArn": load_balancer_ref,
                "Port": 443,
                "Protocol": "HTTPS",
                "Certificates": [{ "CertificateArn": props.certificate.arn }],
                "DefaultActions": [{
                    "Type": "forward",
                    "TargetGroupArn": target_group_ref,
                }],
            }),
        );
        let https_listener_ref = https_listener.reference();
        let https_listener_id = https_listener.logical_id.clone();
        stack.add_resource(https_listener)?;

        if props.redirect_http {
            stack.add_resource(Resource::new(
                &format!("{name}-http"),
                "AWS::ElasticLoadBalancingV2::Listener",
                json!({
                    "LoadBalancerArn": load_balancer_ref,
                    "Port": 80,
                    "Protocol": "HTTP",
                    "DefaultActions": [{
                        "Type": "redirect",
                        "RedirectConfig": {
                            "Protocol": "HTTPS",
                            "Port": "443",
                            "StatusCode": "HTTP_301",
                        },
                    }],
                }),
            ))?;
        }

        let service = Resource::new(
            name,
            "AWS::ECS::Service",
            json!({
                "Cluster": cluster_ref,
                "TaskDefinition": task_definition,
                "DesiredCount": props.desired_count,
                "LaunchType": "FARGATE",
                "NetworkConfiguration": {
                    "AwsvpcConfiguration": {
                        "Subnets": vpc.subnets(SubnetType::PrivateWithEgress),
                        "SecurityGroups": [service_sg.id],
                        "AssignPublicIp": "DISABLED",
                    },
                },
                "LoadBalancers": [{
                    "ContainerName": CONTAINER_NAME,
                    "ContainerPort": props.container_port,
                    "TargetGroupArn": target_group_ref,
                }],
            }),
        )
        .depends_on(&https_listener_id);
        let service_ref = service.reference();
        let service_name = service.attr("Name");
        stack.add_resource(service)?;

        Ok(ServiceHandle {
            service: service_ref,
            cluster: cluster_ref,
            security_group: service_sg,
            load_balancer_dns,
            load_balancer_zone,
            https_listener: https_listener_ref,
            target_group: target_group_ref,
            service_name,
        })
    }

    fn task_definition(
        stack: &mut Stack,
        name: &str,
        execution_role_arn: &Attr,
        props: &LoadBalancedServiceProps,
    ) -> AwsResult<Attr> {
        let environment: Vec<Value> = props
            .environment
            .iter()
            .map(|(key, value)| json!({ "Name": key, "Value": value }))
            .collect();

        let mut container = json!({
            "Name": CONTAINER_NAME,
            "Image": props.image,
            "Essential": true,
            "PortMappings": [{
                "ContainerPort": props.container_port,
                "Protocol": "tcp",
            }],
            "Environment": environment,
        });

        let mut task_props = json!({
            "Family": name,
            "Cpu": props.cpu.to_string(),
            "Memory": props.memory_mib.to_string(),
            "NetworkMode": "awsvpc",
            "RequiresCompatibilities": ["FARGATE"],
            "ExecutionRoleArn": execution_role_arn,
        });

        if let Some(volume) = &props.volume {
            container["MountPoints"] = json!([{
                "SourceVolume": volume.name,
                "ContainerPath": volume.container_path,
                "ReadOnly": volume.read_only,
            }]);
            task_props["Volumes"] = json!([{
                "Name": volume.name,
                "EFSVolumeConfiguration": { "FilesystemId": volume.file_system },
            }]);
        }

        task_props["ContainerDefinitions"] = json!([container]);

        let task_definition = Resource::new(
            &format!("{name}-task"),
            "AWS::ECS::TaskDefinition",
            task_props,
        );
        let task_ref = task_definition.reference();
        stack.add_resource(task_definition)?;
        Ok(task_ref)
    }
}
