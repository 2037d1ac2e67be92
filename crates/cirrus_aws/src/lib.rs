//! # cirrus_aws
//!
//! Typed AWS resource bindings for the Cirrus resource graph.
//!
//! Every construct here is a thin constructor: it builds resource
//! properties, registers them into a stack, and hands back unresolved
//! references for downstream units. No construct validates provisioning
//! semantics or retries anything; an unavailable instance size or a broken
//! image surfaces from the external engine at plan/apply time.
//!
//! # Example
//!
//! ```rust
//! use cirrus_aws::ec2::Vpc;
//! use cirrus_graph::{Stack, StackEnv};
//!
//! let mut stack = Stack::new("ctt-dev-vpc-stack", StackEnv::new(None, None));
//! let vpc = Vpc::new(&mut stack, "ctt-dev-vpc").unwrap();
//! assert!(!stack.is_empty());
//! ```

pub mod acm;
pub mod ec2;
pub mod ecs;
pub mod efs;
pub mod error;
pub mod rds;
pub mod route53;
pub mod scaling;
pub mod secrets;

pub use acm::{Certificate, CertificateHandle};
pub use ec2::{InstanceClass, InstanceSize, InstanceType, SecurityGroup, SubnetType, Vpc, VpcHandle};
pub use ecs::{
    EfsVolume, HealthCheck, LoadBalancedFargateService, LoadBalancedServiceProps, ServiceHandle,
};
pub use efs::{FileSystem, FileSystemHandle};
pub use error::{AwsError, AwsResult};
pub use rds::{AuroraMysqlVersion, DatabaseCluster, DatabaseHandle, DatabaseProps};
pub use route53::{ARecord, HostedZone, ZoneHandle};
pub use scaling::{enable_target_tracking, AutoScalingPolicy};
pub use secrets::{Secret, SecretHandle, SecretValue};
