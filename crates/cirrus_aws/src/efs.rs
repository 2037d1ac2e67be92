//! Shared network file stores.

use cirrus_graph::{Attr, Resource, Stack};
use serde_json::json;
use tracing::debug;

use crate::ec2::{SecurityGroup, SubnetType, VpcHandle};
use crate::error::AwsResult;

/// Handle to a declared file system.
#[derive(Debug, Clone)]
pub struct FileSystemHandle {
    /// Reference to the file system id.
    pub file_system: Attr,
    /// The file system's security group.
    pub security_group: SecurityGroup,
}

impl FileSystemHandle {
    /// NFS default port.
    pub const DEFAULT_PORT: u16 = 2049;

    /// Permit inbound traffic on the file store's default port from `source`.
    pub fn allow_default_port_from(
        &self,
        stack: &mut Stack,
        source: &SecurityGroup,
        description: &str,
    ) -> AwsResult<()> {
        self.security_group
            .allow_from(stack, source, Self::DEFAULT_PORT, description)
    }
}

/// A shared network file store with mount targets in private subnets.
pub struct FileSystem;

impl FileSystem {
    /// Declare the file system and one mount target per private subnet.
    pub fn new(
        stack: &mut Stack,
        name: &str,
        vpc: &VpcHandle,
        file_system_name: &str,
    ) -> AwsResult<FileSystemHandle> {
        debug!("Declaring file system {}", name);

        let file_system = Resource::new(
            name,
            "AWS::EFS::FileSystem",
            json!({
                "FileSystemTags": [{ "Key": "Name", "Value": file_system_name }],
                "Encrypted": true,
            }),
        );
        let file_system_ref = file_system.reference();
        stack.add_resource(file_system)?;

        let security_group =
            SecurityGroup::new(stack, &format!("{name}-sg"), vpc, "File system access")?;

        for (index, subnet) in vpc
            .subnets(SubnetType::PrivateWithEgress)
            .iter()
            .enumerate()
        {
            stack.add_resource(Resource::new(
                &format!("{name}-mount-{}", index + 1),
                "AWS::EFS::MountTarget",
                json!({
                    "FileSystemId": file_system_ref,
                    "SubnetId": subnet,
                    "SecurityGroups": [security_group.id],
                }),
            ))?;
        }

        Ok(FileSystemHandle {
            file_system: file_system_ref,
            security_group,
        })
    }
}
