//! Managed relational database clusters.

use cirrus_graph::{Attr, Resource, Stack};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::ec2::{InstanceType, SecurityGroup, SubnetType, VpcHandle};
use crate::error::AwsResult;
use crate::secrets::SecretValue;

/// Aurora MySQL engine versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuroraMysqlVersion {
    V2_10_1,
    V3_02_1,
}

impl AuroraMysqlVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuroraMysqlVersion::V2_10_1 => "5.7.mysql_aurora.2.10.1",
            AuroraMysqlVersion::V3_02_1 => "8.0.mysql_aurora.3.02.1",
        }
    }
}

/// Database cluster declaration inputs.
#[derive(Debug, Clone)]
pub struct DatabaseProps {
    pub engine_version: AuroraMysqlVersion,
    pub instance_type: InstanceType,
    pub master_username: String,
    pub database_name: String,
}

/// Handle to a declared database cluster.
#[derive(Debug, Clone)]
pub struct DatabaseHandle {
    /// Reference to the cluster identifier.
    pub cluster: Attr,
    /// Reference to the writer endpoint hostname.
    pub endpoint: Attr,
    /// The cluster's security group.
    pub security_group: SecurityGroup,
}

impl DatabaseHandle {
    /// MySQL default port.
    pub const DEFAULT_PORT: u16 = 3306;

    /// Permit inbound traffic on the database's default port from `source`.
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

/// An Aurora cluster with a single instance, placed in private subnets.
pub struct DatabaseCluster;

impl DatabaseCluster {
    /// Declare the cluster. Credentials pair the fixed master username with
    /// an opaque generated password reference; the plaintext stays inside
    /// the engine.
    pub fn new(
        stack: &mut Stack,
        name: &str,
        vpc: &VpcHandle,
        password: &SecretValue,
        props: &DatabaseProps,
    ) -> AwsResult<DatabaseHandle> {
        debug!("Declaring database cluster {}", name);

        let subnet_group = Resource::new(
            &format!("{name}-subnets"),
            "AWS::RDS::DBSubnetGroup",
            json!({
                "DBSubnetGroupDescription": format!("Subnets for {name}"),
                "SubnetIds": vpc.subnets(SubnetType::PrivateWithEgress),
            }),
        );
        let subnet_group_ref = subnet_group.reference();
        stack.add_resource(subnet_group)?;

        let security_group =
            SecurityGroup::new(stack, &format!("{name}-sg"), vpc, "Database cluster access")?;

        let cluster = Resource::new(
            name,
            "AWS::RDS::DBCluster",
            json!({
                "Engine": "aurora-mysql",
                "EngineVersion": props.engine_version.as_str(),
                "MasterUsername": props.master_username,
                "MasterUserPassword": password.to_value(),
                "DatabaseName": props.database_name,
                "DBSubnetGroupName": subnet_group_ref,
                "VpcSecurityGroupIds": [security_group.id],
                "Port": DatabaseHandle::DEFAULT_PORT,
            }),
        );
        let cluster_ref = cluster.reference();
        let endpoint = cluster.attr("Endpoint.Address");
        stack.add_resource(cluster)?;

        stack.add_resource(Resource::new(
            &format!("{name}-instance-1"),
            "AWS::RDS::DBInstance",
            json!({
                "DBClusterIdentifier": cluster_ref,
                "DBInstanceClass": props.instance_type.db_instance_class(),
                "Engine": "aurora-mysql",
            }),
        ))?;

        Ok(DatabaseHandle {
            cluster: cluster_ref,
            endpoint,
            security_group,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec2::{InstanceClass, InstanceSize, Vpc};
    use crate::secrets::Secret;
    use cirrus_graph::StackEnv;

    fn props() -> DatabaseProps {
        DatabaseProps {
            engine_version: AuroraMysqlVersion::V2_10_1,
            instance_type: InstanceType::of(InstanceClass::T3, InstanceSize::Small),
            master_username: "chris".to_string(),
            database_name: "wordpress".to_string(),
        }
    }

    #[test]
    fn test_cluster_declaration() {
        let mut stack = Stack::new("test-stack", StackEnv::new(None, None));
        let vpc = Vpc::new(&mut stack, "ctt-dev-vpc").unwrap();
        let secret = Secret::generated(&mut stack, "ctt-dev-db-secret", "/wordpress-db").unwrap();

        let db = DatabaseCluster::new(
            &mut stack,
            "ctt-dev-wp-db",
            &vpc,
            &secret.value(),
            &props(),
        )
        .unwrap();

        let cluster = stack.resources_of_type("AWS::RDS::DBCluster").next().unwrap();
        assert_eq!(cluster.properties["Engine"], "aurora-mysql");
        assert_eq!(cluster.properties["EngineVersion"], "5.7.mysql_aurora.2.10.1");
        assert_eq!(cluster.properties["MasterUsername"], "chris");
        assert_eq!(cluster.properties["DatabaseName"], "wordpress");
        assert_eq!(cluster.properties["Port"], 3306);

        let instance = stack.resources_of_type("AWS::RDS::DBInstance").next().unwrap();
        assert_eq!(instance.properties["DBInstanceClass"], "db.t3.small");

        assert_eq!(db.endpoint, Attr::get_att("CttDevWpDb", "Endpoint.Address"));
    }

    #[test]
    fn test_password_is_opaque_reference() {
        let mut stack = Stack::new("test-stack", StackEnv::new(None, None));
        let vpc = Vpc::new(&mut stack, "ctt-dev-vpc").unwrap();
        let secret = Secret::generated(&mut stack, "ctt-dev-db-secret", "/wordpress-db").unwrap();

        DatabaseCluster::new(&mut stack, "ctt-dev-wp-db", &vpc, &secret.value(), &props())
            .unwrap();

        let cluster = stack.resources_of_type("AWS::RDS::DBCluster").next().unwrap();
        let password = &cluster.properties["MasterUserPassword"];
        assert!(password["Fn::Sub"]
            .as_str()
            .unwrap()
            .contains("resolve:secretsmanager"));
    }
}
