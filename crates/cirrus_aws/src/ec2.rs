//! Network primitives: VPC, subnets, security groups, instance types.

use cirrus_graph::{Attr, Resource, Stack};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::AwsResult;

/// Subnet placement categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubnetType {
    /// Routable from the internet through the internet gateway.
    Public,
    /// Private with outbound access through the NAT gateway.
    PrivateWithEgress,
}

/// Handle to a declared VPC, shared by downstream units.
///
/// Carries unresolved references only; no unit can mutate the network
/// after creation.
#[derive(Debug, Clone)]
pub struct VpcHandle {
    /// Reference to the VPC itself.
    pub vpc: Attr,
    public_subnets: Vec<Attr>,
    private_subnets: Vec<Attr>,
}

impl VpcHandle {
    /// Subnet references for the given placement.
    pub fn subnets(&self, subnet_type: SubnetType) -> &[Attr] {
        match subnet_type {
            SubnetType::Public => &self.public_subnets,
            SubnetType::PrivateWithEgress => &self.private_subnets,
        }
    }
}

/// An isolated virtual network with default addressing.
///
/// Declares the VPC, one public and one private-with-egress subnet in each
/// of two availability zones, an internet gateway, and a NAT gateway with
/// the route tables wiring them together. All inputs beyond the derived
/// name are fixed.
pub struct Vpc;

impl Vpc {
    const CIDR: &'static str = "10.0.0.0/16";
    const PUBLIC_CIDRS: [&'static str; 2] = ["10.0.0.0/20", "10.0.16.0/20"];
    const PRIVATE_CIDRS: [&'static str; 2] = ["10.0.128.0/20", "10.0.144.0/20"];

    /// Declare the network into `stack` and return its handle.
    pub fn new(stack: &mut Stack, name: &str) -> AwsResult<VpcHandle> {
        debug!("Declaring VPC {}", name);

        let vpc = Resource::new(
            name,
            "AWS::EC2::VPC",
            json!({
                "CidrBlock": Self::CIDR,
                "EnableDnsSupport": true,
                "EnableDnsHostnames": true,
                "Tags": [{ "Key": "Name", "Value": name }],
            }),
        );
        let vpc_ref = vpc.reference();
        stack.add_resource(vpc)?;

        let igw = Resource::new(&format!("{name}-igw"), "AWS::EC2::InternetGateway", json!({}));
        let igw_ref = igw.reference();
        stack.add_resource(igw)?;

        let attachment = Resource::new(
            &format!("{name}-igw-attach"),
            "AWS::EC2::VPCGatewayAttachment",
            json!({
                "VpcId": vpc_ref,
                "InternetGatewayId": igw_ref,
            }),
        );
        let attachment_id = attachment.logical_id.clone();
        stack.add_resource(attachment)?;

        let mut public_subnets = Vec::new();
        let mut private_subnets = Vec::new();

        for (az_index, (public_cidr, private_cidr)) in Self::PUBLIC_CIDRS
            .iter()
            .zip(Self::PRIVATE_CIDRS.iter())
            .enumerate()
        {
            let az = json!({ "Fn::Select": [az_index, { "Fn::GetAZs": "" }] });

            let public = Resource::new(
                &format!("{name}-public-{}", az_index + 1),
                "AWS::EC2::Subnet",
                json!({
                    "VpcId": vpc_ref,
                    "CidrBlock": public_cidr,
                    "AvailabilityZone": az,
                    "MapPublicIpOnLaunch": true,
                    "Tags": [{ "Key": "Name", "Value": format!("{name}-public-{}", az_index + 1) }],
                }),
            );
            public_subnets.push(public.reference());
            stack.add_resource(public)?;

            let private = Resource::new(
                &format!("{name}-private-{}", az_index + 1),
                "AWS::EC2::Subnet",
                json!({
                    "VpcId": vpc_ref,
                    "CidrBlock": private_cidr,
                    "AvailabilityZone": az,
                    "Tags": [{ "Key": "Name", "Value": format!("{name}-private-{}", az_index + 1) }],
                }),
            );
            private_subnets.push(private.reference());
            stack.add_resource(private)?;
        }

        let eip = Resource::new(
            &format!("{name}-nat-eip"),
            "AWS::EC2::EIP",
            json!({ "Domain": "vpc" }),
        )
        .depends_on(&attachment_id);
        let eip_logical = eip.logical_id.clone();
        stack.add_resource(eip)?;

        let nat = Resource::new(
            &format!("{name}-nat"),
            "AWS::EC2::NatGateway",
            json!({
                "AllocationId": Attr::get_att(&eip_logical, "AllocationId"),
                "SubnetId": public_subnets[0],
            }),
        );
        let nat_ref = nat.reference();
        stack.add_resource(nat)?;

        Self::route_table(
            stack,
            &format!("{name}-public-rt"),
            &vpc_ref,
            json!({ "GatewayId": igw_ref }),
            Some(&attachment_id),
            &public_subnets,
        )?;
        Self::route_table(
            stack,
            &format!("{name}-private-rt"),
            &vpc_ref,
            json!({ "NatGatewayId": nat_ref }),
            None,
            &private_subnets,
        )?;

        Ok(VpcHandle {
            vpc: vpc_ref,
            public_subnets,
            private_subnets,
        })
    }

    fn route_table(
        stack: &mut Stack,
        name: &str,
        vpc: &Attr,
        route_target: Value,
        depends_on: Option<&str>,
        subnets: &[Attr],
    ) -> AwsResult<()> {
        let table = Resource::new(name, "AWS::EC2::RouteTable", json!({ "VpcId": vpc }));
        let table_ref = table.reference();
        stack.add_resource(table)?;

        let mut route_props = json!({
            "RouteTableId": table_ref,
            "DestinationCidrBlock": "0.0.0.0/0",
        });
        if let Value::Object(target) = route_target {
            for (key, value) in target {
                route_props[key] = value;
            }
        }
        let mut route = Resource::new(&format!("{name}-default"), "AWS::EC2::Route", route_props);
        if let Some(dep) = depends_on {
            route = route.depends_on(dep);
        }
        stack.add_resource(route)?;

        for (index, subnet) in subnets.iter().enumerate() {
            stack.add_resource(Resource::new(
                &format!("{name}-assoc-{}", index + 1),
                "AWS::EC2::SubnetRouteTableAssociation",
                json!({
                    "RouteTableId": table_ref,
                    "SubnetId": subnet,
                }),
            ))?;
        }
        Ok(())
    }
}

/// A declared security group.
#[derive(Debug, Clone)]
pub struct SecurityGroup {
    /// Reference to the group id.
    pub id: Attr,
    name: String,
}

impl SecurityGroup {
    /// Declare a security group in the VPC.
    pub fn new(
        stack: &mut Stack,
        name: &str,
        vpc: &VpcHandle,
        description: &str,
    ) -> AwsResult<Self> {
        let group = Resource::new(
            name,
            "AWS::EC2::SecurityGroup",
            json!({
                "GroupDescription": description,
                "VpcId": vpc.vpc,
            }),
        );
        let id = group.reference();
        stack.add_resource(group)?;
        Ok(Self {
            id,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Permit inbound TCP traffic on `port` from `source`.
    ///
    /// Declared as a standalone ingress resource so rules between groups in
    /// different units never form a property cycle.
    pub fn allow_from(
        &self,
        stack: &mut Stack,
        source: &SecurityGroup,
        port: u16,
        description: &str,
    ) -> AwsResult<()> {
        stack.add_resource(Resource::new(
            &format!("{}-from-{}-{}", self.name, source.name, port),
            "AWS::EC2::SecurityGroupIngress",
            json!({
                "GroupId": self.id,
                "SourceSecurityGroupId": source.id,
                "IpProtocol": "tcp",
                "FromPort": port,
                "ToPort": port,
                "Description": description,
            }),
        ))?;
        Ok(())
    }

    /// Permit inbound TCP traffic on `port` from anywhere.
    pub fn allow_from_anywhere(
        &self,
        stack: &mut Stack,
        port: u16,
        description: &str,
    ) -> AwsResult<()> {
        stack.add_resource(Resource::new(
            &format!("{}-open-{}", self.name, port),
            "AWS::EC2::SecurityGroupIngress",
            json!({
                "GroupId": self.id,
                "CidrIp": "0.0.0.0/0",
                "IpProtocol": "tcp",
                "FromPort": port,
                "ToPort": port,
                "Description": description,
            }),
        ))?;
        Ok(())
    }
}

/// Database/compute instance classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceClass {
    T3,
    T4g,
    R5,
    R6g,
}

impl InstanceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceClass::T3 => "t3",
            InstanceClass::T4g => "t4g",
            InstanceClass::R5 => "r5",
            InstanceClass::R6g => "r6g",
        }
    }
}

/// Instance sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceSize {
    Small,
    Medium,
    Large,
    Xlarge,
}

impl InstanceSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceSize::Small => "small",
            InstanceSize::Medium => "medium",
            InstanceSize::Large => "large",
            InstanceSize::Xlarge => "xlarge",
        }
    }
}

/// An instance type composed from class and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceType {
    pub class: InstanceClass,
    pub size: InstanceSize,
}

impl InstanceType {
    pub fn of(class: InstanceClass, size: InstanceSize) -> Self {
        Self { class, size }
    }

    /// Render as an EC2 instance type string, e.g. `t3.small`.
    pub fn instance_type(&self) -> String {
        format!("{}.{}", self.class.as_str(), self.size.as_str())
    }

    /// Render as an RDS instance class string, e.g. `db.t3.small`.
    pub fn db_instance_class(&self) -> String {
        format!("db.{}", self.instance_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_graph::StackEnv;

    fn stack() -> Stack {
        Stack::new("test-stack", StackEnv::new(None, None))
    }

    #[test]
    fn test_vpc_declares_default_layout() {
        let mut stack = stack();
        let handle = Vpc::new(&mut stack, "ctt-dev-vpc").unwrap();

        assert_eq!(handle.subnets(SubnetType::Public).len(), 2);
        assert_eq!(handle.subnets(SubnetType::PrivateWithEgress).len(), 2);
        assert_eq!(stack.resources_of_type("AWS::EC2::VPC").count(), 1);
        assert_eq!(stack.resources_of_type("AWS::EC2::Subnet").count(), 4);
        assert_eq!(stack.resources_of_type("AWS::EC2::NatGateway").count(), 1);
        stack.validate().unwrap();
    }

    #[test]
    fn test_security_group_ingress_rule() {
        let mut stack = stack();
        let vpc = Vpc::new(&mut stack, "ctt-dev-vpc").unwrap();
        let db = SecurityGroup::new(&mut stack, "ctt-dev-db-sg", &vpc, "database").unwrap();
        let svc = SecurityGroup::new(&mut stack, "ctt-dev-svc-sg", &vpc, "service").unwrap();

        db.allow_from(&mut stack, &svc, 3306, "service to database").unwrap();

        let rules: Vec<_> = stack
            .resources_of_type("AWS::EC2::SecurityGroupIngress")
            .collect();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].properties["FromPort"], 3306);
        assert_eq!(rules[0].properties["GroupId"], db.id.to_value());
    }

    #[test]
    fn test_instance_type_rendering() {
        let small = InstanceType::of(InstanceClass::T3, InstanceSize::Small);
        assert_eq!(small.instance_type(), "t3.small");
        assert_eq!(small.db_instance_class(), "db.t3.small");

        let large = InstanceType::of(InstanceClass::R5, InstanceSize::Large);
        assert_eq!(large.db_instance_class(), "db.r5.large");
    }
}
