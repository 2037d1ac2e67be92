//! DNS: hosted zone lookup and record sets.

use cirrus_graph::{Attr, Resource, Stack};
use serde_json::json;
use tracing::debug;

use crate::error::AwsResult;

/// Handle to a pre-existing public hosted zone.
///
/// The lookup is declared as a data node in the graph, like a provisioning
/// engine data source: the zone must already exist in the target account.
/// A missing zone fails at the engine's apply step, not at declaration
/// time; there is no pre-flight validation here.
#[derive(Debug, Clone)]
pub struct ZoneHandle {
    /// The zone's domain name, without trailing dot.
    pub zone_name: String,
    /// Reference to the resolved zone id.
    pub zone_id: Attr,
}

/// Hosted zone operations.
pub struct HostedZone;

impl HostedZone {
    /// Declare a lookup of an existing zone by domain name.
    pub fn from_lookup(stack: &mut Stack, name: &str, domain_name: &str) -> AwsResult<ZoneHandle> {
        debug!("Declaring hosted zone lookup for {}", domain_name);

        let lookup = Resource::new(
            name,
            "Data::Route53::HostedZone",
            json!({ "DomainName": domain_name }),
        );
        let zone_id = lookup.attr("Id");
        stack.add_resource(lookup)?;

        Ok(ZoneHandle {
            zone_name: domain_name.to_string(),
            zone_id,
        })
    }
}

/// An alias A record pointing a name at a load balancer.
pub struct ARecord;

impl ARecord {
    /// Declare an alias record `record_name.zone` targeting the alias
    /// endpoint given by its DNS name and canonical hosted zone id.
    pub fn alias(
        stack: &mut Stack,
        name: &str,
        zone: &ZoneHandle,
        record_name: &str,
        target_dns: &Attr,
        target_zone_id: &Attr,
    ) -> AwsResult<()> {
        let fqdn = if record_name.is_empty() {
            format!("{}.", zone.zone_name)
        } else {
            format!("{}.{}.", record_name, zone.zone_name)
        };

        stack.add_resource(Resource::new(
            name,
            "AWS::Route53::RecordSet",
            json!({
                "HostedZoneId": zone.zone_id,
                "Name": fqdn,
                "Type": "A",
                "AliasTarget": {
                    "DNSName": target_dns,
                    "HostedZoneId": target_zone_id,
                },
            }),
        ))?;
        Ok(())
    }
}
