//! Integration tests for the composed WordPress deployment.

use std::fs;

use cirrus_graph::{App, DeploymentContext};
use cirrus_stacks::{Deployment, Profile, WordpressConfig};
use serde_json::Value;
use tempfile::tempdir;

fn context() -> DeploymentContext {
    DeploymentContext::new("ctt", "dev")
        .with_domain("cloudcodetree.com")
        .with_env("123456789012", "us-east-1")
}

fn build() -> App {
    Deployment::build(&context(), &WordpressConfig::small()).unwrap()
}

#[test]
fn test_units_compose_in_fixed_order() {
    let app = build();

    let names: Vec<_> = app.stacks().iter().map(|s| s.name()).collect();
    assert_eq!(
        names,
        vec![
            "ctt-dev-vpc-stack",
            "ctt-dev-route53-stack",
            "ctt-dev-acm-stack",
            "ctt-dev-wordpress-stack",
        ]
    );
}

#[test]
fn test_graph_validates() {
    build().validate().unwrap();
}

#[test]
fn test_application_unit_consumes_all_handles() {
    let app = build();
    let wordpress = app.stack("ctt-dev-wordpress-stack").unwrap();

    let targets = wordpress.reference_targets();
    // Network handle: placement of the data layer and service.
    assert!(targets.iter().any(|t| t == "CttDevVpc"));
    // Zone handle: alias record into the looked-up zone.
    assert!(targets.iter().any(|t| t == "CttDevHostedZone"));
    // Certificate handle: attached to the HTTPS listener.
    assert!(targets.iter().any(|t| t == "CttDevWildcardCert"));
}

#[test]
fn test_exactly_one_rule_into_each_data_layer_group() {
    let app = build();
    let wordpress = app.stack("ctt-dev-wordpress-stack").unwrap();

    let service_source = serde_json::json!({ "Ref": "CttDevWpSrvSg" });
    let rules: Vec<_> = wordpress
        .resources_of_type("AWS::EC2::SecurityGroupIngress")
        .filter(|r| r.properties["SourceSecurityGroupId"] == service_source)
        .collect();

    assert_eq!(rules.len(), 2, "compute opens exactly two data-layer rules");

    let db_rules: Vec<_> = rules
        .iter()
        .filter(|r| r.properties["GroupId"]["Ref"] == "CttDevWpDbSg")
        .collect();
    assert_eq!(db_rules.len(), 1);
    assert_eq!(db_rules[0].properties["FromPort"], 3306);
    assert_eq!(db_rules[0].properties["ToPort"], 3306);

    let fs_rules: Vec<_> = rules
        .iter()
        .filter(|r| r.properties["GroupId"]["Ref"] == "CttDevFxSg")
        .collect();
    assert_eq!(fs_rules.len(), 1);
    assert_eq!(fs_rules[0].properties["FromPort"], 2049);
}

#[test]
fn test_no_other_source_reaches_the_data_layer() {
    let app = build();
    let wordpress = app.stack("ctt-dev-wordpress-stack").unwrap();

    for rule in wordpress.resources_of_type("AWS::EC2::SecurityGroupIngress") {
        let group = rule.properties["GroupId"]["Ref"].as_str().unwrap_or_default();
        if group == "CttDevWpDbSg" || group == "CttDevFxSg" {
            assert_eq!(
                rule.properties["SourceSecurityGroupId"]["Ref"],
                "CttDevWpSrvSg"
            );
        }
    }
}

#[test]
fn test_scaling_bounds_for_both_profiles() {
    for profile in Profile::all() {
        let config = WordpressConfig::for_profile(profile);
        let app = Deployment::build(&context(), &config).unwrap();
        let wordpress = app.stack("ctt-dev-wordpress-stack").unwrap();

        let target = wordpress
            .resources_of_type("AWS::ApplicationAutoScaling::ScalableTarget")
            .next()
            .unwrap();
        let min = target.properties["MinCapacity"].as_u64().unwrap();
        let max = target.properties["MaxCapacity"].as_u64().unwrap();
        assert!(min <= max, "profile {profile}: min {min} > max {max}");
    }
}

#[test]
fn test_alias_record_and_bare_domain_redirect() {
    let app = build();
    let wordpress = app.stack("ctt-dev-wordpress-stack").unwrap();

    let record = wordpress
        .resources_of_type("AWS::Route53::RecordSet")
        .next()
        .unwrap();
    assert_eq!(record.properties["Name"], "blog.cloudcodetree.com.");

    let redirect = wordpress
        .resources_of_type("AWS::ElasticLoadBalancingV2::ListenerRule")
        .next()
        .unwrap();
    assert_eq!(
        redirect.properties["Conditions"][0]["HostHeaderConfig"]["Values"][0],
        "cloudcodetree.com"
    );
    assert_eq!(
        redirect.properties["Actions"][0]["RedirectConfig"]["Host"],
        "blog.cloudcodetree.com"
    );
}

#[test]
fn test_stack_env_carries_account_and_region() {
    let app = build();
    for stack in app.stacks() {
        assert_eq!(stack.env().account.as_deref(), Some("123456789012"));
        assert_eq!(stack.env().region.as_deref(), Some("us-east-1"));
    }
}

#[test]
fn test_synthesis_writes_one_template_per_unit() {
    let dir = tempdir().unwrap();
    let manifest = build().synth(dir.path()).unwrap();

    assert_eq!(manifest.stacks.len(), 4);
    for entry in &manifest.stacks {
        let path = dir.path().join(&entry.template_file);
        let raw = fs::read_to_string(&path).unwrap();
        let template: Value = serde_json::from_str(&raw).unwrap();
        assert!(template["Resources"].is_object(), "{path:?} has resources");
    }
}

#[test]
fn test_synthesis_is_deterministic() {
    let dir_a = tempdir().unwrap();
    let dir_b = tempdir().unwrap();

    build().synth(dir_a.path()).unwrap();
    build().synth(dir_b.path()).unwrap();

    for file in [
        "ctt-dev-vpc-stack.template.json",
        "ctt-dev-route53-stack.template.json",
        "ctt-dev-acm-stack.template.json",
        "ctt-dev-wordpress-stack.template.json",
        "manifest.json",
    ] {
        let a = fs::read_to_string(dir_a.path().join(file)).unwrap();
        let b = fs::read_to_string(dir_b.path().join(file)).unwrap();
        assert_eq!(a, b, "{file} differs between runs");
    }
}
