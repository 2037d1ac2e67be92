//! Target-tracking auto-scaling for container services.

use cirrus_graph::{Resource, Stack};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::ecs::ServiceHandle;
use crate::error::{AwsError, AwsResult};

const SERVICE_LINKED_ROLE: &str = "arn:aws:iam::${AWS::AccountId}:role/aws-service-role/ecs.application-autoscaling.amazonaws.com/AWSServiceRoleForApplicationAutoScaling_ECSService";

/// Target-tracking scaling policy with static instance bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoScalingPolicy {
    pub min_capacity: u32,
    pub max_capacity: u32,
    /// CPU utilization the policy holds the service near, in percent.
    pub cpu_target_percent: u32,
    /// Memory utilization the policy holds the service near, in percent.
    pub memory_target_percent: u32,
}

impl AutoScalingPolicy {
    /// Create a policy. Fails unless `min_capacity <= max_capacity`.
    pub fn new(min_capacity: u32, max_capacity: u32) -> AwsResult<Self> {
        let policy = Self {
            min_capacity,
            max_capacity,
            cpu_target_percent: 75,
            memory_target_percent: 75,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn with_cpu_target(mut self, percent: u32) -> Self {
        self.cpu_target_percent = percent;
        self
    }

    pub fn with_memory_target(mut self, percent: u32) -> Self {
        self.memory_target_percent = percent;
        self
    }

    /// Check the bounds invariant.
    pub fn validate(&self) -> AwsResult<()> {
        if self.min_capacity > self.max_capacity {
            return Err(AwsError::InvalidScalingBounds {
                min: self.min_capacity,
                max: self.max_capacity,
            });
        }
        Ok(())
    }
}

/// Declare a scalable target and CPU/memory target-tracking policies for
/// a service.
pub fn enable_target_tracking(
    stack: &mut Stack,
    name: &str,
    service: &ServiceHandle,
    policy: &AutoScalingPolicy,
) -> AwsResult<()> {
    policy.validate()?;
    debug!(
        "Declaring target tracking for {} ({}..{})",
        name, policy.min_capacity, policy.max_capacity
    );

    let target = Resource::new(
        &format!("{name}-scaling-target"),
        "AWS::ApplicationAutoScaling::ScalableTarget",
        json!({
            "MinCapacity": policy.min_capacity,
            "MaxCapacity": policy.max_capacity,
            "ResourceId": {
                "Fn::Join": ["/", ["service", service.cluster, service.service_name]],
            },
            "RoleARN": { "Fn::Sub": SERVICE_LINKED_ROLE },
            "ScalableDimension": "ecs:service:DesiredCount",
            "ServiceNamespace": "ecs",
        }),
    );
    let target_ref = target.reference();
    stack.add_resource(target)?;

    for (suffix, metric, target_value) in [
        (
            "cpu",
            "ECSServiceAverageCPUUtilization",
            policy.cpu_target_percent,
        ),
        (
            "memory",
            "ECSServiceAverageMemoryUtilization",
            policy.memory_target_percent,
        ),
    ] {
        stack.add_resource(Resource::new(
            &format!("{name}-{suffix}-scaling"),
            "AWS::ApplicationAutoScaling::ScalingPolicy",
            json!({
                "PolicyName": format!("{name}-{suffix}-scaling"),
                "PolicyType": "TargetTrackingScaling",
                "ScalingTargetId": target_ref,
                "TargetTrackingScalingPolicyConfiguration": {
                    "PredefinedMetricSpecification": {
                        "PredefinedMetricType": metric,
                    },
                    "TargetValue": target_value,
                },
            }),
        ))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_invariant() {
        assert!(AutoScalingPolicy::new(1, 10).is_ok());
        assert!(AutoScalingPolicy::new(3, 40).is_ok());
        assert!(AutoScalingPolicy::new(5, 5).is_ok());

        let err = AutoScalingPolicy::new(10, 1).unwrap_err();
        assert!(matches!(
            err,
            AwsError::InvalidScalingBounds { min: 10, max: 1 }
        ));
    }

    #[test]
    fn test_target_defaults() {
        let policy = AutoScalingPolicy::new(1, 10).unwrap();
        assert_eq!(policy.cpu_target_percent, 75);
        assert_eq!(policy.memory_target_percent, 75);

        let tuned = policy.with_cpu_target(60).with_memory_target(80);
        assert_eq!(tuned.cpu_target_percent, 60);
        assert_eq!(tuned.memory_target_percent, 80);
    }
}
