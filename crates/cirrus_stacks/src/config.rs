//! Parameterized WordPress deployment configuration.

use cirrus_aws::{AuroraMysqlVersion, AutoScalingPolicy, InstanceClass, InstanceSize, InstanceType};
use serde::{Deserialize, Serialize};

/// Sizing profiles for the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Small,
    Large,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Small => "small",
            Profile::Large => "large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" => Some(Profile::Small),
            "large" => Some(Profile::Large),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Profile::Small, Profile::Large]
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// All tunable inputs of the application unit.
///
/// One definition covers every environment; profiles differ only in the
/// values carried here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordpressConfig {
    /// Public container image the service runs.
    pub image: String,
    pub cpu: u32,
    pub memory_mib: u32,
    pub desired_count: u32,
    /// Fixed database master username.
    pub db_user: String,
    pub db_name: String,
    pub table_prefix: String,
    /// Name under which the generated credential secret is stored.
    pub db_secret_name: String,
    pub db_engine_version: AuroraMysqlVersion,
    pub db_instance_type: InstanceType,
    pub file_system_name: String,
    /// Path the shared file store is mounted at inside the container.
    pub web_root: String,
    /// Subdomain the service is published under.
    pub subdomain: String,
    pub health_check_path: String,
    pub healthy_http_codes: String,
    pub scaling: AutoScalingPolicy,
}

impl WordpressConfig {
    /// Small profile: burstable database instance, narrow scaling range.
    pub fn small() -> Self {
        Self {
            image: "library/wordpress:latest".to_string(),
            cpu: 256,
            memory_mib: 1024,
            desired_count: 1,
            db_user: "chris".to_string(),
            db_name: "wordpress".to_string(),
            table_prefix: "wp_".to_string(),
            db_secret_name: "/wordpress-db".to_string(),
            db_engine_version: AuroraMysqlVersion::V2_10_1,
            db_instance_type: InstanceType::of(InstanceClass::T3, InstanceSize::Small),
            file_system_name: "wordpress".to_string(),
            web_root: "/var/www/html".to_string(),
            subdomain: "blog".to_string(),
            health_check_path: "/".to_string(),
            healthy_http_codes: "200-399".to_string(),
            scaling: AutoScalingPolicy {
                min_capacity: 1,
                max_capacity: 10,
                cpu_target_percent: 75,
                memory_target_percent: 75,
            },
        }
    }

    /// Large profile: memory-optimized database instance, wide scaling range.
    pub fn large() -> Self {
        Self {
            desired_count: 3,
            db_engine_version: AuroraMysqlVersion::V3_02_1,
            db_instance_type: InstanceType::of(InstanceClass::R5, InstanceSize::Large),
            scaling: AutoScalingPolicy {
                min_capacity: 3,
                max_capacity: 40,
                cpu_target_percent: 75,
                memory_target_percent: 75,
            },
            ..Self::small()
        }
    }

    /// Configuration for a named profile.
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Small => Self::small(),
            Profile::Large => Self::large(),
        }
    }
}

impl Default for WordpressConfig {
    fn default() -> Self {
        Self::small()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_satisfy_scaling_invariant() {
        for profile in Profile::all() {
            let config = WordpressConfig::for_profile(profile);
            assert!(
                config.scaling.min_capacity <= config.scaling.max_capacity,
                "profile {profile} violates scaling bounds"
            );
        }
    }

    #[test]
    fn test_small_profile_values() {
        let config = WordpressConfig::small();
        assert_eq!(config.image, "library/wordpress:latest");
        assert_eq!(config.cpu, 256);
        assert_eq!(config.memory_mib, 1024);
        assert_eq!(config.db_instance_type.db_instance_class(), "db.t3.small");
        assert_eq!(config.scaling.min_capacity, 1);
        assert_eq!(config.scaling.max_capacity, 10);
    }

    #[test]
    fn test_large_profile_values() {
        let config = WordpressConfig::large();
        assert_eq!(config.db_instance_type.db_instance_class(), "db.r5.large");
        assert_eq!(config.scaling.min_capacity, 3);
        assert_eq!(config.scaling.max_capacity, 40);
        assert_eq!(config.desired_count, 3);
    }

    #[test]
    fn test_profile_round_trip() {
        assert_eq!(Profile::from_str("small"), Some(Profile::Small));
        assert_eq!(Profile::from_str("LARGE"), Some(Profile::Large));
        assert_eq!(Profile::from_str("medium"), None);
    }
}
