//! Resource types and names exempt from the naming checks
//!
//! Several CDK L2 constructs create children whose ids are not PascalCase
//! (HTTP methods, path parts, generated framework functions, ...). Those are
//! listed here so the PascalCase check does not flag code the user never wrote.

use phf::phf_set;
use serde::Deserialize;

/// Resource types whose construct ids are never checked for casing
pub static EXCLUDED_RESOURCE_TYPES: phf::Set<&'static str> = phf_set! {
    "AWS::ApiGateway::Stage",
    "AWS::ApiGateway::Method",
    "AWS::ApiGateway::Resource",
    "AWS::Lambda::EventSourceMapping",
    "AWS::EC2::EIP",
    "AWS::EC2::InternetGateway",
    "AWS::EC2::VPCGatewayAttachment",
    "AWS::AutoScaling::AutoScalingGroup",
    "AWS::EC2::SecurityGroupIngress",
    "AWS::EC2::SecurityGroupEgress",
    "AWS::CloudFormation::Stack",
    "AWS::CloudFront::Distribution",
    "AWS::SNS::Subscription",
    "AWS::ApiGatewayV2::Integration",
    "AWS::ApiGatewayV2::Route",
    "AWS::Lambda::Permission",
    "AWS::AppConfig::Deployment",
};

/// Construct id prefixes generated by the CDK itself
pub const EXCLUDED_PREFIX_NAMES: &[&str] = &[
    "Custom::",
    // kubectl layer provider framework
    "framework-",
    "waiter-state-machine",
];

/// `(resource type, id substring)` pairs exempt from the casing check
pub const EXCLUDED_RESOURCE_AND_NAME_PATTERNS: &[(&str, &str)] = &[
    // ecs-patterns
    ("AWS::ElasticLoadBalancingV2::LoadBalancer", "LB"),
    // cognito
    ("AWS::IAM::Role", "smsRole"),
];

/// Resource types that legitimately carry "Stack" in their ids
pub static CONTAINING_STACK_NAME_RESOURCES: phf::Set<&'static str> = phf_set! {
    "AWS::CloudFormation::Stack",
    "AWS::CloudFormation::StackSet",
};

pub fn is_excluded_type(resource_type: &str) -> bool {
    EXCLUDED_RESOURCE_TYPES.contains(resource_type)
}

pub fn is_excluded_prefix(construct_id: &str) -> bool {
    EXCLUDED_PREFIX_NAMES
        .iter()
        .any(|prefix| construct_id.starts_with(prefix))
}

pub fn is_excluded_pattern(resource_type: &str, construct_id: &str) -> bool {
    EXCLUDED_RESOURCE_AND_NAME_PATTERNS
        .iter()
        .any(|(ty, pattern)| resource_type == *ty && construct_id.contains(pattern))
}

pub fn may_contain_stack_name(resource_type: &str) -> bool {
    CONTAINING_STACK_NAME_RESOURCES.contains(resource_type)
}

/// A `(resource type, id substring)` exemption
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NamePattern {
    pub resource_type: String,
    pub name_pattern: String,
}

impl NamePattern {
    pub fn new(resource_type: impl Into<String>, name_pattern: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name_pattern: name_pattern.into(),
        }
    }
}

/// Casing exemptions: the built-in tables plus project-specific additions
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Exclusions {
    pub resource_types: Vec<String>,
    pub prefixes: Vec<String>,
    pub patterns: Vec<NamePattern>,
}

impl Exclusions {
    /// Only the built-in tables
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_types.push(resource_type.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    pub fn with_pattern(mut self, pattern: NamePattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Whether a resource of `resource_type` named `construct_id` is exempt
    /// from the casing check
    pub fn is_excluded(&self, resource_type: &str, construct_id: &str) -> bool {
        is_excluded_type(resource_type)
            || is_excluded_prefix(construct_id)
            || is_excluded_pattern(resource_type, construct_id)
            || self.resource_types.iter().any(|ty| ty == resource_type)
            || self
                .prefixes
                .iter()
                .any(|prefix| construct_id.starts_with(prefix.as_str()))
            || self.patterns.iter().any(|p| {
                p.resource_type == resource_type && construct_id.contains(p.name_pattern.as_str())
            })
    }
}
