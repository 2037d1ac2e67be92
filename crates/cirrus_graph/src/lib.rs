//! # cirrus_graph
//!
//! Resource graph core for Cirrus.
//!
//! This crate provides the in-memory resource graph that every deployment
//! unit declares into, and the synthesis step that renders it as template
//! documents for the external provisioning engine. The engine owns
//! dependency ordering, change-set computation, and rollback; this crate
//! only emits the declarative graph it consumes.
//!
//! # Architecture
//!
//! - **Resources**: typed property bags with template logical ids
//! - **Attr tokens**: unresolved references, resolved by the engine at apply
//! - **Stacks**: named, independently deployable resource groups
//! - **App**: ordered stack collection, validated and synthesized as a unit
//!
//! # Example
//!
//! ```rust
//! use cirrus_graph::{App, DeploymentContext, Resource, Stack, StackEnv};
//! use serde_json::json;
//!
//! let ctx = DeploymentContext::new("ctt", "dev").with_domain("example.com");
//!
//! let mut stack = Stack::new(
//!     ctx.resource_name("vpc-stack"),
//!     StackEnv::new(ctx.account.clone(), ctx.region.clone()),
//! );
//! stack
//!     .add_resource(Resource::new(
//!         &ctx.resource_name("vpc"),
//!         "AWS::EC2::VPC",
//!         json!({ "CidrBlock": "10.0.0.0/16" }),
//!     ))
//!     .unwrap();
//!
//! let mut app = App::new();
//! app.add_stack(stack).unwrap();
//! app.validate().unwrap();
//! ```

pub mod app;
pub mod context;
pub mod error;
pub mod resource;
pub mod stack;

pub use app::{App, SynthManifest, SynthStackEntry};
pub use context::DeploymentContext;
pub use error::{GraphError, GraphResult};
pub use resource::{logical_id, Attr, Resource};
pub use stack::{Output, Stack, StackEnv};
