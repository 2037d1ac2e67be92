//! # cirrus_stacks
//!
//! Deployment units for the WordPress stack, composed on the Cirrus
//! resource graph.
//!
//! # Architecture
//!
//! - **NetworkStack**: the isolated virtual network
//! - **DnsStack**: lookup of the pre-existing hosted zone
//! - **CertificateStack**: wildcard certificate validated against the zone
//! - **WordpressStack**: database, file store, auto-scaled web service,
//!   and routing
//! - **Deployment**: composition root threading handles between units
//!
//! # Example
//!
//! ```rust
//! use cirrus_graph::DeploymentContext;
//! use cirrus_stacks::{Deployment, WordpressConfig};
//!
//! let ctx = DeploymentContext::new("ctt", "dev").with_domain("cloudcodetree.com");
//! let app = Deployment::build(&ctx, &WordpressConfig::small()).unwrap();
//! app.validate().unwrap();
//! ```

pub mod certificate;
pub mod config;
pub mod deployment;
pub mod dns;
pub mod error;
pub mod network;
pub mod wordpress;

pub use certificate::CertificateStack;
pub use config::{Profile, WordpressConfig};
pub use deployment::Deployment;
pub use dns::DnsStack;
pub use error::{StackError, StackResult};
pub use network::NetworkStack;
pub use wordpress::WordpressStack;
