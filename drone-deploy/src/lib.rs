//! drone-deploy - classify OSGi/Maven build artifacts and upload them to
//! Eclipse Package Drone.
//!
//! A build produces an unordered pile of JARs: bundles, fragments, features,
//! their `-sources` companions and plain Maven modules. Package Drone wants
//! them as a tree (a bundle below the feature that lists it, sources below
//! their binary), and a child can only be uploaded once its parent has a
//! repository id. This crate works out that tree and uploads it in order.
//!
//! # Example
//!
//! ```no_run
//! use drone_deploy::config::DeployConfig;
//! use drone_deploy::containment::ChildPolicy;
//! use drone_deploy::selection::select_files;
//! use drone_deploy::upload::{ReqwestTransport, TracingSink};
//!
//! let config = DeployConfig::new("drone.example.com", 8080, "releases")
//!     .with_key("deploy-key")
//!     .with_child_policy(ChildPolicy::IncludeChildren)
//!     .with_root("target/repository");
//! let files = select_files(&config.root, &config.patterns)?;
//! let transport = ReqwestTransport::with_timeout(config.key.clone(), config.timeout)
//!     .map_err(|e| drone_deploy::DeployError::InvalidConfig(e.to_string()))?;
//!
//! let report = drone_deploy::deploy(&files, &config, &transport, &TracingSink)?;
//! println!("{}", report);
//! # Ok::<(), drone_deploy::DeployError>(())
//! ```

pub mod archive;
pub mod artifact;
pub mod classify;
pub mod config;
pub mod containment;
pub mod coordinate;
pub mod deploy;
pub mod error;
pub mod logging;
pub mod osgi;
pub mod selection;
pub mod upload;

pub use deploy::{deploy, inspect, plan, DeploymentPlan};
pub use error::{DeployError, DeployResult};
