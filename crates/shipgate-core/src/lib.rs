//! Core logic and abstractions for the Shipgate system.
//!
//! This crate defines the project configuration, the command surface, and
//! the two-tier value resolution consumed by the publish gate across the
//! Shipgate workspace.

pub mod command;
pub mod config;
pub mod constants;
pub mod resolver;
pub mod source;

pub use command::{CommandRef, PrimaryCommand};
pub use config::{PackageConfig, RegistryConfig, ShipgateConfig};
pub use resolver::{Resolution, Resolver, Tier};
pub use source::{EnvSource, MapSource, ValueSource};
