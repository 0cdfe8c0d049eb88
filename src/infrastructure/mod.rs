//! Infrastructure layer.
//!
//! Technical concerns supporting the application without business logic:
//! configuration loading and the wiring of adapters into services.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`factory`] - Component factory functions

pub mod config;
pub mod factory;
