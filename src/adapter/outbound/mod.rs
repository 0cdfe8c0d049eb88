//! Outbound adapters (driven side).

pub mod backend;
