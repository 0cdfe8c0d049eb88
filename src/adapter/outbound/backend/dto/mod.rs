//! Backend data transfer objects.
//!
//! Contains the realtime frame envelope and REST request bodies.

pub mod message;
pub mod request;
