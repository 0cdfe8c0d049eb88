//! Configuration loading and validation.

pub mod logging;
pub mod monitor;
pub mod retry;
pub mod settings;

pub use settings::Config;
