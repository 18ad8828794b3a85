//! Builders for assembling configurations in tests.

mod config;

pub use config::ConfigBuilder;
