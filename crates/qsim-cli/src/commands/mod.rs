//! CLI command implementations.

pub mod common;
pub mod experiment;
pub mod gates;
pub mod run;
pub mod version;
