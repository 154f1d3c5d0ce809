//! CLI command implementations.

pub mod list;
pub mod run;
pub mod validate;
pub mod version;
