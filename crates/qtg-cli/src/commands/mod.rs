//! CLI command implementations.

pub mod common;
pub mod inspect;
pub mod prepare;
pub mod solve;
pub mod version;
