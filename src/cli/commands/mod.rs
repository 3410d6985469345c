//! CLI command implementations.

pub mod goal;
pub mod init;
pub mod progress;
pub mod seed;
pub mod week;
