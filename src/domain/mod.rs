//! Domain layer for tallyboard
//!
//! This module contains the progress counter model, the ports adapters
//! implement, and the error taxonomy shared by every layer.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
