//! Infrastructure adapters for the progress store and goal catalog.

pub mod memory;
pub mod sqlite;
