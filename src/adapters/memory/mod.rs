//! In-process adapters.

pub mod progress_store;

pub use progress_store::{InMemoryProgressStore, StoreCalls};
