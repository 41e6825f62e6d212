//! In-memory student record store guarded by a single reader/writer lock.

mod memory;
/// Record, patch, and error types.
pub mod types;

pub use memory::StudentStore;
pub use types::{StoreError, StudentPatch, StudentRecord};
