//! Snapshot persistence.
//!
//! Two layers with one canonical snapshot shape:
//! - [`local`]: the single-slot same-device store (ephemeral, injectable
//!   key-value boundary)
//! - [`resume`]: the durable per-user registry (cross-device resume)

pub mod errors;
pub mod local;
pub mod resume;

pub use errors::{PersistenceError, PersistenceResult};
pub use local::{KeyValueStore, LocalSnapshotStore, MemoryKeyValue, SNAPSHOT_KEY};
pub use resume::{MemoryResumeRegistry, PgResumeRegistry, ResumeRegistry, check_content};
