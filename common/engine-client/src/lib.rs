//! Engine Client - typed access to the disk/partition/filesystem simulator
//!
//! This crate wraps the engine's small HTTP surface:
//!
//! - **Types**: [`Disk`], [`Partition`], [`DirectoryEntry`], [`JournalEntry`]
//! - **API**: the [`EngineApi`] trait, one method per remote operation
//! - **HTTP**: [`HttpEngine`], the `reqwest`-based implementation
//! - **Errors**: [`EngineError`], separating unreachable, non-2xx, rejected
//!   credentials and malformed payloads
//!
//! # Example
//!
//! ```rust,ignore
//! use engine_client::{EngineApi, HttpEngine};
//!
//! let engine = HttpEngine::new("http://localhost:3001")?;
//! for disk in engine.list_disks().await? {
//!     println!("{} ({:.2} MB)", disk.name, disk.size_mb);
//! }
//! ```

pub mod api;
pub mod error;
pub mod http;
pub mod types;

pub use api::EngineApi;
pub use error::{EngineError, EngineResult};
pub use http::{HttpEngine, DEFAULT_TIMEOUT};
pub use types::{
    DirectoryEntry, Disk, EntryKind, ExecuteRequest, Fit, JournalEntry, LoginRequest, Partition,
    PartitionStatus,
};
