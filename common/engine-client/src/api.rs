//! The engine operations consumed by the client

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::types::{DirectoryEntry, Disk, JournalEntry, Partition};

/// Trait for engine backends
///
/// [`crate::HttpEngine`] is the production implementation; tests substitute
/// in-memory fakes. Only `authenticate` and `execute` have side effects, and
/// those live entirely in the engine.
#[async_trait]
pub trait EngineApi: Send + Sync {
    /// `POST /login` - returns the engine's textual output
    async fn authenticate(&self, user: &str, pass: &str, partition_id: &str) -> EngineResult<String>;

    /// `POST /execute` - forwards a newline-joined command batch verbatim
    async fn execute(&self, commands: &str) -> EngineResult<String>;

    /// `GET /disks`
    async fn list_disks(&self) -> EngineResult<Vec<Disk>>;

    /// `GET /partitions?diskPath=`
    async fn list_partitions(&self, disk_path: &str) -> EngineResult<Vec<Partition>>;

    /// `GET /filesystem?id=&path=`
    async fn list_directory(&self, partition_id: &str, path: &str) -> EngineResult<Vec<DirectoryEntry>>;

    /// `GET /journal?id=`
    async fn list_journal(&self, partition_id: &str) -> EngineResult<Vec<JournalEntry>>;
}
