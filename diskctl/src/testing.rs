//! In-memory engine for unit tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use engine_client::{
    DirectoryEntry, Disk, EngineApi, EngineError, EngineResult, EntryKind, Fit, JournalEntry,
    Partition, PartitionStatus,
};

/// A request received by [`FakeEngine`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Authenticate { user: String, partition_id: String },
    Execute(String),
    Disks,
    Partitions(String),
    Directory { partition_id: String, path: String },
    Journal(String),
}

/// Scripted engine that records every call
#[derive(Default)]
pub struct FakeEngine {
    calls: Mutex<Vec<Call>>,
    pub disks: Vec<Disk>,
    pub disks_error: Option<EngineError>,
    pub partitions: HashMap<String, Vec<Partition>>,
    pub directories: HashMap<(String, String), Vec<DirectoryEntry>>,
    pub journals: HashMap<String, Vec<JournalEntry>>,
    /// Artificial latency per disk path or directory path
    pub delays: HashMap<String, Duration>,
}

pub fn disk(name: &str, mounted: &[&str]) -> Disk {
    Disk {
        name: name.to_string(),
        path: format!("/tmp/{}", name),
        size_mb: 5.0,
        fit: Fit::FirstFit,
        mounted_partitions: Some(mounted.iter().map(|id| id.to_string()).collect()),
    }
}

pub fn partition(id: &str, disk_name: &str) -> Partition {
    Partition {
        id: id.to_string(),
        path: format!("/tmp/{}", disk_name),
        name: format!("P{}", id),
        size_kb: 1024.0,
        fit: Fit::BestFit,
        status: PartitionStatus::Mounted,
    }
}

pub fn entry(name: &str, kind: EntryKind) -> DirectoryEntry {
    DirectoryEntry {
        name: name.to_string(),
        kind,
        size: if kind == EntryKind::File { 12 } else { 0 },
        content: if kind == EntryKind::File {
            "hello world\n".to_string()
        } else {
            String::new()
        },
        perm: "664".to_string(),
        uid: 1,
        gid: 1,
        created: 1_700_000_000,
        modified: 1_700_000_000,
    }
}

impl FakeEngine {
    /// Two disks; `a.mia` has partition 671A with `/docs/notes.txt`
    pub fn with_sample_tree() -> Self {
        let mut engine = Self {
            disks: vec![disk("a.mia", &["671A"]), disk("b.mia", &[])],
            ..Self::default()
        };
        engine
            .partitions
            .insert("/tmp/a.mia".into(), vec![partition("671A", "a.mia")]);
        engine.partitions.insert("/tmp/b.mia".into(), vec![]);
        engine.directories.insert(
            ("671A".into(), "/".into()),
            vec![entry("docs", EntryKind::Folder), entry("users.txt", EntryKind::File)],
        );
        engine.directories.insert(
            ("671A".into(), "/docs".into()),
            vec![entry("notes.txt", EntryKind::File)],
        );
        engine.journals.insert(
            "671A".into(),
            vec![JournalEntry {
                sequence: 1,
                operation: "mkdir".into(),
                path: "/docs".into(),
                content: String::new(),
                date: 1_700_000_000,
            }],
        );
        engine
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn delay(&self, key: &str) {
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait]
impl EngineApi for FakeEngine {
    async fn authenticate(&self, user: &str, pass: &str, partition_id: &str) -> EngineResult<String> {
        self.record(Call::Authenticate {
            user: user.to_string(),
            partition_id: partition_id.to_string(),
        });
        if pass == "123" {
            Ok(format!("Sesión iniciada: {}", user))
        } else {
            Err(EngineError::Rejected("Error: contraseña incorrecta".into()))
        }
    }

    async fn execute(&self, commands: &str) -> EngineResult<String> {
        self.record(Call::Execute(commands.to_string()));
        Ok(format!("{} line(s) processed", commands.lines().count()))
    }

    async fn list_disks(&self) -> EngineResult<Vec<Disk>> {
        self.record(Call::Disks);
        match &self.disks_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.disks.clone()),
        }
    }

    async fn list_partitions(&self, disk_path: &str) -> EngineResult<Vec<Partition>> {
        self.record(Call::Partitions(disk_path.to_string()));
        self.delay(disk_path).await;
        self.partitions
            .get(disk_path)
            .cloned()
            .ok_or_else(|| EngineError::Status {
                status: 404,
                message: "Error: disco no encontrado".into(),
            })
    }

    async fn list_directory(&self, partition_id: &str, path: &str) -> EngineResult<Vec<DirectoryEntry>> {
        self.record(Call::Directory {
            partition_id: partition_id.to_string(),
            path: path.to_string(),
        });
        self.delay(path).await;
        self.directories
            .get(&(partition_id.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| EngineError::Status {
                status: 404,
                message: "Error: ruta no encontrada".into(),
            })
    }

    async fn list_journal(&self, partition_id: &str) -> EngineResult<Vec<JournalEntry>> {
        self.record(Call::Journal(partition_id.to_string()));
        self.journals
            .get(partition_id)
            .cloned()
            .ok_or_else(|| EngineError::Status {
                status: 404,
                message: "Error: partición no encontrada".into(),
            })
    }
}
