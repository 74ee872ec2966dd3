//! Wire types exchanged with the engine
//!
//! Field names follow the engine's JSON (camelCase). Numeric fields are
//! decoded leniently because the engine emits some integers as floats.

use serde::{Deserialize, Deserializer, Serialize};

/// Space-allocation policy reported for a disk or partition
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Fit {
    FirstFit,
    BestFit,
    WorstFit,
    #[default]
    Unknown,
}

impl From<String> for Fit {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ff" | "f" | "firstfit" | "first" => Fit::FirstFit,
            "bf" | "b" | "bestfit" | "best" => Fit::BestFit,
            "wf" | "w" | "worstfit" | "worst" => Fit::WorstFit,
            _ => Fit::Unknown,
        }
    }
}

impl From<Fit> for String {
    fn from(fit: Fit) -> Self {
        fit.code().to_string()
    }
}

impl Fit {
    /// Short code used by the engine's commands (`-fit=BF`)
    pub fn code(&self) -> &'static str {
        match self {
            Fit::FirstFit => "FF",
            Fit::BestFit => "BF",
            Fit::WorstFit => "WF",
            Fit::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Fit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Mount/activity status of a partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PartitionStatus {
    Mounted,
    Unmounted,
    Active,
    Inactive,
    Other(String),
}

impl Default for PartitionStatus {
    fn default() -> Self {
        PartitionStatus::Other(String::new())
    }
}

impl From<String> for PartitionStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mounted" => PartitionStatus::Mounted,
            "unmounted" => PartitionStatus::Unmounted,
            "active" => PartitionStatus::Active,
            "inactive" => PartitionStatus::Inactive,
            _ => PartitionStatus::Other(raw),
        }
    }
}

impl From<PartitionStatus> for String {
    fn from(status: PartitionStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for PartitionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionStatus::Mounted => f.write_str("mounted"),
            PartitionStatus::Unmounted => f.write_str("unmounted"),
            PartitionStatus::Active => f.write_str("active"),
            PartitionStatus::Inactive => f.write_str("inactive"),
            PartitionStatus::Other(raw) => f.write_str(raw),
        }
    }
}

/// A virtual disk known to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    pub name: String,
    /// Unique key for the disk
    pub path: String,
    #[serde(rename = "sizeMB", default)]
    pub size_mb: f64,
    #[serde(default)]
    pub fit: Fit,
    /// Ids of the mounted partitions, absent when the engine reports none
    #[serde(rename = "mountedPartitions", default)]
    pub mounted_partitions: Option<Vec<String>>,
}

/// A mounted partition of a disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    /// Unique within its disk (e.g. `671A`)
    pub id: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "sizeKB", default)]
    pub size_kb: f64,
    #[serde(default)]
    pub fit: Fit,
    #[serde(default)]
    pub status: PartitionStatus,
}

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    File,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub size: u64,
    /// File body; empty for folders
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub perm: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub uid: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub gid: i64,
    /// Epoch seconds
    #[serde(default, deserialize_with = "lenient_i64")]
    pub created: i64,
    /// Epoch seconds
    #[serde(default, deserialize_with = "lenient_i64")]
    pub modified: i64,
}

impl DirectoryEntry {
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

/// One operation recorded in a partition's journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    #[serde(alias = "count", deserialize_with = "lenient_i64")]
    pub sequence: i64,
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub content: String,
    /// Epoch seconds
    #[serde(default, deserialize_with = "lenient_i64")]
    pub date: i64,
}

/// `POST /login` body
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub user: &'a str,
    pub pass: &'a str,
    pub id: &'a str,
}

/// `POST /execute` body
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest<'a> {
    pub command: &'a str,
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value as i64)
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.max(0.0) as u64)
}
