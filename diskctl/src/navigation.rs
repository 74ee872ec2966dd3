//! Disk → partition → directory navigation
//!
//! The [`Navigator`] is a plain state machine. Transitions that change the
//! active resource return a [`Ticket`] describing exactly one fetch; the
//! caller runs it (inline or on a spawned task) and hands the
//! [`FetchOutcome`] back to [`Navigator::apply`]. Outcomes of superseded
//! tickets are discarded.
//!
//! ```text
//! NoDiskSelected --select_disk--> DiskSelected --select_partition--> PartitionSelected
//!       ^                             |   ^                                |  enter_folder
//!       +-------- back_to_disks ------+   +---------- select_disk ---------+  go_back
//! ```

use engine_client::{DirectoryEntry, Disk, EngineApi, Partition};

use crate::error::{ClientError, ClientResult, ValidationError};
use crate::listing::{Applied, Listing};

/// Root of every partition's filesystem
pub const ROOT: &str = "/";

/// Coarse navigation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    NoDiskSelected,
    DiskSelected,
    PartitionSelected,
}

/// What a ticket fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Disks,
    Partitions { disk_path: String },
    Directory { partition_id: String, path: String },
}

/// One fetch issued by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Generation of the target listing when the ticket was issued
    pub generation: u64,
    pub request: FetchRequest,
}

/// Response payload of a ticket
#[derive(Debug, Clone)]
pub enum Fetched {
    Disks(ClientResult<Vec<Disk>>),
    Partitions(ClientResult<Vec<Partition>>),
    Directory(ClientResult<Vec<DirectoryEntry>>),
}

/// A ticket together with its response
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub ticket: Ticket,
    pub fetched: Fetched,
}

impl Ticket {
    /// Run the request against the engine
    pub async fn fetch(self, api: &dyn EngineApi) -> FetchOutcome {
        let fetched = match &self.request {
            FetchRequest::Disks => Fetched::Disks(api.list_disks().await.map_err(ClientError::from)),
            FetchRequest::Partitions { disk_path } => Fetched::Partitions(
                api.list_partitions(disk_path)
                    .await
                    .map_err(ClientError::from),
            ),
            FetchRequest::Directory { partition_id, path } => Fetched::Directory(
                api.list_directory(partition_id, path)
                    .await
                    .map_err(ClientError::from),
            ),
        };

        FetchOutcome {
            ticket: self,
            fetched,
        }
    }
}

/// Join a folder name onto an absolute path without doubling the root slash
pub fn join_path(current: &str, name: &str) -> String {
    if current == ROOT {
        format!("/{}", name)
    } else {
        format!("{}/{}", current.trim_end_matches('/'), name)
    }
}

/// Navigation state for one client
#[derive(Debug, Clone)]
pub struct Navigator {
    disks: Listing<Disk>,
    partitions: Listing<Partition>,
    entries: Listing<DirectoryEntry>,
    selected_disk: Option<Disk>,
    selected_partition: Option<Partition>,
    path_history: Vec<String>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            disks: Listing::new(),
            partitions: Listing::new(),
            entries: Listing::new(),
            selected_disk: None,
            selected_partition: None,
            path_history: vec![ROOT.to_string()],
        }
    }

    pub fn state(&self) -> NavState {
        match (&self.selected_disk, &self.selected_partition) {
            (None, _) => NavState::NoDiskSelected,
            (Some(_), None) => NavState::DiskSelected,
            (Some(_), Some(_)) => NavState::PartitionSelected,
        }
    }

    pub fn selected_disk(&self) -> Option<&Disk> {
        self.selected_disk.as_ref()
    }

    pub fn selected_partition(&self) -> Option<&Partition> {
        self.selected_partition.as_ref()
    }

    /// Absolute path being browsed; always the top of the history
    pub fn current_path(&self) -> &str {
        self.path_history.last().map(String::as_str).unwrap_or(ROOT)
    }

    pub fn path_history(&self) -> &[String] {
        &self.path_history
    }

    pub fn disks(&self) -> &Listing<Disk> {
        &self.disks
    }

    pub fn partitions(&self) -> &Listing<Partition> {
        &self.partitions
    }

    pub fn entries(&self) -> &Listing<DirectoryEntry> {
        &self.entries
    }

    /// Re-fetch the disk list
    pub fn refresh_disks(&mut self) -> Ticket {
        Ticket {
            generation: self.disks.begin(),
            request: FetchRequest::Disks,
        }
    }

    /// Select a disk, dropping any partition and browse state
    pub fn select_disk(&mut self, disk: Disk) -> Ticket {
        tracing::info!(disk = %disk.path, "disk selected");

        self.clear_partition();
        let ticket = Ticket {
            generation: self.partitions.begin(),
            request: FetchRequest::Partitions {
                disk_path: disk.path.clone(),
            },
        };
        self.selected_disk = Some(disk);
        ticket
    }

    /// Select a partition of the selected disk and browse its root
    pub fn select_partition(&mut self, partition: Partition) -> ClientResult<Ticket> {
        if self.selected_disk.is_none() {
            return Err(ValidationError::NoDiskSelected.into());
        }
        tracing::info!(partition = %partition.id, "partition selected");

        self.path_history = vec![ROOT.to_string()];
        let partition_id = partition.id.clone();
        self.selected_partition = Some(partition);

        Ok(self.fetch_directory(partition_id))
    }

    /// Descend into a folder of the current listing
    pub fn enter_folder(&mut self, name: &str) -> ClientResult<Ticket> {
        let partition_id = match &self.selected_partition {
            Some(partition) => partition.id.clone(),
            None => return Err(ValidationError::NoPartitionSelected.into()),
        };

        let known = self
            .entries
            .items()
            .iter()
            .any(|entry| entry.is_folder() && entry.name == name);
        if !known {
            return Err(ValidationError::UnknownFolder(name.to_string()).into());
        }

        let path = join_path(self.current_path(), name);
        tracing::debug!(%path, "entering folder");
        self.path_history.push(path);

        Ok(self.fetch_directory(partition_id))
    }

    /// Return to the previously visited path; a no-op at the root
    pub fn go_back(&mut self) -> Option<Ticket> {
        let partition_id = self.selected_partition.as_ref()?.id.clone();
        if self.path_history.len() <= 1 {
            return None;
        }

        self.path_history.pop();
        tracing::debug!(path = %self.current_path(), "going back");
        Some(self.fetch_directory(partition_id))
    }

    /// Leave the selected disk and return to the disk list
    pub fn back_to_disks(&mut self) {
        if self.selected_disk.take().is_some() {
            tracing::info!("back to disk list");
        }
        self.clear_partition();
        self.partitions.reset();
    }

    /// Re-issue the fetch for whatever is currently displayed
    pub fn refresh(&mut self) -> Ticket {
        match self.state() {
            NavState::NoDiskSelected => self.refresh_disks(),
            NavState::DiskSelected => {
                let disk_path = self
                    .selected_disk
                    .as_ref()
                    .map(|disk| disk.path.clone())
                    .unwrap_or_default();
                Ticket {
                    generation: self.partitions.begin(),
                    request: FetchRequest::Partitions { disk_path },
                }
            }
            NavState::PartitionSelected => {
                let partition_id = self
                    .selected_partition
                    .as_ref()
                    .map(|partition| partition.id.clone())
                    .unwrap_or_default();
                self.fetch_directory(partition_id)
            }
        }
    }

    /// Forget everything, including the disk list
    pub fn reset(&mut self) {
        self.back_to_disks();
        self.disks.reset();
    }

    /// Apply a fetch response; stale responses leave state untouched
    pub fn apply(&mut self, outcome: FetchOutcome) -> Applied {
        let generation = outcome.ticket.generation;
        let applied = match outcome.fetched {
            Fetched::Disks(result) => self.disks.finish(generation, result),
            Fetched::Partitions(result) => self.partitions.finish(generation, result),
            Fetched::Directory(result) => self.entries.finish(generation, result),
        };

        if applied == Applied::Stale {
            tracing::debug!(request = ?outcome.ticket.request, generation, "discarding stale response");
        }
        applied
    }

    /// Look up a disk of the current list by name, path or 1-based index
    pub fn find_disk(&self, key: &str) -> ClientResult<Disk> {
        find_by_key(self.disks.items(), key, |disk| {
            disk.name == key || disk.path == key
        })
        .ok_or_else(|| ValidationError::UnknownDisk(key.to_string()).into())
    }

    /// Look up a partition of the current list by id, name or 1-based index
    pub fn find_partition(&self, key: &str) -> ClientResult<Partition> {
        find_by_key(self.partitions.items(), key, |partition| {
            partition.id.eq_ignore_ascii_case(key) || partition.name == key
        })
        .ok_or_else(|| ValidationError::UnknownPartition(key.to_string()).into())
    }

    fn fetch_directory(&mut self, partition_id: String) -> Ticket {
        Ticket {
            generation: self.entries.begin(),
            request: FetchRequest::Directory {
                partition_id,
                path: self.current_path().to_string(),
            },
        }
    }

    fn clear_partition(&mut self) {
        self.selected_partition = None;
        self.path_history = vec![ROOT.to_string()];
        self.entries.reset();
    }
}

fn find_by_key<T: Clone>(items: &[T], key: &str, matches: impl Fn(&T) -> bool) -> Option<T> {
    if let Some(found) = items.iter().find(|item| matches(item)) {
        return Some(found.clone());
    }

    key.parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| items.get(index))
        .cloned()
}
