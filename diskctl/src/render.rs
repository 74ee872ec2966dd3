//! Text rendering of listings and prompts

use chrono::{DateTime, Local};
use engine_client::{DirectoryEntry, Disk, JournalEntry, Partition};

use crate::listing::{Applied, ListingView};
use crate::navigation::Navigator;
use crate::output::OutputEvent;
use crate::session::Session;
use crate::workbench::{Resource, Update, Workbench};

const NO_TIME: &str = "-";

/// Local time for an epoch-seconds stamp; `-` when unset
pub fn timestamp(epoch: i64) -> String {
    if epoch <= 0 {
        return NO_TIME.to_string();
    }
    match DateTime::from_timestamp(epoch, 0) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => NO_TIME.to_string(),
    }
}

/// Mounted partitions joined for display, or `none`
pub fn mounted(disk: &Disk) -> String {
    match disk.mounted_partitions.as_deref() {
        Some(ids) if !ids.is_empty() => ids.join(", "),
        _ => "none".to_string(),
    }
}

pub fn disk_line(index: usize, disk: &Disk, selected: bool) -> String {
    format!(
        "{} {:>2}. {:<16} {:>10.2} MB  fit {:<7}  mounted: {}  ({})",
        marker(selected),
        index + 1,
        disk.name,
        disk.size_mb,
        disk.fit.code(),
        mounted(disk),
        disk.path
    )
}

pub fn partition_line(index: usize, partition: &Partition, selected: bool) -> String {
    format!(
        "{} {:>2}. {:<8} {:<16} {:>10.2} KB  fit {:<7}  {}",
        marker(selected),
        index + 1,
        partition.id,
        partition.name,
        partition.size_kb,
        partition.fit.code(),
        partition.status
    )
}

pub fn entry_line(entry: &DirectoryEntry) -> String {
    let name = if entry.is_folder() {
        format!("{}/", entry.name)
    } else {
        entry.name.clone()
    };
    format!(
        "  {} {:>4} {:>4}  {:>8}  {}  {}",
        entry.perm,
        entry.uid,
        entry.gid,
        entry.size,
        timestamp(entry.modified),
        name
    )
}

pub fn journal_line(entry: &JournalEntry) -> String {
    let mut line = format!(
        "  {:>4}  {}  {:<10} {}",
        entry.sequence,
        timestamp(entry.date),
        entry.operation,
        entry.path
    );
    if !entry.content.is_empty() {
        line.push_str(&format!("  \"{}\"", entry.content));
    }
    line
}

/// Disk list, marking the selected disk
pub fn disks(view: ListingView<'_, Disk>, selected: Option<&Disk>) -> Vec<OutputEvent> {
    let lines = |items: &[Disk]| {
        items
            .iter()
            .enumerate()
            .map(|(i, disk)| disk_line(i, disk, selected.is_some_and(|s| s.path == disk.path)))
            .collect::<Vec<_>>()
    };
    section("Disks".to_string(), view, "no disks", lines)
}

/// Partitions of the selected disk
pub fn partitions(nav: &Navigator) -> Vec<OutputEvent> {
    let title = match nav.selected_disk() {
        Some(disk) => format!("Partitions of {}", disk.name),
        None => "Partitions".to_string(),
    };
    partition_list(title, nav.partitions().view(), nav.selected_partition())
}

/// A partition listing under `title`
pub fn partition_list(
    title: String,
    view: ListingView<'_, Partition>,
    selected: Option<&Partition>,
) -> Vec<OutputEvent> {
    let lines = |items: &[Partition]| {
        items
            .iter()
            .enumerate()
            .map(|(i, p)| partition_line(i, p, selected.is_some_and(|s| s.id == p.id)))
            .collect::<Vec<_>>()
    };
    section(title, view, "no partitions", lines)
}

/// Entries of the current directory
pub fn directory(nav: &Navigator) -> Vec<OutputEvent> {
    let title = match nav.selected_partition() {
        Some(partition) => format!("{}:{}", partition.id, nav.current_path()),
        None => nav.current_path().to_string(),
    };
    entries(title, nav.entries().view())
}

/// A directory listing under `title`
pub fn entries(title: String, view: ListingView<'_, DirectoryEntry>) -> Vec<OutputEvent> {
    section(title, view, "directory is empty", |items| {
        items.iter().map(entry_line).collect()
    })
}

/// Journal of `partition_id`
pub fn journal(partition_id: &str, view: ListingView<'_, JournalEntry>) -> Vec<OutputEvent> {
    section(format!("Journal of {}", partition_id), view, "no entries", |items| {
        items.iter().map(journal_line).collect()
    })
}

/// Contents of one file entry
pub fn file(entry: &DirectoryEntry) -> Vec<OutputEvent> {
    let body = if entry.content.is_empty() {
        OutputEvent::Status("(empty)".to_string())
    } else {
        OutputEvent::Text(entry.content.clone())
    };
    vec![OutputEvent::Heading(entry.name.clone()), body]
}

/// Events to show after a remote call finished
pub fn update(update: &Update, workbench: &Workbench) -> Vec<OutputEvent> {
    match update {
        Update::Listing(_, Applied::Stale) | Update::Superseded => Vec::new(),
        Update::Listing(Resource::Disks, _) => {
            let nav = workbench.navigator();
            disks(nav.disks().view(), nav.selected_disk())
        }
        Update::Listing(Resource::Partitions, _) => partitions(workbench.navigator()),
        Update::Listing(Resource::Directory, _) => directory(workbench.navigator()),
        Update::Listing(Resource::Journal, _) => {
            let inspector = workbench.journal();
            let shown = inspector.shown_partition_id().or(inspector.partition_id());
            journal(shown.unwrap_or("?"), inspector.view())
        }
        Update::Executed { commands, result } => match result {
            Ok(text) => vec![
                OutputEvent::Engine(text.clone()),
                OutputEvent::Progress {
                    message: format!("{} command(s) executed", commands),
                    done: true,
                },
            ],
            Err(err) => vec![OutputEvent::Error(err.to_string())],
        },
        Update::Login { user, result } => match result {
            Ok(text) => {
                let mut events = Vec::new();
                if !text.trim().is_empty() {
                    events.push(OutputEvent::Engine(text.clone()));
                }
                events.push(OutputEvent::Status(format!("logged in as {}", user)));
                events
            }
            Err(err) => vec![OutputEvent::Error(err.to_string())],
        },
    }
}

/// Console prompt reflecting user and location
pub fn prompt(session: &Session, nav: &Navigator) -> String {
    let user = if session.is_authenticated {
        session.username.as_str()
    } else {
        "guest"
    };

    let location = match (nav.selected_disk(), nav.selected_partition()) {
        (None, _) => String::new(),
        (Some(disk), None) => format!(" {}", disk.name),
        (Some(disk), Some(partition)) => {
            format!(" {}/{}:{}", disk.name, partition.id, nav.current_path())
        }
    };

    format!("{}@diskctl{}> ", user, location)
}

fn marker(selected: bool) -> char {
    if selected {
        '*'
    } else {
        ' '
    }
}

fn section<T>(
    title: String,
    view: ListingView<'_, T>,
    empty: &str,
    lines: impl FnOnce(&[T]) -> Vec<String>,
) -> Vec<OutputEvent> {
    let body = match view {
        ListingView::Idle => OutputEvent::System("nothing loaded".to_string()),
        ListingView::Loading => OutputEvent::Progress {
            message: "loading...".to_string(),
            done: false,
        },
        ListingView::Empty => OutputEvent::Status(empty.to_string()),
        ListingView::Items(items) => OutputEvent::Text(lines(items).join("\n")),
        ListingView::Failed(err) => OutputEvent::Error(err.to_string()),
    };
    vec![OutputEvent::Heading(title), body]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::listing::Listing;
    use crate::navigation::{FetchOutcome, Fetched};
    use engine_client::{EntryKind, Fit, PartitionStatus};

    fn disk(mounted: Option<Vec<&str>>) -> Disk {
        Disk {
            name: "a.mia".to_string(),
            path: "/tmp/a.mia".to_string(),
            size_mb: 5.0,
            fit: Fit::FirstFit,
            mounted_partitions: mounted.map(|ids| ids.into_iter().map(String::from).collect()),
        }
    }

    fn partition() -> Partition {
        Partition {
            id: "671A".to_string(),
            path: "/tmp/a.mia".to_string(),
            name: "P1".to_string(),
            size_kb: 1024.0,
            fit: Fit::WorstFit,
            status: PartitionStatus::Mounted,
        }
    }

    fn browsing(result: Result<Vec<DirectoryEntry>, ClientError>) -> Navigator {
        let mut nav = Navigator::new();
        nav.select_disk(disk(None));
        let ticket = nav.select_partition(partition()).unwrap();
        nav.apply(FetchOutcome {
            ticket,
            fetched: Fetched::Directory(result),
        });
        nav
    }

    #[test]
    fn test_mounted_partitions() {
        assert_eq!(mounted(&disk(None)), "none");
        assert_eq!(mounted(&disk(Some(vec![]))), "none");
        assert_eq!(mounted(&disk(Some(vec!["671A", "672A"]))), "671A, 672A");
    }

    #[test]
    fn test_disk_line_two_decimals() {
        let line = disk_line(0, &disk(Some(vec!["671A"])), true);
        assert!(line.starts_with('*'));
        assert!(line.contains("5.00 MB"));
        assert!(line.contains("fit FF"));
        assert!(line.contains("mounted: 671A"));
    }

    #[test]
    fn test_empty_directory_is_not_an_error() {
        let nav = browsing(Ok(vec![]));
        let events = directory(&nav);

        assert_eq!(events[0], OutputEvent::Heading("671A:/".into()));
        assert_eq!(events[1], OutputEvent::Status("directory is empty".into()));
    }

    #[test]
    fn test_protocol_error_is_shown_as_invalid_response() {
        let mut listing: Listing<Disk> = Listing::new();
        let generation = listing.begin();
        listing.finish(generation, Err(ClientError::Protocol("'disks' is not an array".into())));

        let events = disks(listing.view(), None);
        match &events[1] {
            OutputEvent::Error(msg) => assert!(msg.starts_with("invalid server response")),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_folders_get_trailing_slash() {
        let entry = DirectoryEntry {
            name: "docs".to_string(),
            kind: EntryKind::Folder,
            size: 0,
            content: String::new(),
            perm: "664".to_string(),
            uid: 1,
            gid: 1,
            created: 0,
            modified: 0,
        };
        let line = entry_line(&entry);
        assert!(line.ends_with("docs/"));
        assert!(line.contains(" - "));
    }

    #[test]
    fn test_empty_journal_and_timestamp() {
        let events = journal("671A", ListingView::Empty);
        assert_eq!(events[1], OutputEvent::Status("no entries".into()));

        assert_eq!(timestamp(0), "-");
        assert_eq!(timestamp(1_700_000_000).len(), "2023-11-14 22:13:20".len());
    }

    #[test]
    fn test_prompt_tracks_location() {
        let nav = browsing(Ok(vec![]));
        let session = Session {
            username: "root".to_string(),
            is_authenticated: true,
        };
        assert_eq!(prompt(&session, &nav), "root@diskctl a.mia/671A:/> ");
        assert_eq!(prompt(&Session::default(), &Navigator::new()), "guest@diskctl> ");
    }
}
