//! CLI argument definitions
//!
//! Contains the main CLI struct and Commands enum for clap parsing.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "diskctl")]
#[command(about = "Console client for the virtual disk and EXT2 filesystem engine")]
pub struct Cli {
    /// Defaults to the interactive console
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Engine base URL (default: from .diskctl.toml or http://localhost:3001)
    #[arg(long, env = "DISKCTL_ENGINE_URL", global = true)]
    pub engine_url: Option<String>,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print listings as JSON (disks, partitions, ls, journal)
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive console (default)
    Shell,
    /// Submit one command batch
    Exec {
        /// Commands, one per line
        text: Option<String>,
        /// Read the batch from a script file instead
        #[arg(long, short, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Authenticate first as this user
        #[arg(long, requires_all = ["pass", "id"])]
        user: Option<String>,
        /// Password for --user
        #[arg(long)]
        pass: Option<String>,
        /// Partition id for --user
        #[arg(long)]
        id: Option<String>,
    },
    /// List disks known to the engine
    Disks,
    /// List partitions of a disk
    Partitions {
        /// Disk path as reported by `disks`
        disk_path: String,
    },
    /// List a directory of a partition
    Ls {
        /// Partition id (e.g. 671A)
        id: String,
        /// Absolute path
        #[arg(default_value = "/")]
        path: String,
    },
    /// Show a partition's journal
    Journal {
        /// Partition id (e.g. 671A)
        id: String,
    },
    /// Authenticate against the engine
    Login {
        user: String,
        pass: String,
        /// Partition id (e.g. 671A)
        id: String,
    },
}
