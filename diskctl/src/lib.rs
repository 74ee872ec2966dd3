//! diskctl - console client for the virtual disk and EXT2 filesystem engine
//!
//! The engine owns disks, partitions and filesystems; this crate gates and
//! forwards command batches to it and browses what it reports.
//!
//! # Modules
//!
//! - [`session`] - who is logged in
//! - [`gate`] - which command batches may be sent without a session
//! - [`console`] - input buffer and engine output
//! - [`navigation`] - disk, partition and directory browsing
//! - [`journal`] - a partition's operation log
//! - [`workbench`] - all of the above for one client, plus dispatch of remote calls
//! - [`render`] / [`output`] - presentation
//! - [`config`] / [`cli`] - configuration and the command-line surface

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod journal;
pub mod listing;
pub mod navigation;
pub mod output;
pub mod render;
pub mod session;
pub mod workbench;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ClientError, ClientResult, ValidationError};
pub use workbench::{Event, Update, Workbench};
