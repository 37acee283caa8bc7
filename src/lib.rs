//! Deferred deletion for the command line.
//!
//! Objects are *tossed* into a container directory instead of being deleted,
//! with one journal record per object. From there they can be restored into
//! the directory they were tossed from, or wiped for good once their
//! retention period has elapsed.
//!
//! ```no_run
//! use rubbish::engine::{BinConfig, RubbishBin, TossOptions};
//! use rubbish::journal::Journal;
//! use std::path::Path;
//!
//! # fn main() -> rubbish::Result<()> {
//! let journal = Journal::open("/home/alex/.local/share/rubbish/.journal")?;
//! let config = BinConfig {
//!     container_path: "/home/alex/.local/share/rubbish".into(),
//!     working_dir: "/home/alex/project".into(),
//!     wipeout_time: 30,
//! };
//! let bin = RubbishBin::new(config, &journal);
//! let tossed = bin.toss(Path::new("/home/alex/project/notes.txt"), &TossOptions::default())?;
//! println!("tossed as {}", tossed.record.item);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

#[cfg(not(unix))]
compile_error!("rubbish relies on POSIX permission bits and only supports unix targets");

pub mod access;
pub mod config;
pub mod engine;
pub mod error;
pub mod journal;
pub mod naming;
pub mod paths;
pub mod utils;

pub use error::{Error, Result};
