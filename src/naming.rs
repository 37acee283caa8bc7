//! Collision-free names for objects inside the container.
//!
//! A tossed object keeps its basename followed by `_` and a short random
//! suffix of uppercase letters and digits, e.g. `notes.txt_Q7Z2KM`. A
//! candidate is rejected and regenerated when the container already holds an
//! entry with that name or the journal already tracks it.

use crate::error::{Error, Result};
use crate::journal::Journal;
use rand::Rng;
use std::path::Path;

/// Characters used in name suffixes.
const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of the random suffix.
pub const SUFFIX_LEN: usize = 6;

/// Attempts before giving up on finding a free name.
const MAX_ATTEMPTS: usize = 8;

/// Random suffix of `len` uppercase alphanumerics.
pub fn suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())]))
        .collect()
}

/// Candidate container name for `basename`.
pub fn candidate(basename: &str) -> String {
    format!("{basename}_{}", suffix(SUFFIX_LEN))
}

/// Produces a name for `basename` that is free both in `container` and in the journal.
///
/// # Errors
///
/// Returns [`Error::NameExhausted`] if every attempt collided, or a journal
/// error if the key lookup fails.
pub fn resolve(container: &Path, journal: &Journal, basename: &str) -> Result<String> {
    for _ in 0..MAX_ATTEMPTS {
        let name = candidate(basename);
        let taken = std::fs::symlink_metadata(container.join(&name)).is_ok()
            || journal.find(&name)?.is_some();
        if !taken {
            return Ok(name);
        }
        tracing::debug!(name = %name, "Container name collision, regenerating");
    }

    Err(Error::NameExhausted {
        name: basename.to_string(),
    })
}
