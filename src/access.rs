//! Write-permission gate run before any toss, restore or wipe mutation.
//!
//! Tossing is a rename out of the containing directory, so the principal
//! needs write permission on the object itself and on its parent directory.
//! Permissions are read with `stat` (symlinks followed) and the classes are
//! checked the POSIX way: the owner class applies to the owner, the group
//! class to group members, and the other class to everyone else. The first
//! class that applies is the only one consulted.

use crate::error::{AccessTarget, Error, PermissionClass, Result};
use crate::paths;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

const OWNER_WRITE: u32 = 0o200;
const GROUP_WRITE: u32 = 0o020;
const OTHER_WRITE: u32 = 0o002;

/// The user on whose behalf the bin is operated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub uid: u32,
    pub gid: u32,
    /// Supplementary group ids.
    pub groups: Vec<u32>,
}

impl Principal {
    pub fn new(uid: u32, gid: u32, groups: Vec<u32>) -> Self {
        Self { uid, gid, groups }
    }

    /// The real user and group ids of this process.
    pub fn current() -> Self {
        let uid = nix::unistd::getuid().as_raw();
        let gid = nix::unistd::getgid().as_raw();
        Self::new(uid, gid, supplementary_groups())
    }

    pub fn is_root(&self) -> bool {
        self.uid == 0
    }

    fn in_group(&self, gid: u32) -> bool {
        self.gid == gid || self.groups.contains(&gid)
    }

    /// Decides whether this principal may write an object with the given
    /// ownership and mode, returning the class that denied it otherwise.
    pub fn check_write(
        &self,
        owner_uid: u32,
        owner_gid: u32,
        mode: u32,
    ) -> std::result::Result<(), PermissionClass> {
        if self.is_root() {
            return Ok(());
        }

        let (class, bit) = if self.uid == owner_uid {
            (PermissionClass::Owner, OWNER_WRITE)
        } else if self.in_group(owner_gid) {
            (PermissionClass::Group, GROUP_WRITE)
        } else {
            (PermissionClass::Other, OTHER_WRITE)
        };

        if mode & bit == 0 { Err(class) } else { Ok(()) }
    }
}

#[cfg(not(target_vendor = "apple"))]
fn supplementary_groups() -> Vec<u32> {
    nix::unistd::getgroups()
        .map(|groups| groups.into_iter().map(|g| g.as_raw()).collect())
        .unwrap_or_default()
}

#[cfg(target_vendor = "apple")]
fn supplementary_groups() -> Vec<u32> {
    Vec::new()
}

/// Verifies that `principal` may move `path` out of its directory.
///
/// # Errors
///
/// Returns [`Error::PermissionDenied`] naming the object or its parent
/// directory and the permission class that failed, or
/// [`Error::Filesystem`] if either cannot be stat'ed.
pub fn validate(principal: &Principal, path: &Path) -> Result<()> {
    if principal.is_root() {
        return Ok(());
    }

    check_path(principal, path, AccessTarget::Object)?;

    let parent = parent_dir(path)?;
    check_path(principal, &parent, AccessTarget::ParentDirectory)
}

/// Verifies that `principal` may create entries in `dir`.
///
/// # Errors
///
/// Same as [`validate`], always naming the directory as the parent.
pub fn validate_dir(principal: &Principal, dir: &Path) -> Result<()> {
    if principal.is_root() {
        return Ok(());
    }
    check_path(principal, dir, AccessTarget::ParentDirectory)
}

fn check_path(principal: &Principal, path: &Path, target: AccessTarget) -> Result<()> {
    let meta = std::fs::metadata(path)
        .map_err(|e| Error::filesystem(format!("cannot access {target} {}", path.display()), e))?;

    principal
        .check_write(meta.uid(), meta.gid(), meta.mode())
        .map_err(|class| {
            tracing::debug!(path = %path.display(), %target, %class, "Write permission denied");
            Error::PermissionDenied {
                path: path.to_path_buf(),
                target,
                class,
            }
        })
}

/// Directory containing `path`, resolving relative paths against the
/// current directory.
fn parent_dir(path: &Path) -> Result<PathBuf> {
    let absolute = paths::absolute(path).map_err(|e| {
        Error::filesystem(
            format!("cannot resolve absolute path of {}", path.display()),
            e,
        )
    })?;
    Ok(absolute
        .parent()
        .map_or_else(|| PathBuf::from("/"), Path::to_path_buf))
}
