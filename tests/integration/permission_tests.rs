//! The permission gate runs before any mutation.

use crate::common::{TestBin, stranger};
use rubbish::Error;
use rubbish::access::Principal;
use rubbish::engine::TossOptions;
use rubbish::error::{AccessTarget, PermissionClass};
use std::fs;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::Path;

fn set_mode(path: &Path, mode: u32) {
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[test]
fn test_unwritable_object_changes_nothing() {
    let tb = TestBin::new();
    let src = tb.touch("work/notes.txt", "hello");
    set_mode(&src, 0o644);
    set_mode(&tb.work(), 0o777);

    let before = tb.journal.count().unwrap();
    let err = tb
        .bin_as(stranger())
        .toss(&src, &TossOptions::default())
        .unwrap_err();

    assert!(matches!(
        err,
        Error::PermissionDenied {
            target: AccessTarget::Object,
            class: PermissionClass::Other,
            ..
        }
    ));
    assert_eq!(tb.journal.count().unwrap(), before);
    assert!(src.exists());
    assert!(tb.container_entries().is_empty());
}

#[test]
fn test_unwritable_parent_changes_nothing() {
    let tb = TestBin::new();
    let src = tb.touch("work/notes.txt", "hello");
    set_mode(&src, 0o666);
    set_mode(&tb.work(), 0o755);

    let err = tb
        .bin_as(stranger())
        .toss(&src, &TossOptions::default())
        .unwrap_err();

    assert!(matches!(
        err,
        Error::PermissionDenied {
            target: AccessTarget::ParentDirectory,
            ..
        }
    ));
    assert_eq!(tb.journal.count().unwrap(), 0);
    assert!(src.exists());
}

#[test]
fn test_group_member_uses_group_bits() {
    let tb = TestBin::new();
    let src = tb.touch("work/shared.txt", "shared");
    set_mode(&src, 0o664);
    set_mode(&tb.work(), 0o775);

    let meta = fs::metadata(&src).unwrap();
    let member = Principal::new(54_321, 54_321, vec![meta.gid()]);

    let tossed = tb
        .bin_as(member)
        .toss(&src, &TossOptions::default())
        .unwrap();
    assert!(tossed.destination.exists());
}
