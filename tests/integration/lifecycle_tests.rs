//! Toss, restore and wipe end to end.

use crate::common::TestBin;
use rubbish::Error;
use rubbish::engine::{
    AutoAcknowledge, RestoreOptions, TossOptions, WipeOptions, WipeOutcome,
};
use rubbish::journal::{ItemType, SECS_PER_DAY};
use std::fs;

#[test]
fn test_toss_records_origin_and_moves_object() {
    let tb = TestBin::new();
    let src = tb.touch("work/notes.txt", "hello");

    let before = tb.journal.count().unwrap();
    let tossed = tb.bin().toss(&src, &TossOptions::default()).unwrap();

    assert_eq!(tb.journal.count().unwrap(), before + 1);
    let record = tb.journal.get(&tossed.record.item).unwrap();
    assert_eq!(record.origin, src);
    assert_eq!(record.wipeout_time, 30);
    assert!(!src.exists());
    assert_eq!(tb.container_entries(), vec![tossed.record.item.clone()]);
}

#[test]
fn test_round_trip_preserves_contents() {
    let tb = TestBin::new();
    let dir = tb.work().join("album");
    fs::create_dir_all(dir.join("2024")).unwrap();
    fs::write(dir.join("cover.png"), [0u8, 159, 146, 150]).unwrap();
    fs::write(dir.join("2024").join("a.jpg"), "jpeg bytes").unwrap();

    let bin = tb.bin();
    let tossed = bin.toss(&dir, &TossOptions::default()).unwrap();
    assert_eq!(tossed.record.kind, ItemType::Directory);

    bin.restore(&tossed.record.item, &RestoreOptions::default())
        .unwrap();

    assert_eq!(fs::read(dir.join("cover.png")).unwrap(), vec![0u8, 159, 146, 150]);
    assert_eq!(
        fs::read_to_string(dir.join("2024").join("a.jpg")).unwrap(),
        "jpeg bytes"
    );
    assert_eq!(tb.journal.count().unwrap(), 0);
    assert!(tb.container_entries().is_empty());
}

#[test]
fn test_same_basename_gets_distinct_keys() {
    let tb = TestBin::new();
    let bin = tb.bin();

    let first = tb.touch("work/a/notes.txt", "first");
    let a = bin.toss(&first, &TossOptions::default()).unwrap();
    let second = tb.touch("work/b/notes.txt", "second");
    let b = bin.toss(&second, &TossOptions::default()).unwrap();

    assert_ne!(a.record.item, b.record.item);
    assert_eq!(tb.container_entries().len(), 2);
    assert_eq!(fs::read_to_string(&a.destination).unwrap(), "first");
    assert_eq!(fs::read_to_string(&b.destination).unwrap(), "second");
}

#[test]
fn test_symlink_is_tossed_not_its_target() {
    let tb = TestBin::new();
    let target = tb.touch("elsewhere/real.txt", "real");
    let link = tb.work().join("link");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let tossed = tb.bin().toss(&link, &TossOptions::default()).unwrap();

    assert_eq!(tossed.record.kind, ItemType::Symlink);
    assert!(target.exists());
    assert!(fs::symlink_metadata(&tossed.destination)
        .unwrap()
        .file_type()
        .is_symlink());
}

#[test]
fn test_failed_move_leaves_no_record() {
    let tb = TestBin::new();
    let src = tb.touch("work/notes.txt", "hello");

    let mut config = tb.config_in(&tb.work());
    config.container_path = tb.tmp.path().join("gone");
    let bin = rubbish::engine::RubbishBin::with_principal(config, &tb.journal, crate::common::root());

    assert!(bin.toss(&src, &TossOptions::default()).is_err());
    assert_eq!(tb.journal.count().unwrap(), 0);
    assert!(src.exists());
}

#[test]
fn test_retained_item_survives_unforced_wipe() {
    let tb = TestBin::new();
    let src = tb.touch("work/notes.txt", "hello");
    let bin = tb.bin();
    let tossed = bin.toss(&src, &TossOptions::default()).unwrap();

    // Pretend it was tossed five days ago
    let mut record = tossed.record.clone();
    record.tossed_time -= 5 * SECS_PER_DAY;
    tb.journal.insert(&record).unwrap();

    let report = bin.wipe(&WipeOptions::default(), &mut AutoAcknowledge).unwrap();
    assert!(report.is_empty());
    assert!(tossed.destination.exists());
    assert_eq!(tb.journal.get(&record.item).unwrap(), record);

    let forced = WipeOptions {
        force: true,
        auto_acknowledge: true,
        ..WipeOptions::default()
    };
    let report = bin.wipe(&forced, &mut AutoAcknowledge).unwrap();
    assert!(matches!(
        report.successes().next(),
        Some(WipeOutcome::Purged(_))
    ));
    assert!(!tossed.destination.exists());
    assert!(tb.journal.find(&record.item).unwrap().is_none());
}

#[test]
fn test_wipe_after_retention_elapsed() {
    let tb = TestBin::new();
    let src = tb.touch("work/old.log", "log");
    let bin = tb.bin();
    let tossed = bin.toss(&src, &TossOptions { retention: Some(0) }).unwrap();

    let report = bin.wipe(&WipeOptions::default(), &mut AutoAcknowledge).unwrap();

    assert_eq!(report.len(), 1);
    assert!(!tossed.destination.exists());
    assert_eq!(tb.journal.count().unwrap(), 0);
}

#[test]
fn test_restore_conflict_keeps_record_and_object() {
    let tb = TestBin::new();
    let src = tb.touch("work/notes.txt", "tossed");
    let bin = tb.bin();
    let tossed = bin.toss(&src, &TossOptions::default()).unwrap();
    tb.touch("work/notes.txt", "replacement");

    let err = bin
        .restore(&tossed.record.item, &RestoreOptions::default())
        .unwrap_err();

    assert!(matches!(err, Error::Conflict { .. }));
    assert!(err.is_skip());
    assert!(tossed.destination.exists());
    assert!(tb.journal.find(&tossed.record.item).unwrap().is_some());
    assert_eq!(fs::read_to_string(&src).unwrap(), "replacement");
}

#[test]
fn test_check_detects_crash_window() {
    let tb = TestBin::new();
    let src = tb.touch("work/notes.txt", "hello");

    // Record committed but object never moved
    let record = tb.journal.add("notes.txt_CRASH1", &src, 30).unwrap();

    let report = tb.bin().check(false).unwrap();
    assert_eq!(report.missing, vec![record.clone()]);

    // Wiping the dangling record heals it
    tb.bin().purge(&record).unwrap();
    assert!(tb.bin().check(false).unwrap().is_clean());
    assert!(src.exists());
}
