//! Local vs global scope across engines.

use crate::common::TestBin;
use rubbish::Error;
use rubbish::engine::{AutoAcknowledge, RestoreOptions, Scope, TossOptions, WipeOptions};
use rubbish::journal::{ItemType, MetaData};
use proptest::prelude::*;
use std::path::PathBuf;

#[test]
fn test_filter_path_is_component_wise() {
    let tb = TestBin::new();
    let a = tb.touch("work/a/x.txt", "x");
    let ab = tb.touch("work/ab/y.txt", "y");
    let bin = tb.bin();
    bin.toss(&a, &TossOptions::default()).unwrap();
    bin.toss(&ab, &TossOptions::default()).unwrap();

    let inside_a = tb.journal.filter_path(&tb.work().join("a")).unwrap();
    assert_eq!(inside_a.len(), 1);
    assert_eq!(inside_a[0].origin, a);

    assert_eq!(tb.journal.filter_path(&tb.work()).unwrap().len(), 2);
}

#[test]
fn test_status_local_and_global() {
    let tb = TestBin::new();
    let here = tb.touch("work/here.txt", "h");
    let far = tb.touch("far/there.txt", "t");
    tb.bin().toss(&here, &TossOptions::default()).unwrap();
    tb.bin_in(&tb.tmp.path().join("far"))
        .toss(&far, &TossOptions::default())
        .unwrap();

    let bin = tb.bin();
    let local = bin.status(Scope::Local, false).unwrap();
    assert_eq!(local.entries.len(), 1);
    assert!(local.entries[0].display_name.starts_with("here.txt_"));

    let global = bin.status(Scope::Global, false).unwrap();
    assert_eq!(global.entries.len(), 2);
    assert_eq!(global.bin_size, 2);
}

#[test]
fn test_restore_and_wipe_respect_scope() {
    let tb = TestBin::new();
    let far = tb.touch("far/there.txt", "t");
    let tossed = tb
        .bin_in(&tb.tmp.path().join("far"))
        .toss(&far, &TossOptions { retention: Some(0) })
        .unwrap();
    let item = tossed.record.item.clone();

    let bin = tb.bin();
    let err = bin.restore(&item, &RestoreOptions::default()).unwrap_err();
    assert!(matches!(err, Error::NotInScope { .. }));

    let local = WipeOptions {
        items: vec![item.clone()],
        ..WipeOptions::default()
    };
    let report = bin.wipe(&local, &mut AutoAcknowledge).unwrap();
    assert!(matches!(report.errors().next(), Some((_, Error::NotInScope { .. }))));
    assert!(tossed.destination.exists());

    let global = WipeOptions {
        scope: Scope::Global,
        ..local
    };
    bin.wipe(&global, &mut AutoAcknowledge).unwrap();
    assert!(!tossed.destination.exists());
}

#[test]
fn test_parent_component_does_not_leak_into_subdirectory_scope() {
    let tb = TestBin::new();
    let x = tb.touch("work/x.txt", "x");
    let sub = tb.work().join("sub");
    std::fs::create_dir_all(&sub).unwrap();

    let tossed = tb
        .bin_in(&sub)
        .toss(&sub.join("..").join("x.txt"), &TossOptions::default())
        .unwrap();
    let item = tossed.record.item.clone();

    assert_eq!(tossed.record.origin, x);
    assert!(tb.journal.filter_path(&sub).unwrap().is_empty());
    assert_eq!(tb.journal.filter_path(&tb.work()).unwrap().len(), 1);

    let from_sub = tb.bin_in(&sub);
    assert!(from_sub.status(Scope::Local, false).unwrap().entries.is_empty());
    let err = from_sub.restore(&item, &RestoreOptions::default()).unwrap_err();
    assert!(matches!(err, Error::NotInScope { .. }));
    assert!(tossed.destination.exists());

    let restored = tb.bin().restore(&item, &RestoreOptions::default()).unwrap();
    assert_eq!(restored.target, x);
}

#[test]
fn test_working_dir_with_parent_components_is_cleaned() {
    let tb = TestBin::new();
    let here = tb.touch("work/here.txt", "h");
    tb.bin().toss(&here, &TossOptions::default()).unwrap();

    let roundabout = tb.work().join("sub").join("..");
    let local = tb.bin_in(&roundabout).status(Scope::Local, false).unwrap();
    assert_eq!(local.entries.len(), 1);
    assert!(local.entries[0].display_name.starts_with("here.txt_"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_filter_matches_is_within(depth in 0usize..4, sibling in any::<bool>()) {
        let tb = TestBin::new();
        let mut dir = tb.work();
        for i in 0..depth {
            dir = dir.join(format!("d{i}"));
        }
        let origin_dir: PathBuf = if sibling {
            PathBuf::from(format!("{}x", tb.work().display()))
        } else {
            dir.clone()
        };

        let record = MetaData {
            item: "f_ABCDEF".into(),
            origin: origin_dir.join("f"),
            kind: ItemType::File,
            wipeout_time: 30,
            tossed_time: 0,
        };
        tb.journal.insert(&record).unwrap();

        let found = tb.journal.filter_path(&tb.work()).unwrap();
        prop_assert_eq!(found.len() == 1, !sibling);
    }
}
