//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use rubbish::access::Principal;
use rubbish::engine::{BinConfig, RubbishBin};
use rubbish::journal::{JOURNAL_DIR, Journal};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway bin: `<tmp>/bin` as container, `<tmp>/work` as working dir.
pub struct TestBin {
    pub tmp: TempDir,
    pub journal: Journal,
}

impl TestBin {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        fs::create_dir_all(tmp.path().join("bin")).expect("create bin");
        fs::create_dir_all(tmp.path().join("work")).expect("create work");
        let journal = Journal::open(tmp.path().join("bin").join(JOURNAL_DIR)).expect("open journal");
        Self { tmp, journal }
    }

    pub fn container(&self) -> PathBuf {
        self.tmp.path().join("bin")
    }

    pub fn work(&self) -> PathBuf {
        self.tmp.path().join("work")
    }

    pub fn config_in(&self, working_dir: &Path) -> BinConfig {
        BinConfig {
            container_path: self.container(),
            working_dir: working_dir.to_path_buf(),
            wipeout_time: 30,
        }
    }

    /// Bin operated by root from the working directory.
    pub fn bin(&self) -> RubbishBin<'_> {
        self.bin_in(&self.work())
    }

    /// Bin operated by root from `working_dir`.
    pub fn bin_in(&self, working_dir: &Path) -> RubbishBin<'_> {
        RubbishBin::with_principal(self.config_in(working_dir), &self.journal, root())
    }

    /// Bin operated by `principal` from the working directory.
    pub fn bin_as(&self, principal: Principal) -> RubbishBin<'_> {
        RubbishBin::with_principal(self.config_in(&self.work()), &self.journal, principal)
    }

    /// Writes `content` to `rel` under the temp root, creating parents.
    pub fn touch(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.tmp.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, content).expect("write file");
        path
    }

    /// Names in the container other than the journal, sorted.
    pub fn container_entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.container())
            .expect("list container")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .filter(|name| name != JOURNAL_DIR)
            .collect();
        names.sort();
        names
    }
}

pub fn root() -> Principal {
    Principal::new(0, 0, vec![])
}

/// Principal that owns nothing and belongs to no group the test files get.
pub fn stranger() -> Principal {
    Principal::new(54_321, 54_321, vec![])
}
