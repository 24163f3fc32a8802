//! Poll state shared by every front-end.
//!
//! A `Monitor` owns the watched path, its `WatchState`, and the record on
//! display. Each tick either leaves the record alone or replaces it as a whole
//! (`Some` or `None`), so front-ends never see a half-applied update.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::domain::{MonitorStatus, WatchEvent, WatchState, WindRecord};
use crate::io::{parse_wind_file, tick};

#[derive(Debug, Clone)]
pub struct Monitor {
    path: PathBuf,
    watch: WatchState,
    record: Option<WindRecord>,
    status: MonitorStatus,
    last_change: Option<DateTime<Local>>,
}

impl Monitor {
    /// Watch `path`. Surrounding whitespace is ignored, as in `set_path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: trimmed(path.into()),
            watch: WatchState::default(),
            record: None,
            status: MonitorStatus::Waiting,
            last_change: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self) -> Option<&WindRecord> {
        self.record.as_ref()
    }

    pub fn status(&self) -> MonitorStatus {
        self.status
    }

    /// Local time of the last detected file change.
    pub fn last_change(&self) -> Option<DateTime<Local>> {
        self.last_change
    }

    /// Watch a different file. Surrounding whitespace is ignored; an empty
    /// string means "no file selected".
    pub fn set_path(&mut self, path: &str) {
        self.path = trimmed(PathBuf::from(path));
        self.watch = WatchState::reset();
        self.record = None;
        self.status = MonitorStatus::Waiting;
        self.last_change = None;
        tracing::info!(path = %self.path.display(), "watching data file");
    }

    /// Forget the stored modification time so the next tick re-reads the file.
    pub fn force_reload(&mut self) {
        self.watch = WatchState::reset();
    }

    /// Run one poll step. Returns `true` when anything visible changed.
    pub fn tick(&mut self) -> bool {
        let (event, next) = tick(&self.path, self.watch);
        self.watch = next;

        match event {
            WatchEvent::NoPath => self.set_status(MonitorStatus::NoPath),
            WatchEvent::NotFound => {
                let had_record = self.record.take().is_some();
                self.set_status(MonitorStatus::NotFound) || had_record
            }
            WatchEvent::Changed => {
                let parsed = parse_wind_file(&self.path);
                let status = if parsed.is_some() {
                    MonitorStatus::Updated
                } else {
                    MonitorStatus::Invalid
                };
                self.record = parsed;
                self.last_change = Some(Local::now());
                self.set_status(status);
                true
            }
            WatchEvent::Unchanged => false,
        }
    }

    fn set_status(&mut self, status: MonitorStatus) -> bool {
        if self.status == status {
            return false;
        }
        match status {
            MonitorStatus::NotFound => {
                tracing::info!(path = %self.path.display(), "data file not found")
            }
            MonitorStatus::Invalid => {
                tracing::warn!(path = %self.path.display(), "data file invalid or incomplete")
            }
            MonitorStatus::Updated => tracing::info!(path = %self.path.display(), "receiving data"),
            MonitorStatus::NoPath => tracing::info!("no data file selected"),
            MonitorStatus::Waiting => {}
        }
        self.status = status;
        true
    }
}

fn trimmed(path: PathBuf) -> PathBuf {
    match path.to_str() {
        Some(s) if s.trim().len() != s.len() => PathBuf::from(s.trim()),
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};

    fn bump_mtime(path: &Path, secs: u64) {
        let f = File::options().write(true).open(path).unwrap();
        f.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + secs))
            .unwrap();
    }

    #[test]
    fn valid_file_becomes_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("WindyData.txt");
        std::fs::write(&path, "speed=5.5\ndirection_deg=180\n").unwrap();

        let mut monitor = Monitor::new(&path);
        assert_eq!(monitor.status(), MonitorStatus::Waiting);
        assert!(monitor.tick());
        assert_eq!(monitor.status(), MonitorStatus::Updated);
        assert_eq!(monitor.record().and_then(|r| r.speed()), Some(5.5));
        assert!(monitor.last_change().is_some());

        assert!(!monitor.tick(), "unchanged file does not redraw");
    }

    #[test]
    fn incomplete_write_clears_whole_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("WindyData.txt");
        std::fs::write(&path, "speed=5.5\ndirection_deg=180\naltitude=10\n").unwrap();
        bump_mtime(&path, 0);

        let mut monitor = Monitor::new(&path);
        monitor.tick();
        assert!(monitor.record().is_some());

        std::fs::write(&path, "speed=6.0\n").unwrap();
        bump_mtime(&path, 1);
        assert!(monitor.tick());
        assert_eq!(monitor.status(), MonitorStatus::Invalid);
        assert!(monitor.record().is_none());
    }

    #[test]
    fn deleted_file_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("WindyData.txt");
        std::fs::write(&path, "speed=1\ndirection_deg=2\n").unwrap();

        let mut monitor = Monitor::new(&path);
        monitor.tick();
        std::fs::remove_file(&path).unwrap();

        assert!(monitor.tick());
        assert_eq!(monitor.status(), MonitorStatus::NotFound);
        assert!(monitor.record().is_none());
        assert!(!monitor.tick(), "steady not-found state does not redraw");
    }

    #[test]
    fn empty_path_is_no_path() {
        let mut monitor = Monitor::new("");
        assert!(monitor.tick());
        assert_eq!(monitor.status(), MonitorStatus::NoPath);
    }

    #[test]
    fn blank_initial_path_is_no_path() {
        let mut monitor = Monitor::new("   ");
        assert_eq!(monitor.path(), Path::new(""));
        assert!(monitor.tick());
        assert_eq!(monitor.status(), MonitorStatus::NoPath);
    }

    #[test]
    fn padded_initial_path_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("WindyData.txt");
        std::fs::write(&path, "speed=2\ndirection_deg=90\n").unwrap();

        let mut monitor = Monitor::new(format!(" {}\t", path.display()));
        assert_eq!(monitor.path(), path.as_path());
        monitor.tick();
        assert_eq!(monitor.status(), MonitorStatus::Updated);
    }

    #[test]
    fn switching_path_resets_state() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "speed=1\ndirection_deg=2\n").unwrap();
        std::fs::write(&b, "speed=3\ndirection_deg=4\n").unwrap();

        let mut monitor = Monitor::new(&a);
        monitor.tick();

        monitor.set_path(&format!("  {}  ", b.display()));
        assert_eq!(monitor.path(), b.as_path());
        assert_eq!(monitor.status(), MonitorStatus::Waiting);
        assert!(monitor.record().is_none());

        monitor.tick();
        assert_eq!(monitor.record().and_then(|r| r.speed()), Some(3.0));
    }

    #[test]
    fn force_reload_reparses_unchanged_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("WindyData.txt");
        std::fs::write(&path, "speed=1\ndirection_deg=2\n").unwrap();

        let mut monitor = Monitor::new(&path);
        monitor.tick();
        assert!(!monitor.tick());
        monitor.force_reload();
        assert!(monitor.tick());
    }
}
