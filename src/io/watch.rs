//! Modification-time polling.
//!
//! `tick` is a pure step: previous `WatchState` in, event plus next state out.
//! Only the presence of a difference matters, so any number of writes between
//! two ticks collapse into one `Changed`.

use std::fs;
use std::path::Path;

use crate::domain::{WatchEvent, WatchState};

/// Check `path` once against the previously observed modification time.
pub fn tick(path: &Path, state: WatchState) -> (WatchEvent, WatchState) {
    if path.as_os_str().is_empty() {
        return (WatchEvent::NoPath, state);
    }

    if !path.exists() {
        return (WatchEvent::NotFound, WatchState::reset());
    }

    // A failed stat counts as "no timestamp" for this tick only.
    let current = match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(t) => Some(t),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "modification time unavailable");
            None
        }
    };

    if current == state.last_modified {
        (WatchEvent::Unchanged, state)
    } else {
        (WatchEvent::Changed, WatchState { last_modified: current })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};

    fn set_mtime(path: &Path, t: SystemTime) {
        let f = File::options().write(true).open(path).unwrap();
        f.set_modified(t).unwrap();
    }

    #[test]
    fn empty_path_reports_no_path_and_keeps_state() {
        let state = WatchState {
            last_modified: Some(SystemTime::UNIX_EPOCH),
        };
        let (event, next) = tick(Path::new(""), state);
        assert_eq!(event, WatchEvent::NoPath);
        assert_eq!(next, state);
    }

    #[test]
    fn first_tick_changes_then_second_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("WindyData.txt");
        std::fs::write(&path, "speed=1\ndirection_deg=2\n").unwrap();

        let (first, state) = tick(&path, WatchState::default());
        assert_eq!(first, WatchEvent::Changed);
        assert!(state.last_modified.is_some());

        let (second, state2) = tick(&path, state);
        assert_eq!(second, WatchEvent::Unchanged);
        assert_eq!(state2, state);
    }

    #[test]
    fn moved_mtime_is_a_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "speed=1\n").unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        set_mtime(&path, base);

        let (_, state) = tick(&path, WatchState::default());
        set_mtime(&path, base + Duration::from_secs(1));
        let (event, next) = tick(&path, state);

        assert_eq!(event, WatchEvent::Changed);
        assert_eq!(next.last_modified, Some(base + Duration::from_secs(1)));
    }

    #[test]
    fn writes_between_ticks_coalesce_into_one_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "speed=1\n").unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        set_mtime(&path, base);
        let (_, state) = tick(&path, WatchState::default());

        std::fs::write(&path, "speed=2\n").unwrap();
        set_mtime(&path, base + Duration::from_secs(1));
        std::fs::write(&path, "speed=3\n").unwrap();
        set_mtime(&path, base + Duration::from_secs(2));

        let (event, state) = tick(&path, state);
        assert_eq!(event, WatchEvent::Changed);
        assert_eq!(state.last_modified, Some(base + Duration::from_secs(2)));

        let (event, _) = tick(&path, state);
        assert_eq!(event, WatchEvent::Unchanged, "both writes reported by a single change");
    }

    #[test]
    fn older_mtime_still_counts_as_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "speed=1\n").unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        set_mtime(&path, base);

        let (_, state) = tick(&path, WatchState::default());
        set_mtime(&path, base - Duration::from_secs(60));
        let (event, _) = tick(&path, state);
        assert_eq!(event, WatchEvent::Changed, "any difference counts, not only newer");
    }

    #[test]
    fn missing_file_resets_state_and_reappearance_is_a_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "speed=1\n").unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        set_mtime(&path, base);

        let (_, state) = tick(&path, WatchState::default());
        std::fs::remove_file(&path).unwrap();

        let (event, state) = tick(&path, state);
        assert_eq!(event, WatchEvent::NotFound);
        assert_eq!(state, WatchState::default());

        std::fs::write(&path, "speed=1\n").unwrap();
        set_mtime(&path, base);
        let (event, _) = tick(&path, state);
        assert_eq!(event, WatchEvent::Changed, "same mtime as before deletion still re-parses");
    }
}
