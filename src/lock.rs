//! Locked, atomic access to the state file
//!
//! Every read and write of `<key>.json` holds an exclusive `fs2` lock on the
//! sibling `<key>.json.lock`. Writes land in a temp sibling that is renamed
//! over the target, so a TUI and a scripted CLI call running side by side
//! never see a half-written state file.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{Error, Result};

/// How long a command waits for another hausplan process to finish writing
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

const RETRY_EVERY: Duration = Duration::from_millis(50);

/// Exclusive lock on a state file, released on drop
pub struct StateLock {
    file: File,
}

impl StateLock {
    /// Lock `state_path`, waiting up to `timeout_ms` for other holders
    pub fn acquire(state_path: &Path, timeout_ms: u64) -> Result<Self> {
        let lock_path = lock_path_for(state_path);
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(Self { file }),
                Err(err) if !is_contended(&err) => return Err(Error::Io(err)),
                Err(_) if Instant::now() >= deadline => return Err(Error::LockFailed(lock_path)),
                Err(_) => std::thread::sleep(RETRY_EVERY),
            }
        }
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn is_contended(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }
    // fs2 reports Windows sharing violations as raw OS errors
    cfg!(windows) && matches!(err.raw_os_error(), Some(32) | Some(33))
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// `state.json` -> `state.json.lock`
pub fn lock_path_for(state_path: &Path) -> PathBuf {
    sibling(state_path, ".lock")
}

/// Replace `path` with `data` via a synced temp sibling and a rename
///
/// Takes no lock; callers sharing the file use `write_locked`.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = sibling(path, &format!(".tmp.{}", std::process::id()));
    let written = File::create(&temp_path).and_then(|mut temp| {
        temp.write_all(data)?;
        temp.sync_all()
    });
    if let Err(err) = written.and_then(|()| fs::rename(&temp_path, path)) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::Io(err));
    }
    Ok(())
}

pub fn write_locked(path: &Path, data: &[u8], timeout_ms: u64) -> Result<()> {
    let _lock = StateLock::acquire(path, timeout_ms)?;
    write_atomic(path, data)
}

/// Read `path` under its lock; a missing file is `None` and creates no lock
pub fn read_locked(path: &Path, timeout_ms: u64) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let _lock = StateLock::acquire(path, timeout_ms)?;
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(Error::Io(err)),
    };
    String::from_utf8(bytes).map(Some).map_err(|err| {
        Error::OperationFailed(format!("{} is not UTF-8: {err}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn second_holder_times_out() {
        let temp_dir = TempDir::new().unwrap();
        let state = temp_dir.path().join("wohnheim-tracker.json");

        let held = StateLock::acquire(&state, 1000).unwrap();
        assert!(lock_path_for(&state).exists());
        assert!(matches!(
            StateLock::acquire(&state, 50),
            Err(Error::LockFailed(path)) if path == lock_path_for(&state)
        ));

        drop(held);
        assert!(StateLock::acquire(&state, 50).is_ok());
    }

    #[test]
    fn atomic_write_replaces_and_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        let state = temp_dir.path().join("nested").join("state.json");

        write_atomic(&state, b"{\"members\":[]}").unwrap();
        write_atomic(&state, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&state).unwrap(), "{}");

        let leftovers = fs::read_dir(state.parent().unwrap())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn missing_file_reads_none_without_lock() {
        let temp_dir = TempDir::new().unwrap();
        let state = temp_dir.path().join("absent.json");

        assert!(read_locked(&state, 1000).unwrap().is_none());
        assert!(!lock_path_for(&state).exists());
    }

    #[test]
    fn non_utf8_state_is_an_operation_failure() {
        let temp_dir = TempDir::new().unwrap();
        let state = temp_dir.path().join("state.json");
        fs::write(&state, [0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(
            read_locked(&state, 1000),
            Err(Error::OperationFailed(_))
        ));
    }

    #[test]
    fn concurrent_writers_never_tear_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let state = temp_dir.path().join("state.json");

        let writers = 8;
        let barrier = Arc::new(Barrier::new(writers));
        let payloads: Vec<String> = (0..writers)
            .map(|idx| format!("{{\"writer\":{idx},\"pad\":\"{}\"}}", "x".repeat(64)))
            .collect();

        let handles: Vec<_> = payloads
            .iter()
            .cloned()
            .map(|payload| {
                let barrier = Arc::clone(&barrier);
                let state = state.clone();
                thread::spawn(move || {
                    barrier.wait();
                    write_locked(&state, payload.as_bytes(), 2000).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let contents = read_locked(&state, 1000).unwrap().unwrap();
        assert!(payloads.contains(&contents));
    }
}
