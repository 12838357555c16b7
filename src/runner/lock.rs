//! Mutual exclusion between runs.
//!
//! A run rewrites every artifact in place, so two overlapping runs must
//! never interleave writes. The lock is an advisory file lock scoped to
//! the guard, so it is released on every exit path.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use fd_lock::{RwLock, RwLockWriteGuard};

use super::RunError;

/// File-backed lock held for the duration of a run.
pub struct RunLock {
    inner: RwLock<File>,
}

impl RunLock {
    /// Open the lock file, creating it if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RunError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(path)?;
        Ok(Self {
            inner: RwLock::new(file),
        })
    }

    /// Acquire the lock without blocking.
    ///
    /// Fails with [`RunError::Overlapping`] when another run holds it.
    pub fn try_acquire(&mut self) -> Result<RwLockWriteGuard<'_, File>, RunError> {
        self.inner.try_write().map_err(|e| {
            if e.kind() == io::ErrorKind::WouldBlock {
                RunError::Overlapping
            } else {
                RunError::Io(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("run.lock");

        let mut first = RunLock::open(&path).unwrap();
        let guard = first.try_acquire().unwrap();

        let mut second = RunLock::open(&path).unwrap();
        assert!(matches!(
            second.try_acquire(),
            Err(RunError::Overlapping)
        ));

        // Released with the guard
        drop(guard);
        let mut third = RunLock::open(&path).unwrap();
        assert!(third.try_acquire().is_ok());
    }
}
