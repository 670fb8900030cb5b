use super::{ContextError, ContextResult};
use file_guard::{FileGuard, Lock};
use std::{
    collections::BTreeSet,
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
};
use tracing::debug;

// OS record locks are held per process, so every thread of one process would
// "own" the file lock at once. Threads first claim the lock path here.
// Paths are compared after making them absolute, not after resolving symlinks.
static HELD: Mutex<BTreeSet<PathBuf>> = Mutex::new(BTreeSet::new());
static RELEASED: Condvar = Condvar::new();

/// Exclusive ownership of the config lock file.
///
/// Released when dropped, on every exit path including unwinding.
/// Not reentrant: acquiring the same path twice on one thread deadlocks.
pub struct ConfigLock {
    path: PathBuf,
    file: Option<FileGuard<Box<File>>>,
}

impl ConfigLock {
    /// Blocks until the lock at `path` is held.
    pub fn acquire(path: &Path) -> ContextResult<Self> {
        let key = absolute(path)?;

        debug!(path = %key.display(), "waiting for config lock");
        let mut held = held();
        while held.contains(&key) {
            held = RELEASED.wait(held).unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(key.clone());
        drop(held);

        // Built before touching the file so any failure below still frees the slot.
        let mut lock = Self {
            path: key,
            file: None,
        };
        let file = open(&lock.path)?;
        let guard = file_guard::lock(file, Lock::Exclusive, 0, 1).map_err(|source| {
            ContextError::Lock {
                path: path.to_path_buf(),
                source,
            }
        })?;
        lock.file = Some(guard);
        debug!(path = %lock.path.display(), "config lock acquired");

        Ok(lock)
    }

    /// Returns `Ok(None)` instead of blocking when another flow holds the lock.
    pub fn try_acquire(path: &Path) -> ContextResult<Option<Self>> {
        let key = absolute(path)?;

        {
            let mut held = held();
            if held.contains(&key) {
                return Ok(None);
            }
            held.insert(key.clone());
        }

        let mut lock = Self {
            path: key,
            file: None,
        };
        let file = open(&lock.path)?;
        match file_guard::try_lock(file, Lock::Exclusive, 0, 1) {
            Ok(guard) => {
                lock.file = Some(guard);
                Ok(Some(lock))
            }
            Err(err) if is_contended(&err) => Ok(None),
            Err(source) => Err(ContextError::Lock {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl Drop for ConfigLock {
    fn drop(&mut self) {
        // Unlock and close the file before another thread of this process may open it.
        let had_file = self.file.take().is_some();

        held().remove(&self.path);
        RELEASED.notify_all();

        if had_file {
            debug!(path = %self.path.display(), "config lock released");
        }
    }
}

// POSIX lets F_SETLK report a conflicting lock as either EAGAIN or EACCES.
fn is_contended(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::PermissionDenied
    )
}

fn held() -> MutexGuard<'static, BTreeSet<PathBuf>> {
    HELD.lock().unwrap_or_else(PoisonError::into_inner)
}

fn absolute(path: &Path) -> ContextResult<PathBuf> {
    std::path::absolute(path).map_err(|source| ContextError::Lock {
        path: path.to_path_buf(),
        source,
    })
}

// Only the thread owning the slot for `path` may open it: closing any
// descriptor of a file drops every record lock this process holds on it.
fn open(path: &Path) -> ContextResult<Box<File>> {
    let lock_err = |source: io::Error| ContextError::Lock {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(lock_err)?;
    }

    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map(Box::new)
        .map_err(lock_err)
}
