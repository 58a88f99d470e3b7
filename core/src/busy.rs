use std::sync::Arc;

use tracing::debug;

use crate::util::SafeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyStats {
    /// Locks currently held on the path.
    pub held: usize,
    pub locks: usize,
    /// Unlocks that actually released a held lock.
    pub releases: usize,
}

/// The application-wide busy indicator, counted per busy path.
///
/// Advisory only: it blocks the UI, not other callers.
#[derive(Clone, Default)]
pub struct BusyLocker {
    paths: Arc<SafeMap<String, BusyStats>>,
}

impl BusyLocker {
    pub fn new() -> Self { Self::default() }

    pub fn lock(&self, path: &str) {
        self.paths.update(path.to_string(), |entry| {
            let stats = entry.or_default();
            stats.held += 1;
            stats.locks += 1;
        });
        debug!("busy lock {}", path);
    }

    /// Unlocking a path that is not locked is a no-op.
    pub fn unlock(&self, path: &str) {
        let released = self.paths.update(path.to_string(), |entry| {
            let stats = entry.or_default();
            if stats.held == 0 {
                return false;
            }
            stats.held -= 1;
            stats.releases += 1;
            true
        });
        if released {
            debug!("busy unlock {}", path);
        } else {
            debug!("busy unlock {} ignored, not locked", path);
        }
    }

    pub fn is_locked(&self, path: &str) -> bool { self.paths.get(&path.to_string()).is_some_and(|s| s.held > 0) }

    pub fn stats(&self, path: &str) -> BusyStats { self.paths.get(&path.to_string()).unwrap_or_default() }

    /// Lock `path` until the guard is released or dropped.
    pub fn guard(&self, path: impl Into<String>) -> BusyGuard {
        let path = path.into();
        self.lock(&path);
        BusyGuard { locker: self.clone(), path, released: false }
    }
}

pub struct BusyGuard {
    locker: BusyLocker,
    path: String,
    released: bool,
}

impl BusyGuard {
    pub fn path(&self) -> &str { &self.path }

    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.locker.unlock(&self.path);
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) { self.release(); }
}
