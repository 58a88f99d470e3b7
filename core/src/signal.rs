use std::{
    collections::{hash_map::Entry, VecDeque},
    sync::{Arc, Mutex},
};

use docflow_proto::DocumentPath;
use tracing::{debug, warn};

use crate::util::{OneTimeValue, SafeMap};

/// Fired outcomes nobody watched yet that a hub keeps. Older ones are dropped first.
pub const RETAINED_UNWATCHED: usize = 64;

/// Result of the backend round trip for a newly created row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateOutcome {
    pub success: bool,
}

#[derive(Clone, Default)]
struct Slot {
    value: OneTimeValue<CreateOutcome>,
    watched: bool,
}

/// One-shot "create completed" signals keyed by document path.
///
/// Owned by a list binding. The binding fires once per created row; the controller watches
/// the row it created. A fire that arrives before the watch is kept until it is watched, but
/// only the latest [`RETAINED_UNWATCHED`] of them: rows created outside the controller are
/// fired and never watched.
#[derive(Default, Clone)]
pub struct CreateCompletedHub {
    slots: Arc<SafeMap<DocumentPath, Slot>>,
    unwatched: Arc<Mutex<VecDeque<DocumentPath>>>,
}

impl CreateCompletedHub {
    pub fn new() -> Self { Self::default() }

    pub fn watch(&self, path: &DocumentPath) -> CreateCompletedWatch {
        let value = self.slots.update(path.clone(), |entry| {
            let slot = entry.or_default();
            slot.watched = true;
            slot.value.clone()
        });
        self.unwatched.lock().expect("Failed to lock unwatched fires").retain(|p| p != path);
        CreateCompletedWatch { path: path.clone(), value, slots: self.slots.clone() }
    }

    pub fn fire(&self, path: &DocumentPath, outcome: CreateOutcome) {
        let (value, watched) = self.slots.update(path.clone(), |entry| {
            let slot = entry.or_default();
            (slot.value.clone(), slot.watched)
        });
        if value.set(outcome).is_err() {
            warn!("create completed fired twice for {}", path);
            return;
        }
        if !watched {
            self.retain_unwatched(path);
        }
    }

    fn retain_unwatched(&self, path: &DocumentPath) {
        let mut unwatched = self.unwatched.lock().expect("Failed to lock unwatched fires");
        unwatched.push_back(path.clone());
        while unwatched.len() > RETAINED_UNWATCHED {
            let Some(evicted) = unwatched.pop_front() else {
                break;
            };
            self.slots.update(evicted.clone(), |entry| {
                if let Entry::Occupied(slot) = entry {
                    if !slot.get().watched {
                        debug!("dropping unwatched create outcome for {}", evicted);
                        slot.remove();
                    }
                }
            });
        }
    }

    pub fn is_watched(&self, path: &DocumentPath) -> bool { self.slots.get(path).is_some_and(|slot| slot.watched) }

    /// Paths with a pending signal, watched or fired.
    pub fn len(&self) -> usize { self.slots.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Unsubscribes on drop.
pub struct CreateCompletedWatch {
    path: DocumentPath,
    value: OneTimeValue<CreateOutcome>,
    slots: Arc<SafeMap<DocumentPath, Slot>>,
}

impl CreateCompletedWatch {
    pub async fn wait(&self) -> CreateOutcome { self.value.wait().await }
}

impl Drop for CreateCompletedWatch {
    fn drop(&mut self) {
        debug!("Dropping CreateCompletedWatch {}", self.path);
        self.slots.remove(&self.path);
    }
}
