use std::sync::{Arc, OnceLock};
use tokio::sync::Notify;

/// A value that is set at most once and can be awaited by any number of clones.
#[derive(Clone)]
pub struct OneTimeValue<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    value: OnceLock<T>,
    notify: Notify,
}

impl<T: Clone> Default for OneTimeValue<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Clone> OneTimeValue<T> {
    pub fn new() -> Self { Self { inner: Arc::new(Inner { value: OnceLock::new(), notify: Notify::new() }) } }

    /// Returns the rejected value if one was already set.
    pub fn set(&self, value: T) -> Result<(), T> {
        match self.inner.value.set(value) {
            Ok(()) => {
                self.inner.notify.notify_waiters();
                Ok(())
            }
            Err(value) => Err(value),
        }
    }

    pub async fn wait(&self) -> T {
        loop {
            // register interest before checking, so a set() in between is not missed
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(value) = self.inner.value.get() {
                return value.clone();
            }
            notified.await;
        }
    }

    pub fn get(&self) -> Option<T> { self.inner.value.get().cloned() }

    pub fn is_set(&self) -> bool { self.inner.value.get().is_some() }
}
