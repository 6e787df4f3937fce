use tokio::sync::Mutex;

/// Exclusive access to a loaded inference model from blocking worker threads.
///
/// A panic while the model is held does not poison the lock; the next caller gets the model.
pub struct ModelLock<T> {
    inner: Mutex<T>,
}

impl<T> ModelLock<T> {
    pub fn new(model: T) -> Self {
        Self {
            inner: Mutex::new(model),
        }
    }

    /// Runs `f` with the model. Must be called outside the async runtime, e.g. from
    /// `spawn_blocking`.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.blocking_lock();
        f(&mut guard)
    }
}
