use std::sync::{Mutex, PoisonError};

/// Remote paths whose upload the server confirmed.
///
/// Only successful stores are recorded, so cleanup never deletes a path
/// that was not written by this run.
#[derive(Debug, Default)]
pub struct UploadedFiles {
    paths: Mutex<Vec<String>>,
}

impl UploadedFiles {
    pub fn record(&self, path: String) {
        self.lock().push(path);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes and returns every recorded path.
    #[must_use]
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.paths.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
