use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The live spelling field: written by the UI, read and cleared by the worker.
pub trait SubmissionSource: Send + Sync {
    fn current(&self) -> String;
    fn clear(&self);
}

#[derive(Clone, Debug, Default)]
pub struct SharedSubmission {
    text: Arc<Mutex<String>>,
}

impl SharedSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.text.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, c: char) {
        self.lock().push(c);
    }

    pub fn backspace(&self) {
        self.lock().pop();
    }
}

impl SubmissionSource for SharedSubmission {
    fn current(&self) -> String {
        self.lock().clone()
    }

    fn clear(&self) {
        self.lock().clear();
    }
}
