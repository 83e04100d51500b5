use parking_lot::Mutex;

/// Sink for navigation side effects. The session store and role guard only
/// ever push routes; they never read back navigation state.
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}

/// Recording navigator for tests and headless embedding.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    history: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.history.lock().last().cloned()
    }
}

impl Navigator for MemoryNavigator {
    fn push(&self, path: &str) {
        self.history.lock().push(path.to_string());
    }
}
