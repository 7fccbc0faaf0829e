use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Entries older than this are dropped on the next insert.
const DEFAULT_RETENTION: Duration = Duration::from_secs(300);

/// In-memory store of GET response bodies keyed by full request URL.
#[derive(Debug)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, (Instant, String)>>,
    retention: Duration,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            retention,
        }
    }

    /// Body stored for `key` if it is younger than `max_age`.
    pub fn get(&self, key: &str, max_age: Duration) -> Option<String> {
        let entries = self.entries.lock().ok()?;
        let (stored_at, body) = entries.get(key)?;
        (stored_at.elapsed() < max_age).then(|| body.clone())
    }

    pub fn put(&self, key: String, body: String) {
        if let Ok(mut entries) = self.entries.lock() {
            let retention = self.retention;
            entries.retain(|_, (stored_at, _)| stored_at.elapsed() < retention);
            entries.insert(key, (Instant::now(), body));
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
