/// Registry of request tokens awaiting their callback
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A request token secret waiting to be exchanged
#[derive(Debug, Clone)]
pub struct PendingToken {
    pub secret: String,
    pub created_at: Instant,
}

impl PendingToken {
    /// Create a pending entry registered now
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            created_at: Instant::now(),
        }
    }
}

/// Storage interface for pending request tokens
///
/// A token is consumed at most once: after `pop` returns it, every later
/// `pop` for the same token returns `None`.
pub trait TokenStore: Send + Sync {
    /// Register a token, replacing any entry with the same key
    fn add(&self, token: &str, secret: &str);

    /// Look up and remove a token in one step
    fn pop(&self, token: &str) -> Option<String>;

    /// Number of tokens still waiting
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop entries registered longer than `max_age` ago
    ///
    /// Returns the number of entries removed.
    fn evict_older_than(&self, max_age: Duration) -> usize;
}

/// In-memory token store
///
/// Every operation takes the same lock, so concurrent `add`/`pop` calls
/// never observe a half-consumed entry.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<String, PendingToken>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn add(&self, token: &str, secret: &str) {
        let mut tokens = self.tokens.lock();
        tokens.insert(token.to_string(), PendingToken::new(secret.to_string()));
    }

    fn pop(&self, token: &str) -> Option<String> {
        let mut tokens = self.tokens.lock();
        tokens.remove(token).map(|pending| pending.secret)
    }

    fn len(&self) -> usize {
        self.tokens.lock().len()
    }

    fn evict_older_than(&self, max_age: Duration) -> usize {
        let mut tokens = self.tokens.lock();
        let before = tokens.len();
        tokens.retain(|_, pending| pending.created_at.elapsed() <= max_age);
        before - tokens.len()
    }
}
