// ============================
// console-backend/src/auth/session.rs
// ============================
//! Expiring session table with sliding refresh and a background sweep.
use std::{
    collections::HashMap,
    sync::{Arc, Weak},
    time::Duration,
};

use metrics::{counter, gauge};
use parking_lot::RwLock;
use tokio::{task::JoinHandle, time::Instant};
use tracing::debug;

use crate::config::SessionSettings;
use crate::metrics::{
    SESSION_ACTIVE, SESSION_CREATED, SESSION_DELETED, SESSION_EXPIRED, SESSION_REFRESHED,
};

/// Default idle lifetime of a session
pub const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Default period of the expiry sweep
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Lifetime requested for a new entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Use the store's default lifetime
    Default,
    /// Use an explicit lifetime
    Custom(Duration),
}

/// Session table keyed by opaque token.
///
/// Presence of an unexpired entry is the whole meaning of "authenticated";
/// there is no payload. Every operation runs under one lock, so the sweeper
/// and request handlers never see an entry half removed.
#[derive(Debug)]
pub struct SessionStore {
    entries: RwLock<HashMap<String, Instant>>,
    default_ttl: Duration,
    sweep_interval: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_timeouts(SESSION_TTL, SWEEP_INTERVAL)
    }
}

impl SessionStore {
    /// Create a store from settings. No sweeper is running yet.
    pub fn new(settings: &SessionSettings) -> Self {
        Self::with_timeouts(settings.ttl(), settings.sweep_interval())
    }

    /// Create a store with explicit timeouts
    pub fn with_timeouts(default_ttl: Duration, sweep_interval: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
            sweep_interval,
        }
    }

    /// Create a shared store and start its sweeper
    pub fn start(settings: &SessionSettings) -> Arc<Self> {
        let store = Arc::new(Self::new(settings));
        store.spawn_sweeper();
        store
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Insert a session. An existing entry under `id` is left untouched and
    /// `false` is returned; callers are expected to mint collision-free ids.
    ///
    /// A custom lifetime too large to represent falls back to the default.
    pub fn create(&self, id: impl Into<String>, ttl: Ttl) -> bool {
        let now = Instant::now();
        let default_deadline = now + self.default_ttl;
        let deadline = match ttl {
            Ttl::Default => default_deadline,
            Ttl::Custom(ttl) => now.checked_add(ttl).unwrap_or(default_deadline),
        };

        let mut entries = self.entries.write();
        let id = id.into();
        let inserted = !entries.get(&id).is_some_and(|deadline| *deadline > now);
        if inserted {
            entries.insert(id, deadline);
            counter!(SESSION_CREATED).increment(1);
            gauge!(SESSION_ACTIVE).set(entries.len() as f64);
        }
        inserted
    }

    /// Whether `id` is present and unexpired
    pub fn get(&self, id: &str) -> bool {
        let now = Instant::now();
        self.entries
            .read()
            .get(id)
            .is_some_and(|deadline| *deadline > now)
    }

    /// Remove a session regardless of its remaining lifetime
    pub fn delete(&self, id: &str) -> bool {
        let mut entries = self.entries.write();
        let removed = entries.remove(id).is_some();
        if removed {
            counter!(SESSION_DELETED).increment(1);
            gauge!(SESSION_ACTIVE).set(entries.len() as f64);
        }
        removed
    }

    /// Restart the default lifetime of a live session.
    ///
    /// Equivalent to delete followed by create with [`Ttl::Default`], done
    /// atomically. An expired or unknown id is not resurrected.
    pub fn refresh(&self, id: &str) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.write();
        match entries.get_mut(id) {
            Some(deadline) if *deadline > now => {
                *deadline = now + self.default_ttl;
                counter!(SESSION_REFRESHED).increment(1);
                true
            },
            _ => false,
        }
    }

    /// Evict every expired entry, returning how many were removed
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, deadline| *deadline > now);
        let removed = before - entries.len();

        if removed > 0 {
            counter!(SESSION_EXPIRED).increment(removed as u64);
            gauge!(SESSION_ACTIVE).set(entries.len() as f64);
            debug!(removed, remaining = entries.len(), "swept expired sessions");
        }
        removed
    }

    /// Number of entries, expired-but-unswept ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Start the periodic sweep. The task stops once the store is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(self);
        let period = self.sweep_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                match store.upgrade() {
                    Some(store) => {
                        store.sweep();
                    },
                    None => break,
                }
            }
        })
    }
}
