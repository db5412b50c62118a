//! Single-flight coordinator for quote computations.
//!
//! [`QuoteCache::get_or_compute`] serves cached quote sets and guarantees that
//! concurrent callers asking for the same key share one computation:
//!
//! 1. Fast path: read the store without locking.
//! 2. Take the per-key lock and read the store again.
//! 3. Join the in-flight computation for the key if there is one.
//! 4. Otherwise register as the in-flight computation, run it, store the
//!    result and publish the outcome to every waiter.
//!
//! Failures are published but never stored. The in-flight registration and
//! the per-key lock entry are released when the computation settles or when
//! the leading future is dropped.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::{watch, Mutex as AsyncMutex};

use super::store::CacheStore;
use crate::errors::{AnycoinError, Result};
use crate::models::QuoteSet;

type Outcome = Option<Result<QuoteSet>>;

type LockTable = HashMap<String, LockEntry>;
type InFlightTable = HashMap<String, watch::Receiver<Outcome>>;

/// Lock a table mutex, recovering from poison.
///
/// The tables only hold bookkeeping entries; a panicking holder cannot leave
/// them logically inconsistent.
fn lock_table<'a, T>(mutex: &'a Mutex<T>, name: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("Quote cache {} mutex was poisoned, recovering", name);
        poisoned.into_inner()
    })
}

/// Per-key lock together with the number of live leases on it.
struct LockEntry {
    lock: Arc<AsyncMutex<()>>,
    leases: usize,
}

/// Injectable single-flight cache over a [`CacheStore`].
pub struct QuoteCache {
    store: Arc<dyn CacheStore>,
    locks: Mutex<LockTable>,
    in_flight: Mutex<InFlightTable>,
}

enum Role<'a> {
    Leader(watch::Sender<Outcome>, InFlightRegistration<'a>),
    Follower(watch::Receiver<Outcome>),
}

impl QuoteCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Return the cached quote set for `key`, or compute, store and return it.
    ///
    /// At most one `compute` runs per key at any instant; concurrent callers
    /// for the same key receive the same outcome.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> Result<QuoteSet>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<QuoteSet>>,
    {
        if let Some(hit) = self.lookup(key).await {
            debug!("Quote cache hit for '{}'", key);
            return Ok(hit);
        }

        let lease = self.lease(key);
        let role = {
            let _guard = lease.lock().await;

            if let Some(hit) = self.lookup(key).await {
                debug!("Quote cache hit for '{}' after waiting on key lock", key);
                return Ok(hit);
            }

            self.join_or_lead(key)
        };

        match role {
            Role::Follower(receiver) => {
                debug!("Joining in-flight quote computation for '{}'", key);
                Self::wait_for_outcome(key, receiver).await
            }
            Role::Leader(sender, registration) => {
                debug!("Quote cache miss for '{}', computing", key);
                let outcome = compute().await;

                if let Ok(set) = &outcome {
                    self.persist(key, set, ttl).await;
                }

                // Waiters holding a receiver still get the value after the
                // registration is dropped.
                sender.send_replace(Some(outcome.clone()));
                drop(registration);
                drop(lease);
                outcome
            }
        }
    }

    /// Remove a cached entry.
    pub async fn invalidate(&self, key: &str) {
        self.store.delete(key).await;
    }

    /// Remove every cached entry.
    pub async fn clear(&self) {
        self.store.clear().await;
    }

    /// Number of computations currently in flight.
    pub fn in_flight_count(&self) -> usize {
        lock_table(&self.in_flight, "in-flight").len()
    }

    /// Number of per-key locks currently allocated.
    pub fn lock_count(&self) -> usize {
        lock_table(&self.locks, "lock").len()
    }

    async fn lookup(&self, key: &str) -> Option<QuoteSet> {
        let payload = self.store.get(key).await?;
        match serde_json::from_str(&payload) {
            Ok(set) => Some(set),
            Err(e) => {
                warn!("Ignoring unreadable cached quotes for '{}': {}", key, e);
                None
            }
        }
    }

    async fn persist(&self, key: &str, set: &QuoteSet, ttl: Option<Duration>) {
        match serde_json::to_string(set) {
            Ok(payload) => self.store.set(key, payload, ttl).await,
            Err(e) => warn!("Could not serialize quotes for '{}': {}", key, e),
        }
    }

    /// Atomically join the computation registered for `key` or register a new one.
    fn join_or_lead(&self, key: &str) -> Role<'_> {
        let mut in_flight = lock_table(&self.in_flight, "in-flight");
        if let Some(receiver) = in_flight.get(key) {
            return Role::Follower(receiver.clone());
        }

        let (sender, receiver) = watch::channel(None);
        in_flight.insert(key.to_string(), receiver.clone());
        Role::Leader(
            sender,
            InFlightRegistration {
                cache: self,
                key: key.to_string(),
                receiver,
            },
        )
    }

    async fn wait_for_outcome(key: &str, mut receiver: watch::Receiver<Outcome>) -> Result<QuoteSet> {
        match receiver.wait_for(Option::is_some).await {
            Ok(outcome) => outcome.clone().unwrap_or_else(|| {
                Err(AnycoinError::Cache(format!(
                    "in-flight computation for '{}' produced no outcome",
                    key
                )))
            }),
            Err(_) => Err(AnycoinError::Cache(format!(
                "in-flight computation for '{}' was abandoned",
                key
            ))),
        }
    }

    fn lease(&self, key: &str) -> KeyLease<'_> {
        let mut locks = lock_table(&self.locks, "lock");
        let entry = locks.entry(key.to_string()).or_insert_with(|| LockEntry {
            lock: Arc::new(AsyncMutex::new(())),
            leases: 0,
        });
        entry.leases += 1;
        KeyLease {
            cache: self,
            key: key.to_string(),
            lock: Arc::clone(&entry.lock),
        }
    }
}

/// Shared handle on a per-key lock.
///
/// Leases are counted in the lock table under its mutex; the last lease to
/// drop removes the table entry.
struct KeyLease<'a> {
    cache: &'a QuoteCache,
    key: String,
    lock: Arc<AsyncMutex<()>>,
}

impl KeyLease<'_> {
    async fn lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for KeyLease<'_> {
    fn drop(&mut self) {
        let mut locks = lock_table(&self.cache.locks, "lock");
        let last = match locks.get_mut(&self.key) {
            Some(entry) => {
                entry.leases = entry.leases.saturating_sub(1);
                entry.leases == 0
            }
            None => false,
        };
        if last {
            locks.remove(&self.key);
        }
    }
}

/// Leader's entry in the in-flight table, removed on drop.
struct InFlightRegistration<'a> {
    cache: &'a QuoteCache,
    key: String,
    receiver: watch::Receiver<Outcome>,
}

impl Drop for InFlightRegistration<'_> {
    fn drop(&mut self) {
        let mut in_flight = lock_table(&self.cache.in_flight, "in-flight");
        if in_flight
            .get(&self.key)
            .is_some_and(|registered| registered.same_channel(&self.receiver))
        {
            in_flight.remove(&self.key);
        }
    }
}
