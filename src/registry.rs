//! In-memory user registry.
//!
//! The registry is the only owner of [`User`] records. Ids come from a
//! process-wide atomic counter starting at 1 and are never reused, even after
//! a delete. Every operation takes the map lock for its own duration only;
//! there are no multi-call transactions.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::user::{NewUser, User};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("user {0} not found")]
    NotFound(u64),
    /// The slot for this id was not in the expected state when written.
    #[error("user {0} was modified concurrently")]
    Conflict(u64),
}

pub struct Registry {
    next_id: AtomicU64,
    users: Mutex<HashMap<u64, User>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Every operation leaves the map consistent before it can panic, so a
    /// poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashMap<u64, User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create(&self, candidate: NewUser) -> Result<User, RegistryError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let user = User {
            id,
            username: candidate.username,
            email: candidate.email,
            full_name: candidate.full_name,
            created_at: Utc::now(),
            updated_at: None,
        };

        match self.lock().entry(id) {
            Entry::Occupied(_) => Err(RegistryError::Conflict(id)),
            Entry::Vacant(slot) => Ok(slot.insert(user).clone()),
        }
    }

    /// Snapshot of every record, in no particular order.
    pub fn all(&self) -> Vec<User> {
        self.lock().values().cloned().collect()
    }

    pub fn get(&self, id: u64) -> Result<User, RegistryError> {
        self.lock().get(&id).cloned().ok_or(RegistryError::NotFound(id))
    }

    /// Replaces every mutable field of `id`, keeping `id` and `created_at`.
    ///
    /// Reads the current record, then swaps the replacement in only if the
    /// stored record is still the one that was read. A delete or another
    /// update landing in between yields [`RegistryError::Conflict`].
    pub fn update(&self, id: u64, candidate: NewUser) -> Result<User, RegistryError> {
        let current = self.get(id)?;
        let replacement = User {
            id,
            username: candidate.username,
            email: candidate.email,
            full_name: candidate.full_name,
            created_at: current.created_at,
            updated_at: Some(Utc::now()),
        };
        self.compare_and_swap(&current, replacement)
    }

    fn compare_and_swap(&self, expected: &User, replacement: User) -> Result<User, RegistryError> {
        let mut users = self.lock();
        match users.get_mut(&expected.id) {
            Some(slot) if slot == expected => {
                *slot = replacement.clone();
                Ok(replacement)
            }
            _ => Err(RegistryError::Conflict(expected.id)),
        }
    }

    pub fn delete(&self, id: u64) -> Result<(), RegistryError> {
        self.lock()
            .remove(&id)
            .map(|_| ())
            .ok_or(RegistryError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
