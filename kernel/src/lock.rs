use crate::entity::{BookId, UserId};

/// Identifies one aggregate for mutual exclusion. The derived ordering
/// (books before users, then by id) is the global acquisition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LockKey {
    Book(BookId),
    User(UserId),
}

#[async_trait::async_trait]
pub trait AggregateLock: 'static + Sync + Send {
    type Guard: Send + 'static;

    /// Waits until no other guard for `key` is alive.
    async fn acquire(&self, key: LockKey) -> Self::Guard;

    /// Acquires every key in the global order, skipping duplicates.
    async fn acquire_all(&self, keys: Vec<LockKey>) -> Vec<Self::Guard> {
        let mut keys = keys;
        keys.sort();
        keys.dedup();
        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.acquire(key).await);
        }
        guards
    }
}

pub trait DependOnAggregateLock: 'static + Sync + Send {
    type AggregateLock: AggregateLock;
    fn aggregate_lock(&self) -> &Self::AggregateLock;
}
