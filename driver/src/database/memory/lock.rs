use std::collections::HashMap;
use std::sync::Arc;

use kernel::interface::lock::{AggregateLock, LockKey};
use tokio::sync::{Mutex, OwnedMutexGuard};

type Slots = Arc<parking_lot::Mutex<HashMap<LockKey, Arc<Mutex<()>>>>>;

/// One async mutex per aggregate id, created on first use and dropped
/// again once nobody holds or waits for it.
#[derive(Default)]
pub struct MemoryAggregateLock {
    slots: Slots,
}

impl MemoryAggregateLock {
    fn slot(&self, key: LockKey) -> Arc<Mutex<()>> {
        self.slots.lock().entry(key).or_default().clone()
    }

    #[cfg(test)]
    fn registered(&self) -> usize {
        self.slots.lock().len()
    }
}

pub struct MemoryLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: LockKey,
    slots: Slots,
}

impl Drop for MemoryLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Clones are only handed out under the map lock, so a lone
        // reference here means no holder and no waiter remain.
        let mut slots = self.slots.lock();
        if slots
            .get(&self.key)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            slots.remove(&self.key);
            tracing::trace!(key = ?self.key, "aggregate lock retired");
        }
    }
}

#[async_trait::async_trait]
impl AggregateLock for MemoryAggregateLock {
    type Guard = MemoryLockGuard;

    async fn acquire(&self, key: LockKey) -> Self::Guard {
        let slot = self.slot(key);
        tracing::trace!(?key, "acquiring aggregate lock");
        let guard = slot.lock_owned().await;
        MemoryLockGuard {
            guard: Some(guard),
            key,
            slots: Arc::clone(&self.slots),
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;

    use kernel::interface::lock::{AggregateLock, LockKey};
    use kernel::prelude::entity::{BookId, UserId};

    use super::MemoryAggregateLock;

    #[tokio::test]
    async fn same_key_is_exclusive() {
        let locks = Arc::new(MemoryAggregateLock::default());
        let key = LockKey::Book(BookId::new(1));
        let guard = locks.acquire(key).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(key).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        // the waiter still needs the slot
        assert_eq!(locks.registered(), 1);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("lock released")
            .expect("task completed");
        assert_eq!(locks.registered(), 0);
    }

    #[tokio::test]
    async fn distinct_keys_do_not_block() {
        let locks = MemoryAggregateLock::default();
        let _book = locks.acquire(LockKey::Book(BookId::new(1))).await;
        let _user = tokio::time::timeout(
            Duration::from_secs(1),
            locks.acquire(LockKey::User(UserId::new(1))),
        )
        .await
        .expect("user lock is independent");
        assert_eq!(locks.registered(), 2);
    }

    #[tokio::test]
    async fn acquire_all_orders_and_dedups() {
        let locks = MemoryAggregateLock::default();
        let guards = locks
            .acquire_all(vec![
                LockKey::User(UserId::new(3)),
                LockKey::Book(BookId::new(2)),
                LockKey::User(UserId::new(3)),
            ])
            .await;
        assert_eq!(guards.len(), 2);
    }

    #[tokio::test]
    async fn released_locks_leave_no_slots_behind() {
        let locks = MemoryAggregateLock::default();
        for id in 1..=500 {
            let guards = locks
                .acquire_all(vec![
                    LockKey::Book(BookId::new(id)),
                    LockKey::User(UserId::new(id)),
                ])
                .await;
            assert_eq!(locks.registered(), 2);
            drop(guards);
        }
        assert_eq!(locks.registered(), 0);

        let held = locks.acquire(LockKey::Book(BookId::new(7))).await;
        drop(locks.acquire(LockKey::Book(BookId::new(8))).await);
        assert_eq!(locks.registered(), 1);
        drop(held);
        assert_eq!(locks.registered(), 0);
    }
}
