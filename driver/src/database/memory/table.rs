use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::RwLock;

use crate::error::DriverError;

/// An id-keyed collection. Every method is one short critical section, so a
/// caller never observes a half-applied write and never holds the lock
/// across an `.await`.
pub(in crate::database) struct Table<K, V> {
    name: &'static str,
    rows: RwLock<BTreeMap<K, V>>,
    sequence: AtomicI64,
}

impl<K, V> Table<K, V>
where
    K: Ord + Copy + AsRef<i64>,
    V: Clone,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: RwLock::new(BTreeMap::new()),
            sequence: AtomicI64::new(1),
        }
    }

    pub fn next_id(&self) -> i64 {
        self.sequence.fetch_add(1, Ordering::SeqCst)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.rows.read().get(key).cloned()
    }

    pub fn all(&self) -> Vec<V> {
        self.rows.read().values().cloned().collect()
    }

    pub fn filter(&self, predicate: impl Fn(&V) -> bool) -> Vec<V> {
        self.rows
            .read()
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    pub fn find(&self, predicate: impl Fn(&V) -> bool) -> Option<V> {
        self.rows.read().values().find(|row| predicate(row)).cloned()
    }

    pub fn insert(&self, key: K, value: V) -> Result<(), DriverError> {
        let mut rows = self.rows.write();
        if rows.contains_key(&key) {
            return Err(DriverError::Duplicate {
                table: self.name,
                id: *key.as_ref(),
            });
        }
        rows.insert(key, value);
        // explicit ids must never be handed out again by next_id
        self.sequence.fetch_max(key.as_ref() + 1, Ordering::SeqCst);
        Ok(())
    }

    pub fn modify(&self, key: &K, merge: impl FnOnce(V) -> V) -> Result<V, DriverError> {
        let mut rows = self.rows.write();
        let row = rows.get_mut(key).ok_or_else(|| DriverError::Missing {
            table: self.name,
            id: *key.as_ref(),
        })?;
        let merged = merge(row.clone());
        *row = merged.clone();
        Ok(merged)
    }

    pub fn remove(&self, key: &K) -> Result<V, DriverError> {
        self.rows
            .write()
            .remove(key)
            .ok_or_else(|| DriverError::Missing {
                table: self.name,
                id: *key.as_ref(),
            })
    }
}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::BookId;

    use super::Table;
    use crate::error::DriverError;

    #[test]
    fn explicit_ids_advance_the_sequence() {
        let table = Table::<BookId, &str>::new("books");
        assert_eq!(table.next_id(), 1);
        table.insert(BookId::new(10), "ten").unwrap();
        assert_eq!(table.next_id(), 11);
        assert!(matches!(
            table.insert(BookId::new(10), "again"),
            Err(DriverError::Duplicate { id: 10, .. })
        ));
    }

    #[test]
    fn modify_and_remove_require_existing_rows() {
        let table = Table::<BookId, i32>::new("books");
        assert!(matches!(
            table.modify(&BookId::new(1), |v| v + 1),
            Err(DriverError::Missing { id: 1, .. })
        ));
        table.insert(BookId::new(1), 1).unwrap();
        assert_eq!(table.modify(&BookId::new(1), |v| v + 1).unwrap(), 2);
        assert_eq!(table.get(&BookId::new(1)), Some(2));
        assert_eq!(table.remove(&BookId::new(1)).unwrap(), 2);
        assert!(table.get(&BookId::new(1)).is_none());
    }
}
