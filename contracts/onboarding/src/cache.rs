//! Write-buffered storage scope.
//!
//! `StorageTransaction` reads through to the wrapped storage and keeps every
//! write in memory. Calling `commit` flushes the writes in key order;
//! dropping the transaction discards them. The packet pipeline runs each
//! step that moves value inside one of these so a failure halfway through a
//! step leaves the underlying storage untouched.

use std::collections::BTreeMap;
use std::ops::Bound;

use cosmwasm_std::{Order, Record, Storage};

pub struct StorageTransaction<'a> {
    base: &'a mut dyn Storage,
    /// `None` marks a pending removal
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> StorageTransaction<'a> {
    pub fn new(base: &'a mut dyn Storage) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    pub fn commit(self) {
        let StorageTransaction { base, writes } = self;
        for (key, value) in writes {
            match value {
                Some(value) => base.set(&key, &value),
                None => base.remove(&key),
            }
        }
    }

    /// Drop all buffered writes explicitly
    pub fn rollback(self) {}
}

impl<'a> Storage for StorageTransaction<'a> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(pending) => pending.clone(),
            None => self.base.get(key),
        }
    }

    fn range<'b>(
        &'b self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'b> {
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Box::new(std::iter::empty());
            }
        }

        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self
            .base
            .range(start, end, Order::Ascending)
            .collect();

        let lower = start.map_or(Bound::Unbounded, |s| Bound::Included(s.to_vec()));
        let upper = end.map_or(Bound::Unbounded, |e| Bound::Excluded(e.to_vec()));
        for (key, value) in self.writes.range((lower, upper)) {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        match order {
            Order::Ascending => Box::new(merged.into_iter()),
            Order::Descending => Box::new(merged.into_iter().rev()),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
    }

    fn remove(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }
}
