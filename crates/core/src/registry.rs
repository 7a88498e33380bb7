//! Insertion-ordered, identifier-indexed aggregate collection.

use std::collections::HashMap;

use crate::aggregate::AggregateRoot;

/// Owned collection of aggregates keyed by their identifier.
///
/// Iteration follows insertion order, which is the order every list query
/// preserves. Entries are never removed, so positions stay stable.
#[derive(Debug, Clone)]
pub struct Registry<T: AggregateRoot> {
    items: Vec<T>,
    positions: HashMap<T::Id, usize>,
}

impl<T: AggregateRoot> Default for Registry<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<T: AggregateRoot> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new aggregate, handing it back if the id is taken.
    pub fn insert(&mut self, item: T) -> Result<&T, T> {
        if self.positions.contains_key(item.id()) {
            return Err(item);
        }
        let pos = self.items.len();
        self.positions.insert(item.id().clone(), pos);
        self.items.push(item);
        Ok(&self.items[pos])
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.positions.contains_key(id)
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.positions.get(id).map(|&pos| &self.items[pos])
    }

    pub fn get_mut(&mut self, id: &T::Id) -> Option<&mut T> {
        match self.positions.get(id) {
            Some(&pos) => Some(&mut self.items[pos]),
            None => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
