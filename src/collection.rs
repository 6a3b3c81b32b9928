//! Model collections
//!
//! A dense, order-preserving wrapper over a result set. Indexes are
//! positional and contiguous; removing an element shifts the rest down.

use std::ops::{Index, IndexMut};

use serde_json::Value;

use crate::model::Model;

#[derive(Debug, Clone, PartialEq)]
pub struct Collection<M> {
    items: Vec<M>,
}

impl<M> Collection<M> {
    pub fn new() -> Self {
        Collection { items: Vec::new() }
    }

    pub fn from_vec(items: Vec<M>) -> Self {
        Collection { items }
    }

    pub fn into_vec(self) -> Vec<M> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Alias for `len`
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&M> {
        self.items.first()
    }

    pub fn get(&self, index: usize) -> Option<&M> {
        self.items.get(index)
    }

    pub fn push(&mut self, item: M) {
        self.items.push(item);
    }

    /// Remove and return the element at `index`, shifting later
    /// elements down. `None` when the index is out of range.
    pub fn remove(&mut self, index: usize) -> Option<M> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Remove and return the first element
    pub fn pop_first(&mut self) -> Option<M> {
        self.remove(0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, M> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[M] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [M] {
        &mut self.items
    }

    /// New collection with `f` applied to every element; the source is
    /// not mutated
    pub fn map<T, F: FnMut(&M) -> T>(&self, f: F) -> Collection<T> {
        Collection {
            items: self.items.iter().map(f).collect(),
        }
    }
}

impl<M: Model> Collection<M> {
    /// Serialize every model, loaded relationship data included
    pub fn to_documents(&self) -> Value {
        Value::Array(self.items.iter().map(|m| m.to_document()).collect())
    }
}

impl<M> Default for Collection<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Index<usize> for Collection<M> {
    type Output = M;

    fn index(&self, index: usize) -> &M {
        &self.items[index]
    }
}

impl<M> IndexMut<usize> for Collection<M> {
    fn index_mut(&mut self, index: usize) -> &mut M {
        &mut self.items[index]
    }
}

impl<M> IntoIterator for Collection<M> {
    type Item = M;
    type IntoIter = std::vec::IntoIter<M>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, M> IntoIterator for &'a Collection<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<M> FromIterator<M> for Collection<M> {
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self {
        Collection {
            items: iter.into_iter().collect(),
        }
    }
}

impl<M> From<Vec<M>> for Collection<M> {
    fn from(items: Vec<M>) -> Self {
        Collection { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_shifts_later_elements() {
        let mut c = Collection::from_vec(vec![1, 2, 3]);
        assert_eq!(c.remove(0), Some(1));
        assert_eq!(c[0], 2);
        assert_eq!(c.len(), 2);
        assert_eq!(c.remove(5), None);
    }

    #[test]
    fn first_and_get_are_positional() {
        let c = Collection::from_vec(vec!["a", "b"]);
        assert_eq!(c.first(), Some(&"a"));
        assert_eq!(c.get(1), Some(&"b"));
        assert_eq!(c.get(2), None);
    }

    #[test]
    fn collects_from_iterators() {
        let c: Collection<i32> = (0..3).collect();
        assert_eq!(c.into_vec(), vec![0, 1, 2]);
    }
}
