//! Array-backed stack and sequential list.

use super::Value;
use crate::error::StructvizError;

/// LIFO stack; the last item of `items()` is the top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    items: Vec<Value>,
}

impl Stack {
    /// Empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack holding `items` bottom to top.
    #[must_use]
    pub fn from_items(items: Vec<Value>) -> Self {
        Self { items }
    }

    /// Items bottom to top.
    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Top item.
    #[must_use]
    pub fn peek(&self) -> Option<Value> {
        self.items.last().copied()
    }

    /// Push onto the top.
    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    /// Pop the top item.
    pub fn pop(&mut self) -> Result<Value, StructvizError> {
        self.items.pop().ok_or(StructvizError::EmptyStructure)
    }

    /// Drop every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Contiguous list with positional insert and remove.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceList {
    items: Vec<Value>,
}

impl SequenceList {
    /// Empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// List holding `items` in order.
    #[must_use]
    pub fn from_items(items: Vec<Value>) -> Self {
        Self { items }
    }

    /// Items in order.
    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.get(index).copied()
    }

    /// Valid insert positions are `0..=len`.
    pub fn check_insert(&self, index: usize) -> Result<(), StructvizError> {
        if index > self.items.len() {
            return Err(StructvizError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    /// Valid remove positions are `0..len`.
    pub fn check_remove(&self, index: usize) -> Result<(), StructvizError> {
        if self.items.is_empty() {
            return Err(StructvizError::EmptyStructure);
        }
        if index >= self.items.len() {
            return Err(StructvizError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    /// Insert `value` so that it ends up at `index`.
    pub fn insert(
        &mut self,
        index: usize,
        value: Value,
    ) -> Result<(), StructvizError> {
        self.check_insert(index)?;
        self.items.insert(index, value);
        Ok(())
    }

    /// Remove and return the item at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Value, StructvizError> {
        self.check_remove(index)?;
        Ok(self.items.remove(index))
    }

    /// Drop every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
