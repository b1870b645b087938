//! Doubly linked list stored in a slot arena.
//!
//! Slots are stable for the lifetime of an element, which lets the layout
//! and the link animations refer to a node by slot while its position in
//! the list shifts.

use super::Value;
use crate::error::StructvizError;

/// One element and its neighbour links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkNode {
    /// Stored value.
    pub value: Value,
    /// Previous slot.
    pub prev: Option<usize>,
    /// Next slot.
    pub next: Option<usize>,
}

/// Doubly linked list over [`Value`]s.
#[derive(Debug, Clone, Default)]
pub struct LinkedList {
    slots: Vec<Option<LinkNode>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl LinkedList {
    /// Empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// List holding `values` in order.
    #[must_use]
    pub fn from_values(values: &[Value]) -> Self {
        let mut list = Self::new();
        for (i, &v) in values.iter().enumerate() {
            let _ = list.insert(i, v);
        }
        list
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First slot.
    #[must_use]
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    /// Last slot.
    #[must_use]
    pub fn tail(&self) -> Option<usize> {
        self.tail
    }

    /// Element stored at `slot`.
    #[must_use]
    pub fn node(&self, slot: usize) -> Option<&LinkNode> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Slot of the element at list position `index`.
    #[must_use]
    pub fn slot_at(&self, index: usize) -> Option<usize> {
        self.slots_in_order().get(index).copied()
    }

    /// Slots in traversal order. Stops early on a corrupted chain.
    #[must_use]
    pub fn slots_in_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            if out.len() >= self.len {
                break;
            }
            out.push(slot);
            cursor = self.node(slot).and_then(|n| n.next);
        }
        out
    }

    /// Values in traversal order.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        self.slots_in_order()
            .into_iter()
            .filter_map(|s| self.node(s).map(|n| n.value))
            .collect()
    }

    /// Valid insert positions are `0..=len`.
    pub fn check_insert(&self, index: usize) -> Result<(), StructvizError> {
        if index > self.len {
            return Err(StructvizError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Valid remove positions are `0..len`.
    pub fn check_remove(&self, index: usize) -> Result<(), StructvizError> {
        if self.len == 0 {
            return Err(StructvizError::EmptyStructure);
        }
        if index >= self.len {
            return Err(StructvizError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Link a new element in at position `index`. Returns its slot.
    pub fn insert(
        &mut self,
        index: usize,
        value: Value,
    ) -> Result<usize, StructvizError> {
        self.check_insert(index)?;
        let next = self.slot_at(index);
        let prev = match next {
            Some(n) => self.node(n).and_then(|node| node.prev),
            None => self.tail,
        };
        let node = LinkNode { value, prev, next };
        let slot = match self.free.pop() {
            Some(slot) => {
                if let Some(entry) = self.slots.get_mut(slot) {
                    *entry = Some(node);
                }
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        match prev.and_then(|p| self.slots.get_mut(p)).and_then(Option::as_mut)
        {
            Some(p) => p.next = Some(slot),
            None => self.head = Some(slot),
        }
        match next.and_then(|n| self.slots.get_mut(n)).and_then(Option::as_mut)
        {
            Some(n) => n.prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.len += 1;
        Ok(slot)
    }

    /// Unlink and return the element at position `index`.
    pub fn remove(&mut self, index: usize) -> Result<Value, StructvizError> {
        self.check_remove(index)?;
        let slot = self.slot_at(index).ok_or(StructvizError::IndexOutOfRange {
            index,
            len: self.len,
        })?;
        let node = self
            .slots
            .get_mut(slot)
            .and_then(Option::take)
            .ok_or(StructvizError::EmptyStructure)?;
        match node.prev.and_then(|p| self.slots.get_mut(p)).and_then(Option::as_mut)
        {
            Some(p) => p.next = node.next,
            None => self.head = node.next,
        }
        match node.next.and_then(|n| self.slots.get_mut(n)).and_then(Option::as_mut)
        {
            Some(n) => n.prev = node.prev,
            None => self.tail = node.prev,
        }
        self.free.push(slot);
        self.len -= 1;
        Ok(node.value)
    }

    /// Drop every element.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
