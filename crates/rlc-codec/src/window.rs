//! # Coding Window
//!
//! Bounded FIFO of `(id, entry)` pairs with consecutive ids. The encoder
//! stores source payloads in it; the decoder only mirrors the ids.

use std::collections::VecDeque;

use crate::error::CodecError;
use crate::SymbolId;

/// Snapshot of a window's id range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowInfo {
    pub first: SymbolId,
    pub last: SymbolId,
    /// Number of symbols in the window (`last - first + 1`).
    pub len: usize,
}

#[derive(Debug, Clone)]
pub struct CodingWindow<T> {
    entries: VecDeque<(SymbolId, T)>,
    capacity: usize,
}

impl<T> CodingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "coding window capacity must be > 0");
        CodingWindow {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `(id, entry)`.
    ///
    /// `id` must follow the newest id unless the window is empty. Ids never
    /// wrap: nothing can follow `u32::MAX`. When the window is full the oldest
    /// entry is evicted and returned.
    pub fn push(&mut self, id: SymbolId, entry: T) -> Result<Option<(SymbolId, T)>, CodecError> {
        if let Some(last) = self.last_id() {
            let expected = last.checked_add(1).ok_or(CodecError::IdOverflow {
                first: last,
                count: 2,
            })?;
            if id != expected {
                return Err(CodecError::NonConsecutiveId { expected, got: id });
            }
        }
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back((id, entry));
        Ok(evicted)
    }

    /// Drop every entry with an id `<= id`. Returns how many were dropped.
    pub fn remove_through(&mut self, id: SymbolId) -> usize {
        let mut removed = 0;
        while self.entries.front().is_some_and(|(first, _)| *first <= id) {
            self.entries.pop_front();
            removed += 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn first_id(&self) -> Option<SymbolId> {
        self.entries.front().map(|(id, _)| *id)
    }

    pub fn last_id(&self) -> Option<SymbolId> {
        self.entries.back().map(|(id, _)| *id)
    }

    pub fn info(&self) -> Option<WindowInfo> {
        Some(WindowInfo {
            first: self.first_id()?,
            last: self.last_id()?,
            len: self.entries.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        match (self.first_id(), self.last_id()) {
            (Some(first), Some(last)) => (first..=last).contains(&id),
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &T)> + '_ {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }
}

impl<T: Default> CodingWindow<T> {
    /// Slide forward so that `id` is the newest entry, filling the ids in
    /// between with default entries. Ids at or behind the newest are ignored.
    /// Returns the evicted ids, oldest first.
    pub fn advance_to(&mut self, id: SymbolId) -> Vec<SymbolId> {
        let start = match self.last_id() {
            Some(last) if id <= last => return Vec::new(),
            Some(last) => last + 1,
            None => id,
        };
        // Only the newest `capacity` ids can survive the jump.
        let keep_from = id.saturating_sub(self.capacity as SymbolId - 1).max(start);
        let mut evicted = Vec::new();
        if keep_from > start {
            evicted.extend(self.entries.drain(..).map(|(old, _)| old));
        }
        for next in keep_from..=id {
            if self.entries.len() == self.capacity {
                if let Some((old, _)) = self.entries.pop_front() {
                    evicted.push(old);
                }
            }
            self.entries.push_back((next, T::default()));
        }
        evicted
    }
}
