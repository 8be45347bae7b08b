//! Compact membership sets over the classes of one label volume

use bitvec::prelude::*;

/// Fixed-size bitset of label classes present in a window
///
/// Members are slots in `0..slot_count`; callers map class values onto slots.
/// Provides O(1) membership testing and counting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelSet {
    bits: BitVec,
}

impl LabelSet {
    /// Create a set able to hold slots `0..slot_count`
    pub fn new(slot_count: usize) -> Self {
        Self {
            bits: bitvec![0; slot_count],
        }
    }

    /// Insert a slot, ignoring slots beyond capacity
    pub fn insert(&mut self, slot: usize) {
        if slot < self.bits.len() {
            self.bits.set(slot, true);
        }
    }

    /// Test slot membership
    pub fn contains(&self, slot: usize) -> bool {
        self.bits.get(slot).as_deref() == Some(&true)
    }

    /// Whether every slot in `slots` is present
    pub fn contains_all(&self, slots: &[usize]) -> bool {
        slots.iter().all(|&slot| self.contains(slot))
    }

    /// Count distinct slots present
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }
}
