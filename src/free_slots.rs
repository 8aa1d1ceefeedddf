//! Free-slot registry: best-fit reuse of freed byte ranges in the heap file.
//!
//! The owning storage engine appends values to an append-mostly heap file.
//! When a value is deleted or shrinks, the freed `(size, offset)` range is
//! registered here; later writes ask [`FreeSlots::get`] for the smallest
//! registered slot that fits before appending at the end of the file.
//!
//! After every external [`FreeSlots::add`] the registry re-coalesces, so no
//! two registered slots are ever byte-adjacent; long-run fragmentation stays
//! bounded. The remainder slot that `get` splits off skips that pass — by
//! construction it cannot touch any other surviving slot.
//!
//! Purely in-memory: the registry is rebuilt by the owner on open and holds
//! no file handles.

use std::collections::BTreeMap;
use std::fmt;

use smallvec::SmallVec;

use crate::error::{LayoutError, Result};

/// Offsets sharing one slot size. Most sizes see one or two frees before
/// the ranges coalesce away, so the stack stays inline.
type Bucket = SmallVec<[u64; 2]>;

/// Size-bucketed registry of freed byte ranges.
#[derive(Debug, Default)]
pub struct FreeSlots {
    /// Slot size -> stack of file offsets holding a free range of that size.
    free: BTreeMap<u32, Bucket>,
    /// Total registered slots across all buckets.
    slots: usize,
}

impl FreeSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered slots.
    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots == 0
    }

    /// Register a freed range and re-coalesce the registry.
    pub fn add(&mut self, size: u32, offset: u64) {
        self.insert(size, offset);
        self.optimize();
    }

    /// Claim space for `size` bytes.
    ///
    /// Returns the offset of the smallest registered slot that fits,
    /// splitting off the unused remainder as a fresh slot, or `fallback`
    /// (the end-of-file offset supplied by the caller) when nothing fits.
    ///
    /// # Errors
    ///
    /// [`LayoutError::Corruption`] when the registry's bookkeeping
    /// contradicts itself — a popped slot smaller than requested or a slot
    /// reaching past `fallback`. Both mean the allocator state is corrupt;
    /// the owner must stop writing rather than retry.
    pub fn get(&mut self, size: u32, fallback: u64) -> Result<u64> {
        let (slot_size, slot_off, drained) = match self.free.range_mut(size..).next() {
            None => return Ok(fallback),
            Some((&slot_size, bucket)) => {
                let Some(slot_off) = bucket.pop() else {
                    return Err(LayoutError::Corruption(format!(
                        "empty bucket registered for size {slot_size}"
                    )));
                };
                (slot_size, slot_off, bucket.is_empty())
            }
        };
        if drained {
            self.free.remove(&slot_size);
        }
        self.slots -= 1;

        if slot_size < size {
            return Err(LayoutError::Corruption(format!(
                "picked slot of {slot_size} bytes for a {size}-byte request"
            )));
        }
        if slot_size > size {
            // remainder cannot be adjacent to another slot: the registry was
            // coalesced and the consumed slot's neighbors are still in use
            self.insert(slot_size - size, slot_off + size as u64);
        }
        let end = slot_off + size as u64;
        if end > fallback {
            return Err(LayoutError::Corruption(format!(
                "slot {slot_off}+{size} reaches past the allocation frontier {fallback}"
            )));
        }
        Ok(slot_off)
    }

    /// Coalesce byte-adjacent slots and rebuild the size buckets.
    pub fn optimize(&mut self) {
        if self.slots < 2 {
            return;
        }
        let before = self.slots;

        let mut ranges: Vec<(u64, u32)> = Vec::with_capacity(self.slots);
        for (&size, bucket) in &self.free {
            for &off in bucket {
                ranges.push((off, size));
            }
        }
        ranges.sort_unstable_by_key(|&(off, _)| off);

        self.free.clear();
        self.slots = 0;
        let mut pending: Option<(u64, u32)> = None;
        for (off, size) in ranges {
            match pending {
                Some((p_off, p_size)) if p_off + p_size as u64 == off => {
                    pending = Some((p_off, p_size + size));
                }
                Some((p_off, p_size)) => {
                    self.insert(p_size, p_off);
                    pending = Some((off, size));
                }
                None => pending = Some((off, size)),
            }
        }
        if let Some((p_off, p_size)) = pending {
            self.insert(p_size, p_off);
        }

        tracing::trace!(before, after = self.slots, "coalesced free slots");
    }

    fn insert(&mut self, size: u32, offset: u64) {
        if size == 0 {
            return;
        }
        self.free.entry(size).or_default().push(offset);
        self.slots += 1;
    }
}

impl fmt::Display for FreeSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FreeSlots[{}]", self.slots)?;
        for (size, bucket) in &self.free {
            write!(f, " {size}:")?;
            for (i, off) in bucket.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{off}")?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
