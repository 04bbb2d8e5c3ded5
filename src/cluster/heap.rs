//! Updatable min-heap keyed by reachability distance.
//!
//! A binary heap plus a side table mapping each object to its slot, so that an
//! object already in the heap can have its key lowered in O(log n) instead of
//! being pushed a second time.

use super::neighbors::ObjectId;
use crate::error::{Error, Result};

/// An object waiting in the heap with its best known reachability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// The waiting object.
    pub id: ObjectId,
    /// The object through which `reachability` was achieved.
    pub predecessor: Option<ObjectId>,
    /// Best reachability distance seen so far.
    pub reachability: f64,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    candidate: Candidate,
    // First-insertion sequence number; breaks ties between equal keys.
    seq: u64,
}

impl Slot {
    #[inline]
    fn less(&self, other: &Slot) -> bool {
        self.candidate
            .reachability
            .total_cmp(&other.candidate.reachability)
            .then(self.seq.cmp(&other.seq))
            .is_lt()
    }
}

/// Min-priority queue over objects with decrease-key.
#[derive(Debug, Clone, Default)]
pub struct ReachabilityHeap {
    slots: Vec<Slot>,
    // object index -> slot index
    position: Vec<Option<usize>>,
    next_seq: u64,
}

impl ReachabilityHeap {
    /// Heap able to hold the objects `0..len`.
    pub fn new(len: usize) -> Self {
        Self {
            slots: Vec::new(),
            position: vec![None; len],
            next_seq: 0,
        }
    }

    /// Number of waiting objects.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no object is waiting.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether `id` is waiting.
    pub fn contains(&self, id: ObjectId) -> bool {
        matches!(self.position.get(id.index()), Some(Some(_)))
    }

    /// Current key of `id`, if waiting.
    pub fn reachability(&self, id: ObjectId) -> Option<f64> {
        let pos = (*self.position.get(id.index())?)?;
        Some(self.slots[pos].candidate.reachability)
    }

    /// The candidate that would be popped next.
    pub fn peek(&self) -> Option<&Candidate> {
        self.slots.first().map(|s| &s.candidate)
    }

    /// Insert `id`, or lower its key if `reachability` improves on the stored
    /// value. Equal or worse values are ignored.
    ///
    /// Returns whether the heap changed.
    pub fn insert_or_improve(
        &mut self,
        id: ObjectId,
        predecessor: Option<ObjectId>,
        reachability: f64,
    ) -> Result<bool> {
        let len = self.position.len();
        let entry = self
            .position
            .get_mut(id.index())
            .ok_or(Error::UnknownObject { id, len })?;

        match *entry {
            Some(pos) => {
                let slot = &mut self.slots[pos];
                if slot.candidate.reachability <= reachability {
                    return Ok(false);
                }
                slot.candidate.reachability = reachability;
                slot.candidate.predecessor = predecessor;
                self.sift_up(pos);
            }
            None => {
                let pos = self.slots.len();
                *entry = Some(pos);
                self.slots.push(Slot {
                    candidate: Candidate {
                        id,
                        predecessor,
                        reachability,
                    },
                    seq: self.next_seq,
                });
                self.next_seq += 1;
                self.sift_up(pos);
            }
        }
        Ok(true)
    }

    /// Remove and return the candidate with the smallest reachability.
    pub fn pop_minimum(&mut self) -> Option<Candidate> {
        if self.slots.is_empty() {
            return None;
        }
        let last = self.slots.len() - 1;
        self.swap(0, last);
        let slot = self.slots.pop()?;
        self.position[slot.candidate.id.index()] = None;
        if !self.slots.is_empty() {
            self.sift_down(0);
        }
        Some(slot.candidate)
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
        self.position[self.slots[a].candidate.id.index()] = Some(a);
        self.position[self.slots[b].candidate.id.index()] = Some(b);
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.slots[pos].less(&self.slots[parent]) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let n = self.slots.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut best = pos;
            if left < n && self.slots[left].less(&self.slots[best]) {
                best = left;
            }
            if right < n && self.slots[right].less(&self.slots[best]) {
                best = right;
            }
            if best == pos {
                break;
            }
            self.swap(pos, best);
            pos = best;
        }
    }
}
