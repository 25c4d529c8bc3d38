// ClipStore - Ordered, non-overlapping collection of clips on one track
// All edit operations preserve the invariant: clips sorted by timeline
// start, adjacent clips never overlapping (touching is allowed).

use crate::arrangement::clip::{Clip, ClipId};
use crate::arrangement::unit::ClipUnit;
use thiserror::Error;

/// Errors for misuse of edit operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// `delete_time` called with `start > end`
    #[error("deletion range is inverted (start is after end)")]
    InvertedRange,
}

/// The clip collection of a single track.
///
/// The track exclusively owns its clips; a clip is never shared across
/// stores. Every mutating operation re-validates the ordering invariant
/// before returning, so a violation is caught at the operation that
/// introduced it.
#[derive(Debug, Clone)]
pub struct ClipStore<U: ClipUnit, P: Clone> {
    clips: Vec<Clip<U, P>>,
}

impl<U: ClipUnit, P: Clone> Default for ClipStore<U, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: ClipUnit, P: Clone> ClipStore<U, P> {
    /// Create an empty store
    pub fn new() -> Self {
        Self { clips: Vec::new() }
    }

    /// All clips, sorted by timeline start
    pub fn clips(&self) -> &[Clip<U, P>] {
        &self.clips
    }

    /// Number of clips
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Get a clip by id
    pub fn get(&self, id: ClipId) -> Option<&Clip<U, P>> {
        self.clips.iter().find(|c| c.id == id)
    }

    /// Get a mutable clip by id.
    ///
    /// Retiming a clip through this leaves it mis-sorted until
    /// [`ClipStore::move_clip`] re-homes it; run `move_clip` before any
    /// other operation.
    pub fn get_mut(&mut self, id: ClipId) -> Option<&mut Clip<U, P>> {
        self.clips.iter_mut().find(|c| c.id == id)
    }

    /// Find the clip covering a timeline position
    pub fn clip_at(&self, time: U) -> Option<&Clip<U, P>> {
        self.clips.iter().find(|c| c.contains(time))
    }

    /// Find all clips overlapping a timeline range `[start, end)`
    pub fn clips_in_range(&self, start: U, end: U) -> Vec<&Clip<U, P>> {
        self.clips.iter().filter(|c| c.overlaps(start, end)).collect()
    }

    /// Remove all clips
    pub fn clear(&mut self) {
        self.clips.clear();
    }

    /// Insert a clip, clearing its destination range first.
    ///
    /// Existing material under `[clip.timeline_start, clip.timeline_end)`
    /// is trimmed, split or removed as by [`ClipStore::delete_time`]; the
    /// new clip then lands at its sorted position.
    pub fn add_clip(&mut self, clip: Clip<U, P>) {
        // Clip construction guarantees start < end, so the range is valid.
        self.delete_range(clip.timeline_start, clip.timeline_end());
        self.insert_sorted(clip);
        self.assert_invariant();
    }

    /// Clear a timeline range `[start, end)` of all clip material.
    ///
    /// Clips fully inside the range are removed; clips overlapping one edge
    /// are trimmed (a front trim advances the buffer offset by the same
    /// amount, so the remaining material keeps its content); a clip that
    /// fully covers the range is split in two around it.
    pub fn delete_time(&mut self, start: U, end: U) -> Result<(), EditError> {
        if start > end {
            return Err(EditError::InvertedRange);
        }
        if start == end {
            return Ok(());
        }

        self.delete_range(start, end);
        self.assert_invariant();
        Ok(())
    }

    /// Split the clip with the given id at a timeline position.
    ///
    /// Returns the ids of the two resulting clips, or `None` if the
    /// position misses the clip or lands exactly on one of its edges
    /// (a zero-length piece is never created).
    pub fn split_clip(&mut self, id: ClipId, at: U) -> Option<(ClipId, ClipId)> {
        let index = self.clips.iter().position(|c| c.id == id)?;
        let (left, right) = self.clips[index].split_at(at)?;

        let ids = (left.id, right.id);
        self.clips[index] = left;
        self.clips.insert(index + 1, right);
        self.assert_invariant();
        Some(ids)
    }

    /// Remove a clip by id; no-op if not present
    pub fn remove_clip(&mut self, id: ClipId) -> Option<Clip<U, P>> {
        let index = self.clips.iter().position(|c| c.id == id)?;
        let removed = self.clips.remove(index);
        self.assert_invariant();
        Some(removed)
    }

    /// Append a clip after the last one.
    ///
    /// The clip's timeline start is rewritten to the end of the last clip
    /// (or zero if the store is empty), so no overlap can occur and no
    /// material is deleted.
    pub fn push_clip(&mut self, mut clip: Clip<U, P>) -> ClipId {
        clip.timeline_start = self
            .clips
            .last()
            .map(|c| c.timeline_end())
            .unwrap_or_else(U::zero);

        let id = clip.id;
        self.clips.push(clip);
        self.assert_invariant();
        id
    }

    /// Re-home a clip to the sorted position implied by its current
    /// timeline start, leaving every other clip untouched.
    ///
    /// The caller is responsible for clearing the destination range first;
    /// moving a clip onto other material is a programmer error and trips
    /// the invariant check.
    pub fn move_clip(&mut self, id: ClipId) {
        if let Some(index) = self.clips.iter().position(|c| c.id == id) {
            let clip = self.clips.remove(index);
            self.insert_sorted(clip);
            self.assert_invariant();
        }
    }

    /// Clear `[start, end)` without range validation (callers guarantee
    /// `start < end`).
    fn delete_range(&mut self, start: U, end: U) {
        let mut result: Vec<Clip<U, P>> = Vec::with_capacity(self.clips.len() + 1);

        for clip in self.clips.drain(..) {
            let clip_start = clip.timeline_start;
            let clip_end = clip.timeline_end();

            if clip_end <= start || clip_start >= end {
                // Outside the deletion range (touching is fine)
                result.push(clip);
            } else if start <= clip_start && end >= clip_end {
                // Fully contained in the deletion range: drop it
            } else if start <= clip_start {
                // Range covers the clip's head: trim forward to `end`
                let delta = end - clip_start;
                let mut trimmed = clip;
                trimmed.timeline_start = end;
                trimmed.length = trimmed.length - delta;
                trimmed.buffer_offset = trimmed.buffer_offset + delta;
                if trimmed.length > U::zero() {
                    result.push(trimmed);
                }
            } else if end >= clip_end {
                // Range covers the clip's tail: trim back to `start`
                let mut trimmed = clip;
                trimmed.length = start - clip_start;
                if trimmed.length > U::zero() {
                    result.push(trimmed);
                }
            } else {
                // Range strictly inside the clip: split and discard the middle
                let (left, rest) = match clip.split_at(start) {
                    Some(parts) => parts,
                    // start == clip_start is excluded above
                    None => unreachable!("split point checked against clip bounds"),
                };
                result.push(left);

                if let Some((_middle, right)) = rest.split_at(end) {
                    result.push(right);
                }
            }
        }

        self.clips = result;
    }

    /// Insert before the first clip whose start is not less than the new
    /// clip's start. Linear scan: clip lists per track are small.
    fn insert_sorted(&mut self, clip: Clip<U, P>) {
        let index = self
            .clips
            .iter()
            .position(|c| c.timeline_start >= clip.timeline_start)
            .unwrap_or(self.clips.len());
        self.clips.insert(index, clip);
    }

    /// Ordering invariant check, run after every mutation. A failure here
    /// is a bug in edit-operation composition, never tolerated silently.
    fn assert_invariant(&self) {
        for pair in self.clips.windows(2) {
            assert!(
                pair[0].timeline_start <= pair[1].timeline_start,
                "Clip collection out of order"
            );
            assert!(
                pair[0].timeline_end() <= pair[1].timeline_start,
                "Adjacent clips overlap"
            );
        }
        for clip in &self.clips {
            assert!(clip.length > U::zero(), "Zero-length clip in collection");
        }
    }
}
