// Clip - An interval of media placed on a track timeline
// A clip is a trimmed window into an underlying buffer (audio media or a
// MIDI pattern); the payload is the reference to that buffer.

use crate::arrangement::unit::ClipUnit;
use uuid::Uuid;

/// Unique identifier for clips
pub type ClipId = Uuid;

/// A clip placed on the timeline
///
/// `timeline_start`/`length` describe where the clip sits on the track;
/// `buffer_offset`/`buffer_length` describe which window of the underlying
/// media is heard. Trimming a clip moves the window without touching the
/// media itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip<U: ClipUnit, P: Clone> {
    /// Unique identifier for this clip
    pub id: ClipId,

    /// Position on the track timeline
    pub timeline_start: U,

    /// Duration on the timeline (may be shorter than the buffer if trimmed)
    pub length: U,

    /// Offset into the underlying buffer where playback begins
    pub buffer_offset: U,

    /// Total untrimmed buffer length; `None` for open-ended MIDI patterns
    pub buffer_length: Option<U>,

    /// Reference to the underlying media (shared between split halves)
    pub payload: P,
}

impl<U: ClipUnit, P: Clone> Clip<U, P> {
    /// Creates a new clip with a fresh id
    pub fn new(
        timeline_start: U,
        length: U,
        buffer_offset: U,
        buffer_length: Option<U>,
        payload: P,
    ) -> Self {
        assert!(length > U::zero(), "Clip length must be > 0");
        assert!(
            buffer_offset >= U::zero(),
            "Clip buffer offset must be >= 0"
        );
        if let Some(buffer_length) = buffer_length {
            assert!(
                buffer_offset + length <= buffer_length,
                "Clip window must fit inside its buffer"
            );
        }

        Self {
            id: Uuid::new_v4(),
            timeline_start,
            length,
            buffer_offset,
            buffer_length,
            payload,
        }
    }

    /// End position on the timeline (exclusive)
    pub fn timeline_end(&self) -> U {
        self.timeline_start + self.length
    }

    /// Start of the audible window inside the buffer
    pub fn trim_start(&self) -> U {
        self.buffer_offset
    }

    /// End of the audible window inside the buffer
    pub fn trim_end(&self) -> U {
        self.buffer_offset + self.length
    }

    /// Check if a timeline position falls inside this clip
    pub fn contains(&self, time: U) -> bool {
        time >= self.timeline_start && time < self.timeline_end()
    }

    /// Check if this clip overlaps a timeline range `[start, end)`
    pub fn overlaps(&self, start: U, end: U) -> bool {
        self.timeline_start < end && self.timeline_end() > start
    }

    /// Split this clip in two at a timeline position strictly inside it.
    ///
    /// The left half is this clip truncated to end at `at`; the right half
    /// is a clone (fresh id, same payload) whose buffer offset advances by
    /// the left half's length. Returns `None` if `at` is not strictly
    /// inside the clip.
    pub fn split_at(&self, at: U) -> Option<(Clip<U, P>, Clip<U, P>)> {
        if at <= self.timeline_start || at >= self.timeline_end() {
            return None;
        }

        let left_length = at - self.timeline_start;

        let mut left = self.clone();
        left.length = left_length;

        let mut right = self.clone();
        right.id = Uuid::new_v4();
        right.timeline_start = at;
        right.length = self.length - left_length;
        right.buffer_offset = self.buffer_offset + left_length;

        Some((left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrangement::unit::{Pulses, Seconds};

    #[test]
    fn test_clip_creation() {
        let clip = Clip::new(Pulses(10), Pulses(20), Pulses(0), None, ());

        assert_eq!(clip.timeline_start, Pulses(10));
        assert_eq!(clip.timeline_end(), Pulses(30));
        assert_eq!(clip.trim_start(), Pulses(0));
        assert_eq!(clip.trim_end(), Pulses(20));
    }

    #[test]
    fn test_clip_contains() {
        let clip = Clip::new(Seconds(1.0), Seconds(2.0), Seconds(0.0), None, ());

        assert!(clip.contains(Seconds(1.0)));
        assert!(clip.contains(Seconds(2.5)));
        assert!(!clip.contains(Seconds(3.0)));
        assert!(!clip.contains(Seconds(0.5)));
    }

    #[test]
    fn test_clip_overlaps() {
        let clip = Clip::new(Pulses(10), Pulses(10), Pulses(0), None, ());

        assert!(clip.overlaps(Pulses(15), Pulses(25)));
        assert!(clip.overlaps(Pulses(0), Pulses(11)));
        // Touching is not overlapping
        assert!(!clip.overlaps(Pulses(20), Pulses(30)));
        assert!(!clip.overlaps(Pulses(0), Pulses(10)));
    }

    #[test]
    fn test_split_at() {
        let clip = Clip::new(Pulses(2), Pulses(6), Pulses(0), Some(Pulses(6)), ());

        let (left, right) = clip.split_at(Pulses(4)).unwrap();

        assert_eq!(left.timeline_start, Pulses(2));
        assert_eq!(left.timeline_end(), Pulses(4));
        assert_eq!(left.buffer_offset, Pulses(0));
        assert_eq!(left.id, clip.id);

        assert_eq!(right.timeline_start, Pulses(4));
        assert_eq!(right.timeline_end(), Pulses(8));
        assert_eq!(right.buffer_offset, Pulses(2));
        assert_ne!(right.id, clip.id);
    }

    #[test]
    fn test_split_at_boundary_is_none() {
        let clip = Clip::new(Pulses(2), Pulses(6), Pulses(0), None, ());

        assert!(clip.split_at(Pulses(2)).is_none());
        assert!(clip.split_at(Pulses(8)).is_none());
        assert!(clip.split_at(Pulses(100)).is_none());
    }

    #[test]
    #[should_panic(expected = "Clip length must be > 0")]
    fn test_zero_length_clip() {
        Clip::new(Pulses(0), Pulses(0), Pulses(0), None, ());
    }

    #[test]
    #[should_panic(expected = "Clip window must fit inside its buffer")]
    fn test_window_past_buffer_end() {
        Clip::new(Pulses(0), Pulses(10), Pulses(5), Some(Pulses(12)), ());
    }
}
