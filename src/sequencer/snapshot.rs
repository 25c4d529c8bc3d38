// Snapshot types - Immutable clip data crossing the control/real-time boundary
// The control thread flattens the clips affected by an edit into snapshots
// and sends them over the command queue; the scheduler only ever reads them.

use crate::arrangement::clip::{Clip, ClipId};
use crate::arrangement::unit::Pulses;
use std::sync::Arc;

/// A MIDI note inside a pattern, positioned in ticks relative to the
/// pattern start. Serializes as `[tick, pitch, duration, velocity]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "NoteTuple", into = "NoteTuple")]
pub struct Note {
    pub tick: i64,
    pub pitch: u8,
    pub duration: i64,
    pub velocity: u8,
}

type NoteTuple = (i64, u8, i64, u8);

impl Note {
    pub fn new(tick: i64, pitch: u8, duration: i64, velocity: u8) -> Self {
        assert!(pitch <= 127, "MIDI pitch must be 0-127");
        assert!(velocity <= 127, "MIDI velocity must be 0-127");
        assert!(duration > 0, "Note duration must be > 0");

        Self {
            tick,
            pitch,
            duration,
            velocity,
        }
    }
}

impl From<NoteTuple> for Note {
    fn from((tick, pitch, duration, velocity): NoteTuple) -> Self {
        Self {
            tick,
            pitch,
            duration,
            velocity,
        }
    }
}

impl From<Note> for NoteTuple {
    fn from(n: Note) -> Self {
        (n.tick, n.pitch, n.duration, n.velocity)
    }
}

/// The underlying MIDI media a clip windows into.
///
/// Notes are kept sorted by tick. Split clip halves share one pattern
/// through an `Arc`, so the pattern is the "same underlying media" of both.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pattern {
    notes: Vec<Note>,
}

impl Pattern {
    pub fn new() -> Self {
        Self { notes: Vec::new() }
    }

    /// All notes, sorted by tick
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Insert a note at its sorted position
    pub fn add_note(&mut self, note: Note) {
        let index = self
            .notes
            .binary_search_by(|n| n.tick.cmp(&note.tick))
            .unwrap_or_else(|i| i);
        self.notes.insert(index, note);
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// A MIDI clip: a pulse-domain interval windowing into a shared pattern
pub type MidiClip = Clip<Pulses, Arc<Pattern>>;

/// Immutable, cross-thread flattening of a MIDI clip for scheduling.
///
/// Created whenever the control thread commits an edit affecting playback;
/// superseded (never mutated) by the next snapshot. Note ticks are rebased
/// so that `start_offset + note.tick` is the note's absolute timeline tick:
/// the clip's buffer offset is already folded in and trimmed-out notes are
/// dropped.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClipSnapshot {
    pub id: ClipId,
    pub notes: Vec<Note>,
    pub start_offset: i64,
    pub end_offset: i64,
    pub muted: bool,
}

impl ClipSnapshot {
    /// Flatten a clip into its scheduling shape
    pub fn from_clip(clip: &MidiClip) -> Self {
        let start = clip.timeline_start.0;
        let length = clip.length.0;
        let offset = clip.buffer_offset.0;

        let notes = clip
            .payload
            .notes()
            .iter()
            .filter(|n| n.tick >= offset && n.tick - offset < length)
            .map(|n| Note {
                tick: n.tick - offset,
                ..*n
            })
            .collect();

        Self {
            id: clip.id,
            notes,
            start_offset: start,
            end_offset: start + length,
            muted: false,
        }
    }

    /// Check if an absolute tick falls inside this clip's window
    pub fn contains(&self, tick: i64) -> bool {
        tick >= self.start_offset && tick <= self.end_offset
    }

    /// Window length in ticks
    pub fn length(&self) -> i64 {
        self.end_offset - self.start_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_keeps_notes_sorted() {
        let mut pattern = Pattern::new();
        pattern.add_note(Note::new(48, 64, 12, 100));
        pattern.add_note(Note::new(0, 60, 24, 100));
        pattern.add_note(Note::new(24, 62, 12, 100));

        let ticks: Vec<i64> = pattern.notes().iter().map(|n| n.tick).collect();
        assert_eq!(ticks, vec![0, 24, 48]);
    }

    #[test]
    fn test_note_serializes_as_tuple() {
        let note = Note::new(10, 60, 20, 100);
        let json = serde_json::to_string(&note).unwrap();

        assert_eq!(json, "[10,60,20,100]");

        let back: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(back, note);
    }

    #[test]
    fn test_snapshot_flattening() {
        let mut pattern = Pattern::new();
        pattern.add_note(Note::new(0, 60, 24, 100));
        pattern.add_note(Note::new(24, 62, 24, 100));

        let clip = Clip::new(Pulses(96), Pulses(48), Pulses(0), None, Arc::new(pattern));
        let snapshot = ClipSnapshot::from_clip(&clip);

        assert_eq!(snapshot.start_offset, 96);
        assert_eq!(snapshot.end_offset, 144);
        assert_eq!(snapshot.notes.len(), 2);
        assert!(snapshot.contains(96));
        assert!(snapshot.contains(144));
        assert!(!snapshot.contains(145));
    }

    #[test]
    fn test_snapshot_rebases_trimmed_clip() {
        let mut pattern = Pattern::new();
        pattern.add_note(Note::new(0, 60, 12, 100));
        pattern.add_note(Note::new(24, 62, 12, 100));

        // Trimmed: the first beat of the pattern is cut away
        let clip = Clip::new(Pulses(0), Pulses(24), Pulses(24), None, Arc::new(pattern));
        let snapshot = ClipSnapshot::from_clip(&clip);

        // The note at pattern tick 0 is no longer audible
        assert_eq!(snapshot.notes.len(), 1);
        assert_eq!(snapshot.notes[0].tick, 0);
        assert_eq!(snapshot.notes[0].pitch, 62);
    }
}
