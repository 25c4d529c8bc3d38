// Note capture recorder - Builds completed notes from live input
// Runs in the real-time context; one voice slot per MIDI pitch, no
// allocation on the event path beyond the captured-note buffer.

use crate::midi::event::MidiEvent;
use crate::sequencer::snapshot::Note;

/// An open voice: note-on seen, waiting for its note-off
#[derive(Debug, Clone, Copy)]
struct OpenVoice {
    on_tick: i64,
    on_velocity: u8,
}

/// Captures live note on/off events against the transport clock and turns
/// them into completed [`Note`]s.
///
/// The caller provides the current absolute tick with each event; ticks
/// are folded into the clip window when a clip length is given, so notes
/// recorded on a later loop pass land inside the clip.
pub struct NoteCaptureRecorder {
    voices: [Option<OpenVoice>; 128],
    captured: Vec<Note>,
    /// Only capture events on this channel; `None` captures all
    channel_filter: Option<u8>,
}

impl Default for NoteCaptureRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteCaptureRecorder {
    pub fn new() -> Self {
        Self {
            voices: [None; 128],
            captured: Vec::new(),
            channel_filter: None,
        }
    }

    pub fn set_channel_filter(&mut self, channel: Option<u8>) {
        self.channel_filter = channel;
    }

    /// Process one raw note event.
    ///
    /// `current_tick` is the absolute transport tick at the moment the
    /// event arrived; `clip_length` (ticks) folds it into the clip window.
    pub fn process_event(
        &mut self,
        event: MidiEvent,
        current_tick: i64,
        clip_length: Option<i64>,
    ) {
        if let Some(channel) = self.channel_filter {
            if event.channel() != channel {
                return;
            }
        }
        // Out-of-range data never reaches the voice table
        if event.note() > 127 {
            return;
        }
        if let MidiEvent::NoteOn { velocity, .. } = event {
            if velocity > 127 {
                return;
            }
        }

        let tick = match clip_length {
            Some(length) if length > 0 => current_tick.rem_euclid(length),
            _ => current_tick,
        };

        match event {
            MidiEvent::NoteOn {
                note, velocity, ..
            } => {
                // A retrigger finalizes the previous voice first
                self.finalize_voice(note, tick);
                self.voices[note as usize] = Some(OpenVoice {
                    on_tick: tick,
                    on_velocity: velocity,
                });
            }
            MidiEvent::NoteOff { note, .. } => {
                // A note-off with no open voice is dropped silently
                // (normal when recording starts mid-note)
                self.finalize_voice(note, tick);
            }
        }
    }

    /// Close every open voice against the given tick.
    ///
    /// Called when recording is disarmed and when the cursor wraps past the
    /// loop/clip end, so no voice stays open across a boundary.
    pub fn finalize_all_notes(&mut self, tick: i64) {
        for pitch in 0..self.voices.len() {
            self.finalize_voice(pitch as u8, tick);
        }
    }

    /// Take all completed notes accumulated so far
    pub fn take_captured(&mut self) -> Vec<Note> {
        std::mem::take(&mut self.captured)
    }

    /// Check if any voice is currently open
    pub fn has_open_voices(&self) -> bool {
        self.voices.iter().any(|v| v.is_some())
    }

    fn finalize_voice(&mut self, pitch: u8, tick: i64) {
        if let Some(voice) = self.voices[pitch as usize].take() {
            if tick > voice.on_tick {
                self.captured.push(Note::new(
                    voice.on_tick,
                    pitch,
                    tick - voice.on_tick,
                    voice.on_velocity,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on(channel: u8, note: u8, velocity: u8) -> MidiEvent {
        MidiEvent::NoteOn {
            channel,
            note,
            velocity,
        }
    }

    fn off(channel: u8, note: u8) -> MidiEvent {
        MidiEvent::NoteOff { channel, note }
    }

    #[test]
    fn test_round_trip() {
        let mut recorder = NoteCaptureRecorder::new();

        recorder.process_event(on(0, 60, 100), 10, None);
        recorder.process_event(off(0, 60), 30, None);

        let notes = recorder.take_captured();
        assert_eq!(notes, vec![Note::new(10, 60, 20, 100)]);
        assert!(!recorder.has_open_voices());
    }

    #[test]
    fn test_channel_filter() {
        let mut recorder = NoteCaptureRecorder::new();
        recorder.set_channel_filter(Some(2));

        // Wrong channel: both events suppressed
        recorder.process_event(on(1, 60, 100), 10, None);
        recorder.process_event(off(1, 60), 30, None);
        assert!(recorder.take_captured().is_empty());

        // Matching channel captures
        recorder.process_event(on(2, 60, 100), 40, None);
        recorder.process_event(off(2, 60), 50, None);
        assert_eq!(recorder.take_captured().len(), 1);
    }

    #[test]
    fn test_unmatched_note_off_dropped() {
        let mut recorder = NoteCaptureRecorder::new();

        recorder.process_event(off(0, 60), 30, None);

        assert!(recorder.take_captured().is_empty());
    }

    #[test]
    fn test_retrigger_finalizes_previous() {
        let mut recorder = NoteCaptureRecorder::new();

        recorder.process_event(on(0, 60, 100), 10, None);
        recorder.process_event(on(0, 60, 90), 25, None);
        recorder.process_event(off(0, 60), 40, None);

        let notes = recorder.take_captured();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0], Note::new(10, 60, 15, 100));
        assert_eq!(notes[1], Note::new(25, 60, 15, 90));
    }

    #[test]
    fn test_finalize_all_notes() {
        let mut recorder = NoteCaptureRecorder::new();

        recorder.process_event(on(0, 60, 100), 10, None);
        recorder.process_event(on(0, 64, 80), 20, None);
        recorder.finalize_all_notes(50);

        let notes = recorder.take_captured();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0], Note::new(10, 60, 40, 100));
        assert_eq!(notes[1], Note::new(20, 64, 30, 80));
        assert!(!recorder.has_open_voices());
    }

    #[test]
    fn test_tick_folded_into_clip_window() {
        let mut recorder = NoteCaptureRecorder::new();

        // Clip is 96 ticks long; events arrive on the second loop pass
        recorder.process_event(on(0, 60, 100), 100, Some(96));
        recorder.process_event(off(0, 60), 120, Some(96));

        let notes = recorder.take_captured();
        assert_eq!(notes, vec![Note::new(4, 60, 20, 100)]);
    }

    #[test]
    fn test_out_of_range_data_dropped() {
        let mut recorder = NoteCaptureRecorder::new();

        // Pitch past the voice table must not be indexed
        recorder.process_event(on(0, 200, 100), 10, None);
        recorder.process_event(off(0, 200), 30, None);
        // Velocity past 127 must not reach Note construction
        recorder.process_event(on(0, 60, 200), 10, None);
        recorder.process_event(off(0, 60), 30, None);

        assert!(recorder.take_captured().is_empty());
        assert!(!recorder.has_open_voices());
    }

    #[test]
    fn test_zero_length_capture_discarded() {
        let mut recorder = NoteCaptureRecorder::new();

        recorder.process_event(on(0, 60, 100), 10, None);
        // Off at the same tick: nothing audible, voice still cleared
        recorder.process_event(off(0, 60), 10, None);

        assert!(recorder.take_captured().is_empty());
        assert!(!recorder.has_open_voices());
    }
}
