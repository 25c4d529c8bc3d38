// MIDI note events
// The channel nibble is kept: the capture recorder filters on it

/// A note event as consumed and produced by the sequencing core
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MidiEvent {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
}

impl MidiEvent {
    /// Parse a raw MIDI message
    ///
    /// Note-on with velocity 0 is a note-off (MIDI convention). Messages
    /// other than note on/off are not the core's concern and yield `None`,
    /// as do data bytes with the high bit set (never valid in MIDI).
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 3 {
            return None;
        }

        let status = bytes[0];
        let channel = status & 0x0F;
        let note = bytes[1];
        let velocity = bytes[2];

        if note >= 0x80 || velocity >= 0x80 {
            return None;
        }

        match status & 0xF0 {
            0x90 => {
                if velocity == 0 {
                    Some(MidiEvent::NoteOff { channel, note })
                } else {
                    Some(MidiEvent::NoteOn {
                        channel,
                        note,
                        velocity,
                    })
                }
            }
            0x80 => Some(MidiEvent::NoteOff { channel, note }),
            _ => None,
        }
    }

    /// The channel this event arrived on
    pub fn channel(&self) -> u8 {
        match self {
            MidiEvent::NoteOn { channel, .. } | MidiEvent::NoteOff { channel, .. } => *channel,
        }
    }

    /// The pitch this event addresses
    pub fn note(&self) -> u8 {
        match self {
            MidiEvent::NoteOn { note, .. } | MidiEvent::NoteOff { note, .. } => *note,
        }
    }
}
