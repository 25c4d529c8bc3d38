// Commands - Control context → real-time context
// The control thread never shares live objects with the scheduler; edits
// travel as immutable snapshots inside these messages.

use crate::arrangement::clip::ClipId;
use crate::sequencer::clock::TransportState;
use crate::sequencer::snapshot::ClipSnapshot;

/// Recorder/input configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MidiConfig {
    /// Only capture events arriving on this channel; `None` captures all
    pub channel: Option<u8>,
    /// Whether live input is written into the arrangement
    pub record_armed: bool,
}

/// A live note event injected by the control context
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ImmediateEvent {
    NoteOn { pitch: u8, velocity: u8 },
    NoteOff { pitch: u8 },
    AllNotesOff,
}

/// Inbound message vocabulary for the sequencer engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    /// Replace the clip set and loop bounds ahead of a playback session
    PreparePlayback {
        clips: Vec<ClipSnapshot>,
        loop_region: Option<(i64, i64)>,
    },
    /// Replace the clip set mid-session
    SetClips { clips: Vec<ClipSnapshot> },
    /// Supersede one clip's snapshot after an edit
    ClipChanged { clip: ClipSnapshot },
    /// New transport state for this session
    SetTransport(TransportState),
    /// Recorder/input configuration change
    MidiConfig(MidiConfig),
    /// Switch to clip `clip_id` once the host clock reaches `at`
    Play { clip_id: ClipId, at: f64 },
    /// Pass a live note event straight through to the output
    Immediate(ImmediateEvent),
}
