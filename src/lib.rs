// Arranger - Timeline clip arrangement and real-time playback scheduling core

pub mod arrangement;
pub mod messaging;
pub mod midi;
pub mod sequencer;

// Re-export commonly used types for convenience
pub use arrangement::clip::{Clip, ClipId};
pub use arrangement::store::{ClipStore, EditError};
pub use arrangement::unit::{ClipUnit, Pulses, Seconds};
pub use messaging::channels::{create_command_channel, create_notification_channel};
pub use messaging::command::{EngineCommand, ImmediateEvent, MidiConfig};
pub use messaging::notification::{DiagnosticLevel, Notification};
pub use midi::event::MidiEvent;
pub use sequencer::clock::{TICKS_PER_QUARTER, TransportState};
pub use sequencer::engine::SequencerEngine;
pub use sequencer::recorder::NoteCaptureRecorder;
pub use sequencer::scheduler::{EventScheduler, ScheduledEvent, SchedulerState, SequencerEvent};
pub use sequencer::snapshot::{ClipSnapshot, MidiClip, Note, Pattern};
pub use sequencer::timeline::{Tempo, TimeSignature};
