// Sequencer module
// Transport clock, playback scheduling, and live note capture

pub mod clock;
pub mod engine;
pub mod recorder;
pub mod scheduler;
pub mod snapshot;
pub mod timeline;

pub use clock::{TICKS_PER_QUARTER, TransportState};
pub use engine::SequencerEngine;
pub use recorder::NoteCaptureRecorder;
pub use scheduler::{EventScheduler, ScheduledEvent, SchedulerState, SequencerEvent};
pub use snapshot::{ClipSnapshot, MidiClip, Note, Pattern};
pub use timeline::{Tempo, TimeSignature};
