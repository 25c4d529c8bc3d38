// MIDI module

pub mod event;

pub use event::MidiEvent;
