// Messaging module
// Lock-free message vocabulary between the control and real-time contexts

pub mod channels;
pub mod command;
pub mod notification;

pub use channels::{create_command_channel, create_notification_channel};
pub use command::{EngineCommand, ImmediateEvent, MidiConfig};
pub use notification::{DiagnosticLevel, Notification};
