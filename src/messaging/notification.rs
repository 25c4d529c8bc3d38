// Notifications - Real-time context → control context
// Captured notes, transport echoes, and diagnostics. The real-time side
// never formats strings, so diagnostic messages are static.

use crate::sequencer::clock::TransportState;

/// Severity of a diagnostic notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

/// Outbound message vocabulary from the sequencer engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    /// Echo of the transport state the scheduler is now following
    Transport(TransportState),
    /// A note completed by the capture recorder, for the control thread to
    /// fold into the arrangement
    NoteCaptured {
        tick: i64,
        pitch: u8,
        duration: i64,
        velocity: u8,
    },
    /// Non-fatal condition in the real-time context (malformed or stale
    /// message dropped, queue full, ...)
    Diagnostic {
        level: DiagnosticLevel,
        message: &'static str,
    },
}

impl Notification {
    pub fn warning(message: &'static str) -> Self {
        Notification::Diagnostic {
            level: DiagnosticLevel::Warning,
            message,
        }
    }

    pub fn info(message: &'static str) -> Self {
        Notification::Diagnostic {
            level: DiagnosticLevel::Info,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_helpers() {
        let warning = Notification::warning("clip not found");
        let info = Notification::info("playback armed");

        assert!(matches!(
            warning,
            Notification::Diagnostic {
                level: DiagnosticLevel::Warning,
                ..
            }
        ));
        assert!(matches!(
            info,
            Notification::Diagnostic {
                level: DiagnosticLevel::Info,
                ..
            }
        ));
    }
}
