// Transport clock - Stateless mapping between wall-clock time and ticks
// All scheduling timing derives from these pure functions; the scheduler
// itself only keeps a tick cursor.

use crate::sequencer::timeline::{Tempo, TimeSignature};

/// Ticks per quarter note (PPQN), MIDI-clock resolution
pub const TICKS_PER_QUARTER: i64 = 24;

/// Musical clock state driving playback.
///
/// Produced by playback control, pushed into the scheduler over the command
/// queue; valid for one playback session. `bar_started_at` is the host
/// timestamp (seconds) at which `current_bar` begins. It may still be in
/// the future when playback is armed.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransportState {
    pub playing: bool,
    pub tempo: Tempo,
    pub time_signature: TimeSignature,
    pub current_bar: u32,
    pub bar_started_at: f64,
}

impl TransportState {
    pub fn new(tempo: Tempo, time_signature: TimeSignature) -> Self {
        Self {
            playing: false,
            tempo,
            time_signature,
            current_bar: 0,
            bar_started_at: 0.0,
        }
    }

    /// Tick position of the start of `current_bar`
    pub fn bar_start_tick(&self) -> i64 {
        self.current_bar as i64 * self.time_signature.numerator as i64 * TICKS_PER_QUARTER
    }
}

impl Default for TransportState {
    fn default() -> Self {
        Self::new(Tempo::default(), TimeSignature::default())
    }
}

/// Duration of one tick in seconds at the given tempo
pub fn seconds_per_tick(tempo: Tempo) -> f64 {
    60.0 / (tempo.bpm() * TICKS_PER_QUARTER as f64)
}

/// Absolute tick position at a wall-clock moment.
///
/// Beats elapsed since the bar reference are added to the bar's beat
/// position and floored to tick resolution.
pub fn tick_at(transport: &TransportState, now: f64) -> i64 {
    let elapsed = now - transport.bar_started_at;
    let beat_position = transport.current_bar as f64 * transport.time_signature.beats_per_bar()
        + (transport.tempo.bpm() / 60.0) * elapsed;
    (beat_position * TICKS_PER_QUARTER as f64).floor() as i64
}

/// Wall-clock moment of an absolute tick (inverse of [`tick_at`]).
///
/// Used to timestamp future events; the tick here is always the real,
/// un-looped tick so far-future loop iterations land on correct time.
pub fn moment_of_tick(transport: &TransportState, tick: i64) -> f64 {
    transport.bar_started_at
        + (tick - transport.bar_start_tick()) as f64 * seconds_per_tick(transport.tempo)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport_120() -> TransportState {
        TransportState {
            playing: true,
            tempo: Tempo::new(120.0),
            time_signature: TimeSignature::four_four(),
            current_bar: 0,
            bar_started_at: 0.0,
        }
    }

    #[test]
    fn test_seconds_per_tick() {
        // 120 BPM: beat = 0.5s, 24 ticks per beat
        let spt = seconds_per_tick(Tempo::new(120.0));
        assert!((spt - 0.5 / 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_tick_at() {
        let transport = transport_120();

        assert_eq!(tick_at(&transport, 0.0), 0);
        // One beat in
        assert_eq!(tick_at(&transport, 0.5), 24);
        // One 4/4 bar in
        assert_eq!(tick_at(&transport, 2.0), 96);
    }

    #[test]
    fn test_tick_at_mid_session_bar() {
        let mut transport = transport_120();
        transport.current_bar = 2;
        transport.bar_started_at = 10.0;

        // At the bar reference itself: 2 bars * 4 beats * 24 ticks
        assert_eq!(tick_at(&transport, 10.0), 192);
        assert_eq!(transport.bar_start_tick(), 192);
        // Half a second later, one more beat
        assert_eq!(tick_at(&transport, 10.5), 216);
    }

    #[test]
    fn test_moment_of_tick_inverts_tick_at() {
        let mut transport = transport_120();
        transport.current_bar = 1;
        transport.bar_started_at = 3.0;

        // Sample half a tick after each moment so float rounding at the
        // tick boundary cannot flip the floor
        let half_tick = seconds_per_tick(transport.tempo) / 2.0;
        for tick in [96, 100, 150, 192] {
            let moment = moment_of_tick(&transport, tick);
            assert_eq!(tick_at(&transport, moment + half_tick), tick);
        }
    }

    #[test]
    fn test_tick_before_bar_reference() {
        let mut transport = transport_120();
        transport.current_bar = 0;
        transport.bar_started_at = 1.0;

        // Before the bar starts the position is negative
        assert!(tick_at(&transport, 0.0) < 0);
    }
}
