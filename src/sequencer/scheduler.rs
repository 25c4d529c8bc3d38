// Event scheduler - Per-block state machine driving playback
// Maps the moving transport position to clip-relative ticks, looks up
// notes in the active snapshots, and emits wall-clock-timestamped events.
// Runs in the real-time context and must never panic.

use crate::arrangement::clip::ClipId;
use crate::messaging::command::{ImmediateEvent, MidiConfig};
use crate::sequencer::clock::{self, TransportState};
use crate::sequencer::recorder::NoteCaptureRecorder;
use crate::sequencer::snapshot::ClipSnapshot;

/// How far ahead of the audio consumption point events are scheduled
pub const SCHEDULE_LOOKAHEAD_SECONDS: f64 = 0.050;

/// Note-offs land this much early so they never collide with the next
/// note-on at the same tick
pub const NOTE_OFF_EPSILON_SECONDS: f64 = 0.0001;

/// Playback state of the scheduler
///
/// `Armed` means the playing flag is set but the bar reference is still in
/// the future; the first block where it is reached seeds the tick cursor
/// and enters `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Armed,
    Running,
}

/// A channel-less note event headed for the instrument layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    NoteOn { pitch: u8, velocity: u8 },
    NoteOff { pitch: u8 },
    AllNotesOff,
}

impl From<ImmediateEvent> for SequencerEvent {
    fn from(event: ImmediateEvent) -> Self {
        match event {
            ImmediateEvent::NoteOn { pitch, velocity } => SequencerEvent::NoteOn { pitch, velocity },
            ImmediateEvent::NoteOff { pitch } => SequencerEvent::NoteOff { pitch },
            ImmediateEvent::AllNotesOff => SequencerEvent::AllNotesOff,
        }
    }
}

/// An event stamped with the wall-clock moment it must sound at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEvent {
    pub at: f64,
    pub event: SequencerEvent,
}

/// The real-time playback driver.
///
/// All state here is owned exclusively by the real-time context; the
/// control thread talks to it only through messages applied between
/// blocks.
pub struct EventScheduler {
    state: SchedulerState,
    transport: Option<TransportState>,
    clips: Vec<ClipSnapshot>,
    loop_region: Option<(i64, i64)>,
    cursor_tick: i64,
    last_lookup_tick: i64,
    /// Latched "switch to clip X at time T" command
    pending_play: Option<(ClipId, f64)>,
    active_clip: Option<ClipId>,
    record_armed: bool,
    recorder: NoteCaptureRecorder,
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Stopped,
            transport: None,
            clips: Vec::new(),
            loop_region: None,
            cursor_tick: 0,
            last_lookup_tick: 0,
            pending_play: None,
            active_clip: None,
            record_armed: false,
            recorder: NoteCaptureRecorder::new(),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn transport(&self) -> Option<&TransportState> {
        self.transport.as_ref()
    }

    pub fn recorder_mut(&mut self) -> &mut NoteCaptureRecorder {
        &mut self.recorder
    }

    /// Install the transport state for this session. Transitions are taken
    /// on the next block.
    pub fn set_transport(&mut self, transport: TransportState) {
        self.transport = Some(transport);
    }

    /// Replace the clip set and loop bounds ahead of a playback session
    pub fn prepare_playback(
        &mut self,
        clips: Vec<ClipSnapshot>,
        loop_region: Option<(i64, i64)>,
    ) {
        self.clips = clips;
        self.loop_region = loop_region;
    }

    /// Replace the clip set mid-session
    pub fn set_clips(&mut self, clips: Vec<ClipSnapshot>) {
        self.clips = clips;
    }

    /// Supersede the snapshot with the same id. Returns false if no such
    /// clip is known (stale message; the caller reports and drops it).
    pub fn clip_changed(&mut self, clip: ClipSnapshot) -> bool {
        match self.clips.iter_mut().find(|c| c.id == clip.id) {
            Some(slot) => {
                *slot = clip;
                true
            }
            None => false,
        }
    }

    /// Latch a deferred clip switch; takes effect on the first block where
    /// the host clock has reached `at`.
    pub fn play_clip(&mut self, clip_id: ClipId, at: f64) {
        self.pending_play = Some((clip_id, at));
    }

    /// Apply a recorder/input configuration change. Disarming finalizes
    /// every open voice so nothing dangles into the next take.
    pub fn apply_config(&mut self, config: MidiConfig) {
        self.recorder.set_channel_filter(config.channel);
        if self.record_armed && !config.record_armed {
            let tick = self.fold_tick(self.last_lookup_tick);
            self.recorder.finalize_all_notes(tick);
        }
        self.record_armed = config.record_armed;
    }

    pub fn is_record_armed(&self) -> bool {
        self.record_armed
    }

    /// The tick window live input is folded into: the active clip's length
    /// if one is selected, else the loop length.
    pub fn record_window(&self) -> Option<i64> {
        if let Some(id) = self.active_clip {
            if let Some(clip) = self.clips.iter().find(|c| c.id == id) {
                return Some(clip.length());
            }
        }
        self.loop_region.map(|(start, end)| end - start)
    }

    /// Run one render block at host time `now`, appending events to `out`.
    ///
    /// Absent transport state means no work, not an error. The catch-up
    /// loop is bounded by the real time elapsed since the previous block.
    pub fn process_block(&mut self, now: f64, out: &mut Vec<ScheduledEvent>) {
        let Some(transport) = self.transport else {
            return;
        };

        if let Some((clip_id, at)) = self.pending_play {
            if at <= now {
                self.active_clip = Some(clip_id);
                self.pending_play = None;
            }
        }

        if !transport.playing {
            if self.state == SchedulerState::Running {
                // In-flight note-offs are not retracted; flush instead
                out.push(ScheduledEvent {
                    at: now,
                    event: SequencerEvent::AllNotesOff,
                });
                if self.record_armed {
                    let tick = self.fold_tick(self.last_lookup_tick);
                    self.recorder.finalize_all_notes(tick);
                }
            }
            self.state = SchedulerState::Stopped;
            return;
        }

        if self.state == SchedulerState::Stopped {
            self.state = SchedulerState::Armed;
        }

        if self.state == SchedulerState::Armed {
            if transport.bar_started_at > now {
                return;
            }
            // One tick before the bar start, so the first catch-up
            // iteration processes tick 0 of playback
            self.cursor_tick = transport.bar_start_tick() - 1;
            self.last_lookup_tick = self.cursor_tick;
            self.state = SchedulerState::Running;
        }

        let target_tick = clock::tick_at(&transport, now + SCHEDULE_LOOKAHEAD_SECONDS);
        let seconds_per_tick = clock::seconds_per_tick(transport.tempo);

        while self.cursor_tick < target_tick {
            self.cursor_tick += 1;
            let lookup_tick = self.lookup_tick(self.cursor_tick);

            if self.record_armed && lookup_tick < self.last_lookup_tick {
                // Cursor just wrapped: close voices at the window end
                if let Some(window) = self.record_window() {
                    self.recorder.finalize_all_notes(window);
                }
            }
            self.last_lookup_tick = lookup_tick;

            let Some(clip) = self.select_clip(lookup_tick) else {
                continue;
            };

            // Wall-clock moment of the real, un-looped tick
            let moment = clock::moment_of_tick(&transport, self.cursor_tick);

            for note in &clip.notes {
                let note_tick = clip.start_offset + note.tick;
                if note_tick > lookup_tick {
                    break;
                }
                if note_tick == lookup_tick {
                    out.push(ScheduledEvent {
                        at: moment,
                        event: SequencerEvent::NoteOn {
                            pitch: note.pitch,
                            velocity: note.velocity,
                        },
                    });
                    out.push(ScheduledEvent {
                        at: moment + note.duration as f64 * seconds_per_tick
                            - NOTE_OFF_EPSILON_SECONDS,
                        event: SequencerEvent::NoteOff { pitch: note.pitch },
                    });
                }
            }
        }
    }

    /// Map the real cursor tick to the tick used for note lookup,
    /// applying loop wraparound
    fn lookup_tick(&self, cursor_tick: i64) -> i64 {
        match self.loop_region {
            Some((start, end)) if end > start && cursor_tick - start > 0 => {
                (cursor_tick - start).rem_euclid(end - start) + start
            }
            _ => cursor_tick,
        }
    }

    /// Select the clip active at a tick: the last unmuted snapshot whose
    /// window contains it (later entries override earlier ones)
    fn select_clip(&self, tick: i64) -> Option<&ClipSnapshot> {
        let mut selected = None;
        for clip in &self.clips {
            if clip.muted {
                continue;
            }
            if let Some(active) = self.active_clip {
                if clip.id != active {
                    continue;
                }
            }
            if clip.contains(tick) {
                selected = Some(clip);
            }
        }
        selected
    }

    /// Fold an absolute tick into the recorder's clip-relative window
    fn fold_tick(&self, tick: i64) -> i64 {
        match self.record_window() {
            Some(window) if window > 0 => tick.rem_euclid(window),
            _ => tick,
        }
    }
}
