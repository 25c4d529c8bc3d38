// Sequencer engine - Real-time side glue
// Owns the scheduler plus the endpoints of both message queues: drains
// inbound commands at the start of each block, runs the scheduler, and
// pushes captured notes / transport echoes / diagnostics back out.

use crate::messaging::channels::{CommandConsumer, NotificationProducer};
use crate::messaging::command::EngineCommand;
use crate::messaging::notification::Notification;
use crate::midi::event::MidiEvent;
use crate::sequencer::clock;
use crate::sequencer::scheduler::{EventScheduler, ScheduledEvent, SchedulerState};

pub struct SequencerEngine {
    commands: CommandConsumer,
    notifications: NotificationProducer,
    scheduler: EventScheduler,
}

impl SequencerEngine {
    pub fn new(commands: CommandConsumer, notifications: NotificationProducer) -> Self {
        Self {
            commands,
            notifications,
            scheduler: EventScheduler::new(),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Run one render block: apply pending commands, schedule, report.
    /// Never panics; malformed messages become diagnostics.
    pub fn process_block(&mut self, now: f64, out: &mut Vec<ScheduledEvent>) {
        while let Some(command) = ringbuf::traits::Consumer::try_pop(&mut self.commands) {
            self.apply_command(command, now, out);
        }

        self.scheduler.process_block(now, out);

        for note in self.scheduler.recorder_mut().take_captured() {
            self.notify(Notification::NoteCaptured {
                tick: note.tick,
                pitch: note.pitch,
                duration: note.duration,
                velocity: note.velocity,
            });
        }
    }

    /// Feed one raw note event from a live input into the recorder.
    ///
    /// Timestamped against the transport clock; ignored while recording is
    /// not armed or no transport is installed.
    pub fn handle_midi_input(&mut self, event: MidiEvent, now: f64) {
        if !self.scheduler.is_record_armed() {
            return;
        }
        let Some(transport) = self.scheduler.transport().copied() else {
            return;
        };

        let tick = clock::tick_at(&transport, now);
        let window = self.scheduler.record_window();
        self.scheduler.recorder_mut().process_event(event, tick, window);
    }

    fn apply_command(&mut self, command: EngineCommand, now: f64, out: &mut Vec<ScheduledEvent>) {
        match command {
            EngineCommand::PreparePlayback { clips, loop_region } => {
                self.scheduler.prepare_playback(clips, loop_region);
            }
            EngineCommand::SetClips { clips } => {
                self.scheduler.set_clips(clips);
            }
            EngineCommand::ClipChanged { clip } => {
                if !self.scheduler.clip_changed(clip) {
                    self.notify(Notification::warning("clip_changed for unknown clip dropped"));
                }
            }
            EngineCommand::SetTransport(transport) => {
                self.scheduler.set_transport(transport);
                self.notify(Notification::Transport(transport));
            }
            EngineCommand::MidiConfig(config) => {
                self.scheduler.apply_config(config);
            }
            EngineCommand::Play { clip_id, at } => {
                self.scheduler.play_clip(clip_id, at);
            }
            EngineCommand::Immediate(event) => {
                out.push(ScheduledEvent {
                    at: now,
                    event: event.into(),
                });
            }
        }
    }

    fn notify(&mut self, notification: Notification) {
        // Dropping on a full queue beats blocking the render thread
        let _ = ringbuf::traits::Producer::try_push(&mut self.notifications, notification);
    }
}
