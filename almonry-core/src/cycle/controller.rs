//! Button-driven donation cycle
//!
//! Runs as one synchronous loop: every reading, gate observation and
//! actuator move blocks the caller. Status goes out one way through a
//! `StatusSink` that never blocks.

use core::ops::ControlFlow;

use almonry_hal::{Clock, InputPin};

use super::board::{Board, Peripherals};
use crate::config::MachineConfig;
use crate::safety::{observe_motion_window, MotionSample, MotionVerdict};
use crate::sequencer::{ActuatorSequencer, InterlockError};
use crate::state::{CycleEvent, CyclePhase};
use crate::status::{StatusEvent, StatusKind};
use crate::traits::{Lamp, RangeSensor, StatusIndicator, StatusSink, StopRequest};

/// How a triggered cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// Nothing in the intake; nothing moved
    NoObject,
    /// Motion seen; nothing moved
    Aborted,
    /// Full sequence ran and was counted
    Admitted { total: u32 },
    /// A stop was requested before the cycle finished
    Interrupted,
    /// An actuator operation was refused; outputs were forced safe
    Faulted(InterlockError),
}

/// Numbers and stamps outgoing status events
struct Reporter<S, C> {
    sink: S,
    clock: C,
    next_seq: u16,
}

impl<S: StatusSink, C: Clock> Reporter<S, C> {
    fn emit(&mut self, kind: StatusKind) {
        let event = StatusEvent {
            seq: self.next_seq,
            timestamp_ms: self.clock.now_ms(),
            kind,
        };
        self.next_seq = self.next_seq.wrapping_add(1);
        self.sink.publish(&event);
    }
}

/// The donation cycle controller
///
/// Owns all hardware, the donation counter and the current phase.
pub struct DonationCycle<B: Board, S: StatusSink> {
    clock: B::Clock,
    trigger: B::Trigger,
    motion: B::Motion,
    range_a: B::Range,
    range_b: B::Range,
    indicator: B::Indicator,
    sequencer: ActuatorSequencer<B::Lock, B::Coils, B::Belt, B::Clock>,
    reporter: Reporter<S, B::Clock>,
    config: MachineConfig,
    phase: CyclePhase,
    donations: u32,
}

impl<B: Board, S: StatusSink> DonationCycle<B, S> {
    pub fn new(peripherals: Peripherals<B>, config: MachineConfig, sink: S) -> Self {
        let Peripherals {
            clock,
            trigger,
            motion,
            range_a,
            range_b,
            lock,
            door_a,
            door_b,
            belt,
            indicator,
        } = peripherals;

        let sequencer = ActuatorSequencer::new(
            lock,
            door_a,
            door_b,
            belt,
            clock.clone(),
            config.doors,
            config.timing,
        );

        Self {
            reporter: Reporter {
                sink,
                clock: clock.clone(),
                next_seq: 0,
            },
            clock,
            trigger,
            motion,
            range_a,
            range_b,
            indicator,
            sequencer,
            config,
            phase: CyclePhase::Idle,
            donations: 0,
        }
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Donations counted since power-on
    pub fn donations(&self) -> u32 {
        self.donations
    }

    pub fn sequencer(&self) -> &ActuatorSequencer<B::Lock, B::Coils, B::Belt, B::Clock> {
        &self.sequencer
    }

    /// Force the outputs safe and announce readiness
    ///
    /// Also resumes a controller that was stopped.
    pub fn start(&mut self) {
        self.sequencer.force_safe_state();
        self.reporter.emit(StatusKind::LockEngaged);
        self.phase = CyclePhase::Idle;
        self.reporter.sink.phase_changed(self.phase);
        self.indicator.show(self.phase.lamp());
        self.reporter.emit(StatusKind::SystemReady {
            total: self.donations,
        });
    }

    /// Run until `stop` is requested, then shut down
    pub fn run<R: StopRequest + ?Sized>(&mut self, stop: &R) {
        self.start();
        while !stop.stop_requested() {
            self.poll(stop);
        }
        self.shutdown();
    }

    /// One idle tick: handle a trigger if the button is down, then wait one
    /// poll interval
    pub fn poll<R: StopRequest + ?Sized>(&mut self, stop: &R) -> Option<CycleOutcome> {
        let outcome = if self.trigger.is_high() {
            let outcome = match self.run_cycle(stop) {
                Ok(outcome) => outcome,
                Err(err) => {
                    self.recover();
                    CycleOutcome::Faulted(err)
                }
            };
            self.wait_for_release(stop);
            Some(outcome)
        } else {
            None
        };

        self.clock.delay_ms(self.config.timing.trigger_poll_ms);
        outcome
    }

    /// Handle one trigger: measure, gate, and admit or refuse
    pub fn run_cycle<R: StopRequest + ?Sized>(
        &mut self,
        stop: &R,
    ) -> Result<CycleOutcome, InterlockError> {
        self.advance(CycleEvent::TriggerPressed);
        self.reporter.emit(StatusKind::CycleStarted);

        let a = self.range_a.measure();
        self.clock
            .delay_ms(self.config.timing.inter_sensor_settle_ms);
        let b = self.range_b.measure();
        self.reporter.emit(StatusKind::Readings { a, b });

        if !self.config.detection.object_present(a, b) {
            self.reporter.emit(StatusKind::NoObject {
                total: self.donations,
            });
            self.advance(CycleEvent::NoObject);
            return Ok(CycleOutcome::NoObject);
        }

        self.reporter.emit(StatusKind::ObjectDetected);
        self.advance(CycleEvent::ObjectDetected);

        match self.check_motion(stop) {
            MotionVerdict::Interrupted => Ok(CycleOutcome::Interrupted),
            MotionVerdict::PersonPresent => {
                self.reporter.emit(StatusKind::MotionDetected);
                self.advance(CycleEvent::PersonPresent);
                Ok(self.abort(stop))
            }
            MotionVerdict::Safe => {
                self.reporter.emit(StatusKind::MotionClear);
                self.advance(CycleEvent::MotionSafe);
                self.admit(stop)
            }
        }
    }

    /// Force the outputs safe and stop
    pub fn shutdown(&mut self) {
        self.sequencer.force_safe_state();
        self.indicator.show(Lamp::Off);
        self.advance(CycleEvent::Shutdown);
        self.reporter.emit(StatusKind::ShutdownComplete);
    }

    fn check_motion<R: StopRequest + ?Sized>(&mut self, stop: &R) -> MotionVerdict {
        let gate = self.config.motion;
        self.reporter.emit(StatusKind::MotionCheckStarted {
            window_ms: gate.window_ms,
            sustained_ms: gate.sustained_ms,
        });

        let reporter = &mut self.reporter;
        observe_motion_window(&self.motion, &self.clock, &gate, |sample| {
            match sample {
                MotionSample::Rising => reporter.emit(StatusKind::MotionRising),
                MotionSample::NoiseIgnored => reporter.emit(StatusKind::MotionNoiseIgnored),
                _ => {}
            }
            if stop.stop_requested() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
    }

    /// Refuse the donation: nothing moves, the lamp flashes "not safe"
    fn abort<R: StopRequest + ?Sized>(&mut self, stop: &R) -> CycleOutcome {
        self.reporter.emit(StatusKind::Aborted {
            total: self.donations,
        });
        if !self.flash_not_safe(stop) {
            return CycleOutcome::Interrupted;
        }
        self.advance(CycleEvent::AbortHandled);
        CycleOutcome::Aborted
    }

    /// Flash the lamp; returns false if a stop cut it short
    fn flash_not_safe<R: StopRequest + ?Sized>(&mut self, stop: &R) -> bool {
        let indicator = self.config.indicator;
        if indicator.flash_period_ms == 0 {
            return true;
        }
        let on_ms = indicator.flash_period_ms / 2;
        let off_ms = indicator.flash_period_ms - on_ms;

        let mut elapsed_ms: u32 = 0;
        while elapsed_ms < indicator.flash_duration_ms {
            if stop.stop_requested() {
                return false;
            }
            self.indicator.show(Lamp::NotSafe);
            self.clock.delay_ms(on_ms);
            self.indicator.show(Lamp::Off);
            self.clock.delay_ms(off_ms);
            elapsed_ms = elapsed_ms.saturating_add(indicator.flash_period_ms);
        }
        true
    }

    /// The admit sequence: lock, doors, belt, doors, lock, count
    fn admit<R: StopRequest + ?Sized>(
        &mut self,
        stop: &R,
    ) -> Result<CycleOutcome, InterlockError> {
        let timing = self.config.timing;

        self.sequencer.lock_release();
        self.reporter.emit(StatusKind::LockReleased);
        if stop.stop_requested() {
            return Ok(CycleOutcome::Interrupted);
        }

        self.sequencer.wait_release_settle();
        if stop.stop_requested() {
            return Ok(CycleOutcome::Interrupted);
        }

        self.reporter.emit(StatusKind::DoorsOpening);
        self.sequencer.doors_open()?;

        let belt = self.sequencer.belt_start();
        self.reporter.emit(StatusKind::BeltStarted);
        if stop.stop_requested() {
            return Ok(CycleOutcome::Interrupted);
        }

        self.clock.delay_ms(timing.door_dwell_ms);
        if stop.stop_requested() {
            return Ok(CycleOutcome::Interrupted);
        }

        self.reporter.emit(StatusKind::DoorsClosing);
        self.sequencer.doors_close()?;

        // Belt keeps running through the door close and is topped up here
        self.sequencer.belt_run_for(belt, timing.belt_run_ms);
        self.reporter.emit(StatusKind::BeltStopped);

        self.sequencer.lock_engage()?;
        self.reporter.emit(StatusKind::LockEngaged);

        self.donations += 1;
        self.reporter.emit(StatusKind::DonationCounted {
            total: self.donations,
        });
        self.advance(CycleEvent::AdmitComplete);
        Ok(CycleOutcome::Admitted {
            total: self.donations,
        })
    }

    /// Wait for the button to come back up so one press is one cycle
    fn wait_for_release<R: StopRequest + ?Sized>(&mut self, stop: &R) {
        while self.trigger.is_high() && !stop.stop_requested() {
            self.clock.delay_ms(self.config.timing.trigger_poll_ms);
        }
    }

    /// Return to idle with safe outputs after a refused operation
    fn recover(&mut self) {
        self.sequencer.force_safe_state();
        self.reporter.emit(StatusKind::LockEngaged);
        self.set_phase(CyclePhase::Idle);
    }

    fn advance(&mut self, event: CycleEvent) {
        let next = self.phase.transition(event);
        self.set_phase(next);
    }

    fn set_phase(&mut self, next: CyclePhase) {
        if next != self.phase {
            self.phase = next;
            self.reporter.sink.phase_changed(next);
            self.indicator.show(next.lamp());
        }
    }
}
