//! Interlocked lock, door and belt operations

use almonry_hal::Clock;

use super::delay_at_least_us;
use super::doors::{drive_lockstep, DoorState};
use crate::config::{DoorConfig, TimingConfig};
use crate::traits::{BeltDrive, CoilDriver, LockActuator};

/// Lock position as last commanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockState {
    Locked,
    Unlocked,
}

/// An operation was refused because it would break the actuation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterlockError {
    /// Doors cannot move while the lock is engaged
    LockEngaged,
    /// The lock cannot engage while the belt is running
    BeltRunning,
    /// The lock cannot engage until the doors are closed
    DoorsNotClosed,
}

/// Proof that the belt was started, and when
#[derive(Debug, PartialEq, Eq)]
#[must_use = "the belt keeps running until passed to belt_run_for"]
pub struct BeltRun {
    started_us: u64,
}

impl BeltRun {
    pub fn started_us(&self) -> u64 {
        self.started_us
    }
}

/// Drives the lock, both door mechanisms and the belt
///
/// Every operation blocks for a bounded time on the owned clock. Operations
/// that would move something out of order return `InterlockError` without
/// touching any output.
pub struct ActuatorSequencer<L, D, B, C> {
    lock: L,
    door_a: D,
    door_b: D,
    belt: B,
    clock: C,
    doors: DoorConfig,
    timing: TimingConfig,
    lock_state: LockState,
    door_state: DoorState,
    released_at_us: Option<u64>,
    belt_started_us: Option<u64>,
}

impl<L, D, B, C> ActuatorSequencer<L, D, B, C>
where
    L: LockActuator,
    D: CoilDriver,
    B: BeltDrive,
    C: Clock,
{
    /// Create a sequencer
    ///
    /// The lock is assumed engaged and the doors closed until told otherwise.
    /// Call `force_safe_state` before the first cycle to make that true.
    pub fn new(
        lock: L,
        door_a: D,
        door_b: D,
        belt: B,
        clock: C,
        doors: DoorConfig,
        timing: TimingConfig,
    ) -> Self {
        Self {
            lock,
            door_a,
            door_b,
            belt,
            clock,
            doors,
            timing,
            lock_state: LockState::Locked,
            door_state: DoorState::Closed,
            released_at_us: None,
            belt_started_us: None,
        }
    }

    pub fn lock_state(&self) -> LockState {
        self.lock_state
    }

    pub fn door_state(&self) -> DoorState {
        self.door_state
    }

    pub fn belt_running(&self) -> bool {
        self.belt.is_running()
    }

    /// Engage the lock and move the indicator to "locked"
    ///
    /// Refused while the belt runs or the doors are not closed.
    pub fn lock_engage(&mut self) -> Result<(), InterlockError> {
        if self.belt.is_running() {
            return Err(InterlockError::BeltRunning);
        }
        if self.door_state != DoorState::Closed {
            return Err(InterlockError::DoorsNotClosed);
        }
        self.engage_lock();
        Ok(())
    }

    /// Release the lock and move the indicator to "unlocked"
    pub fn lock_release(&mut self) {
        self.lock.release();
        self.clock.delay_ms(self.timing.lock_settle_ms);
        self.lock.relax();
        self.lock_state = LockState::Unlocked;
        self.released_at_us = Some(self.clock.now_us());
    }

    /// Milliseconds of release settle still to wait, rounded up
    pub fn release_settle_remaining_ms(&self) -> u32 {
        let remaining_us = self.release_settle_remaining_us();
        remaining_us.div_ceil(1000) as u32
    }

    /// Block until the release settle time has passed since `lock_release`
    pub fn wait_release_settle(&mut self) {
        let remaining_us = self.release_settle_remaining_us();
        delay_at_least_us(&self.clock, remaining_us);
    }

    /// Open both doors
    ///
    /// Tops up any release settle time still outstanding first. Does nothing
    /// if the doors are already open.
    pub fn doors_open(&mut self) -> Result<(), InterlockError> {
        if self.lock_state != LockState::Unlocked {
            return Err(InterlockError::LockEngaged);
        }
        if self.door_state == DoorState::Open {
            return Ok(());
        }
        self.wait_release_settle();

        self.door_state = DoorState::Opening;
        drive_lockstep(
            &mut self.door_a,
            self.doors.a.open,
            &mut self.door_b,
            self.doors.b.open,
            &self.clock,
            self.timing.step_delay_ms,
        );
        self.door_state = DoorState::Open;
        Ok(())
    }

    /// Close both doors; does nothing if they are already closed
    pub fn doors_close(&mut self) -> Result<(), InterlockError> {
        if self.lock_state != LockState::Unlocked {
            return Err(InterlockError::LockEngaged);
        }
        if self.door_state == DoorState::Closed {
            return Ok(());
        }

        self.door_state = DoorState::Closing;
        drive_lockstep(
            &mut self.door_a,
            self.doors.a.close,
            &mut self.door_b,
            self.doors.b.close,
            &self.clock,
            self.timing.step_delay_ms,
        );
        self.door_state = DoorState::Closed;
        Ok(())
    }

    /// Energise the belt
    ///
    /// Starting a belt that already runs keeps the original start time.
    pub fn belt_start(&mut self) -> BeltRun {
        let started_us = match self.belt_started_us {
            Some(started) if self.belt.is_running() => started,
            _ => {
                self.belt.set_running(true);
                self.clock.now_us()
            }
        };
        self.belt_started_us = Some(started_us);
        BeltRun { started_us }
    }

    /// Keep the belt running until `total_ms` after it started, then stop it
    pub fn belt_run_for(&mut self, run: BeltRun, total_ms: u32) {
        let elapsed_us = self.clock.elapsed_us(run.started_us);
        let total_us = total_ms as u64 * 1000;
        if elapsed_us < total_us {
            delay_at_least_us(&self.clock, total_us - elapsed_us);
        }
        self.belt.set_running(false);
        self.belt_started_us = None;
    }

    /// Drive everything to the resting state, ignoring the interlocks
    ///
    /// Belt off, all coils off, lock engaged. Used at power-up and on
    /// shutdown, whatever phase the controller was in. The doors are not
    /// moved, so their recorded state stays as last commanded and the next
    /// admit closes them.
    pub fn force_safe_state(&mut self) {
        self.belt.set_running(false);
        self.belt_started_us = None;
        self.door_a.de_energize();
        self.door_b.de_energize();
        // A stroke cut short still needs a full close
        if matches!(self.door_state, DoorState::Opening | DoorState::Closing) {
            self.door_state = DoorState::Open;
        }
        self.engage_lock();
    }

    fn engage_lock(&mut self) {
        self.lock.engage();
        self.clock.delay_ms(self.timing.lock_settle_ms);
        self.lock.relax();
        self.lock_state = LockState::Locked;
        self.released_at_us = None;
    }

    fn release_settle_remaining_us(&self) -> u64 {
        match self.released_at_us {
            Some(released) => {
                let settle_us = self.timing.release_settle_ms as u64 * 1000;
                settle_us.saturating_sub(self.clock.elapsed_us(released))
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Action, Door, Journal, SimBelt, SimClock, SimCoils, SimLock};

    type TestSequencer = ActuatorSequencer<SimLock, SimCoils, SimBelt, SimClock>;

    fn sequencer() -> (TestSequencer, SimClock, Journal) {
        let clock = SimClock::new();
        let journal = Journal::new(&clock);
        let seq = ActuatorSequencer::new(
            SimLock::new(&journal),
            SimCoils::new(Door::A, &journal),
            SimCoils::new(Door::B, &journal),
            SimBelt::new(&journal),
            clock.clone(),
            DoorConfig::default(),
            TimingConfig::default(),
        );
        (seq, clock, journal)
    }

    #[test]
    fn test_doors_refused_while_locked() {
        let (mut seq, clock, journal) = sequencer();
        assert_eq!(seq.doors_open(), Err(InterlockError::LockEngaged));
        assert_eq!(seq.doors_close(), Err(InterlockError::LockEngaged));
        assert!(journal.entries().is_empty());
        assert_eq!(clock.now_us(), 0);
    }

    #[test]
    fn test_lock_refused_while_belt_runs() {
        let (mut seq, _clock, _journal) = sequencer();
        seq.lock_release();
        let run = seq.belt_start();
        assert_eq!(seq.lock_engage(), Err(InterlockError::BeltRunning));
        seq.belt_run_for(run, 0);
        assert_eq!(seq.lock_engage(), Ok(()));
    }

    #[test]
    fn test_lock_refused_while_doors_open() {
        let (mut seq, _clock, _journal) = sequencer();
        seq.lock_release();
        seq.doors_open().unwrap();
        assert_eq!(seq.lock_engage(), Err(InterlockError::DoorsNotClosed));
        seq.doors_close().unwrap();
        assert_eq!(seq.lock_engage(), Ok(()));
        assert_eq!(seq.lock_state(), LockState::Locked);
    }

    #[test]
    fn test_lock_engage_is_idempotent() {
        let (mut seq, _clock, journal) = sequencer();
        seq.lock_engage().unwrap();
        let once = journal.lock_outputs();
        seq.lock_engage().unwrap();
        let twice = journal.lock_outputs();

        assert_eq!(once, twice);
        assert_eq!(seq.lock_state(), LockState::Locked);
    }

    #[test]
    fn test_doors_open_tops_up_release_settle() {
        let (mut seq, clock, journal) = sequencer();
        seq.lock_release();
        let released = clock.now_us();
        assert_eq!(seq.release_settle_remaining_ms(), 500);

        clock.advance_ms(200);
        assert_eq!(seq.release_settle_remaining_ms(), 300);
        seq.doors_open().unwrap();

        let first_step = journal
            .entries()
            .into_iter()
            .find(|(_, a)| matches!(a, Action::Coils(..)))
            .map(|(t, _)| t)
            .unwrap();
        assert_eq!(first_step - released, 500_000);
    }

    #[test]
    fn test_doors_open_twice_moves_once() {
        let (mut seq, clock, _journal) = sequencer();
        seq.lock_release();
        seq.doors_open().unwrap();
        let after_first = clock.now_us();
        seq.doors_open().unwrap();
        assert_eq!(clock.now_us(), after_first);
        assert_eq!(seq.door_state(), DoorState::Open);
    }

    #[test]
    fn test_belt_top_up() {
        let (mut seq, clock, _journal) = sequencer();
        let run = seq.belt_start();
        let started = run.started_us();
        clock.advance_ms(3100);
        seq.belt_run_for(run, 5000);

        assert_eq!(clock.now_us() - started, 5_000_000);
        assert!(!seq.belt_running());
    }

    #[test]
    fn test_belt_overrun_stops_immediately() {
        let (mut seq, clock, _journal) = sequencer();
        let run = seq.belt_start();
        clock.advance_ms(6000);
        seq.belt_run_for(run, 5000);

        assert_eq!(clock.now_ms(), 6000);
        assert!(!seq.belt_running());
    }

    #[test]
    fn test_force_safe_state_ignores_interlocks() {
        let (mut seq, _clock, journal) = sequencer();
        seq.lock_release();
        seq.doors_open().unwrap();
        let _run = seq.belt_start();

        seq.force_safe_state();

        assert!(!seq.belt_running());
        assert_eq!(seq.lock_state(), LockState::Locked);
        assert_eq!(seq.door_state(), DoorState::Open);
        assert_eq!(journal.coils(Door::A), [false; 4]);
        assert_eq!(journal.coils(Door::B), [false; 4]);
    }

    #[test]
    fn test_safe_state_keeps_open_doors_open() {
        let (mut seq, _clock, journal) = sequencer();
        seq.lock_release();
        seq.doors_open().unwrap();
        let after_open = journal.coil_moves();
        seq.force_safe_state();
        assert_eq!(seq.door_state(), DoorState::Open);

        // Next admit skips the open stroke and runs the close stroke
        seq.lock_release();
        seq.doors_open().unwrap();
        assert_eq!(journal.coil_moves(), after_open);
        seq.doors_close().unwrap();
        assert!(journal.coil_moves() > after_open);
        assert_eq!(seq.door_state(), DoorState::Closed);
        assert_eq!(seq.lock_engage(), Ok(()));
    }

    #[test]
    fn test_safe_state_with_closed_doors() {
        let (mut seq, _clock, journal) = sequencer();
        seq.force_safe_state();
        assert_eq!(seq.door_state(), DoorState::Closed);
        assert_eq!(journal.coil_moves(), 0);
    }
}
