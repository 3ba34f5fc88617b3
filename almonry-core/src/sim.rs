//! Simulated board for host tests
//!
//! Time is virtual: every blocking delay advances `SimClock` instantly.
//! Outputs append to a shared `Journal` stamped with the virtual time, so
//! tests can check ordering and durations exactly.

use std::boxed::Box;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use almonry_hal::{Clock, InputPin};

use crate::config::MachineConfig;
use crate::cycle::{Board, DonationCycle, Peripherals};
use crate::sensing::Reading;
use crate::state::CyclePhase;
use crate::status::StatusEvent;
use crate::traits::{
    BeltDrive, CoilDriver, Lamp, LockActuator, RangeSensor, StatusIndicator, StatusSink,
    StopRequest,
};

/// Virtual microsecond clock
#[derive(Clone, Default)]
pub struct SimClock {
    now_us: Rc<Cell<u64>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_us.set(self.now_us.get() + ms * 1000);
    }
}

impl Clock for SimClock {
    fn now_us(&self) -> u64 {
        self.now_us.get()
    }

    fn delay_us(&self, us: u32) {
        self.now_us.set(self.now_us.get() + us as u64);
    }

    fn delay_ms(&self, ms: u32) {
        self.advance_ms(ms as u64);
    }
}

/// Input whose level is a function of virtual time in milliseconds
pub struct ScriptedInput {
    clock: SimClock,
    level: Box<dyn Fn(u64) -> bool>,
}

impl ScriptedInput {
    pub fn new(clock: &SimClock, level: impl Fn(u64) -> bool + 'static) -> Self {
        Self {
            clock: clock.clone(),
            level: Box::new(level),
        }
    }

    pub fn constant(clock: &SimClock, high: bool) -> Self {
        Self::new(clock, move |_| high)
    }
}

impl InputPin for ScriptedInput {
    fn is_high(&self) -> bool {
        (self.level)(self.clock.now_us() / 1000)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Door {
    A,
    B,
}

/// One output change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LockEngage,
    LockRelease,
    LockRelax,
    Coils(Door, [bool; 4]),
    Belt(bool),
    Lamp(Lamp),
}

impl Action {
    pub fn is_actuator(&self) -> bool {
        !matches!(self, Action::Lamp(_))
    }
}

/// Time-stamped record of every output change
#[derive(Clone)]
pub struct Journal {
    clock: SimClock,
    entries: Rc<RefCell<Vec<(u64, Action)>>>,
}

impl Journal {
    pub fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            entries: Rc::default(),
        }
    }

    pub fn push(&self, action: Action) {
        self.entries
            .borrow_mut()
            .push((self.clock.now_us(), action));
    }

    /// All entries as `(time_us, action)`
    pub fn entries(&self) -> Vec<(u64, Action)> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Entries recorded from index `mark` on
    pub fn since(&self, mark: usize) -> Vec<(u64, Action)> {
        self.entries.borrow()[mark..].to_vec()
    }

    /// Last lock command and whether the indicator was relaxed after it
    pub fn lock_outputs(&self) -> (Option<Action>, bool) {
        let mut last = None;
        let mut relaxed = false;
        for (_, action) in self.entries.borrow().iter() {
            match action {
                Action::LockEngage | Action::LockRelease => {
                    last = Some(*action);
                    relaxed = false;
                }
                Action::LockRelax => relaxed = true,
                _ => {}
            }
        }
        (last, relaxed)
    }

    /// Lines last driven on a door's coils
    pub fn coils(&self, door: Door) -> [bool; 4] {
        self.entries
            .borrow()
            .iter()
            .rev()
            .find_map(|(_, action)| match action {
                Action::Coils(d, phase) if *d == door => Some(*phase),
                _ => None,
            })
            .unwrap_or([false; 4])
    }

    /// Coil writes that energised at least one line, both doors
    pub fn coil_moves(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(_, action)| matches!(action, Action::Coils(_, phase) if *phase != [false; 4]))
            .count()
    }
}

pub struct SimLock {
    journal: Journal,
}

impl SimLock {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }
}

impl LockActuator for SimLock {
    fn engage(&mut self) {
        self.journal.push(Action::LockEngage);
    }

    fn release(&mut self) {
        self.journal.push(Action::LockRelease);
    }

    fn relax(&mut self) {
        self.journal.push(Action::LockRelax);
    }
}

pub struct SimCoils {
    door: Door,
    journal: Journal,
    phase: [bool; 4],
}

impl SimCoils {
    pub fn new(door: Door, journal: &Journal) -> Self {
        Self {
            door,
            journal: journal.clone(),
            phase: [false; 4],
        }
    }
}

impl CoilDriver for SimCoils {
    fn energize(&mut self, phase: [bool; 4]) {
        self.phase = phase;
        self.journal.push(Action::Coils(self.door, phase));
    }

    fn phase(&self) -> [bool; 4] {
        self.phase
    }
}

pub struct SimBelt {
    journal: Journal,
    running: bool,
}

impl SimBelt {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            running: false,
        }
    }
}

impl BeltDrive for SimBelt {
    fn set_running(&mut self, running: bool) {
        self.running = running;
        self.journal.push(Action::Belt(running));
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

pub struct SimLamp {
    journal: Journal,
}

impl StatusIndicator for SimLamp {
    fn show(&mut self, lamp: Lamp) {
        self.journal.push(Action::Lamp(lamp));
    }
}

/// Ranger returning whatever reading the test sets
pub struct SimRange {
    reading: Rc<Cell<Reading>>,
    pub measurements: Rc<Cell<u32>>,
}

impl RangeSensor for SimRange {
    fn measure(&mut self) -> Reading {
        self.measurements.set(self.measurements.get() + 1);
        self.reading.get()
    }
}

/// Sink collecting everything the controller reports
#[derive(Clone, Default)]
pub struct SimSink {
    events: Rc<RefCell<Vec<StatusEvent>>>,
    phases: Rc<RefCell<Vec<CyclePhase>>>,
}

impl SimSink {
    pub fn events(&self) -> Vec<StatusEvent> {
        self.events.borrow().clone()
    }

    pub fn kinds(&self) -> Vec<crate::status::StatusKind> {
        self.events.borrow().iter().map(|e| e.kind).collect()
    }

    pub fn phases(&self) -> Vec<CyclePhase> {
        self.phases.borrow().clone()
    }
}

impl StatusSink for SimSink {
    fn publish(&mut self, event: &StatusEvent) {
        self.events.borrow_mut().push(*event);
    }

    fn phase_changed(&mut self, phase: CyclePhase) {
        self.phases.borrow_mut().push(phase);
    }
}

/// Stop request that fires at a virtual time
pub struct StopAt {
    clock: SimClock,
    at_us: Option<u64>,
}

impl StopAt {
    pub fn never(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            at_us: None,
        }
    }

    pub fn at_ms(clock: &SimClock, ms: u64) -> Self {
        Self {
            clock: clock.clone(),
            at_us: Some(ms * 1000),
        }
    }
}

impl StopRequest for StopAt {
    fn stop_requested(&self) -> bool {
        self.at_us.is_some_and(|at| self.clock.now_us() >= at)
    }
}

pub struct SimBoard;

impl Board for SimBoard {
    type Clock = SimClock;
    type Trigger = ScriptedInput;
    type Motion = ScriptedInput;
    type Range = SimRange;
    type Lock = SimLock;
    type Coils = SimCoils;
    type Belt = SimBelt;
    type Indicator = SimLamp;
}

/// Handles a test keeps after the controller takes the hardware
pub struct Rig {
    pub clock: SimClock,
    pub journal: Journal,
    pub sink: SimSink,
    pub range_a: Rc<Cell<Reading>>,
    pub range_b: Rc<Cell<Reading>>,
    pub measurements: Rc<Cell<u32>>,
}

/// Build a controller on simulated hardware
///
/// `trigger` and `motion` give the input levels as functions of virtual
/// time in milliseconds.
pub fn rig(
    config: MachineConfig,
    trigger: impl Fn(u64) -> bool + 'static,
    motion: impl Fn(u64) -> bool + 'static,
    a: Reading,
    b: Reading,
) -> (DonationCycle<SimBoard, SimSink>, Rig) {
    let clock = SimClock::new();
    let journal = Journal::new(&clock);
    let sink = SimSink::default();
    let range_a = Rc::new(Cell::new(a));
    let range_b = Rc::new(Cell::new(b));
    let measurements = Rc::new(Cell::new(0));

    let peripherals: Peripherals<SimBoard> = Peripherals {
        clock: clock.clone(),
        trigger: ScriptedInput::new(&clock, trigger),
        motion: ScriptedInput::new(&clock, motion),
        range_a: SimRange {
            reading: range_a.clone(),
            measurements: measurements.clone(),
        },
        range_b: SimRange {
            reading: range_b.clone(),
            measurements: measurements.clone(),
        },
        lock: SimLock::new(&journal),
        door_a: SimCoils::new(Door::A, &journal),
        door_b: SimCoils::new(Door::B, &journal),
        belt: SimBelt::new(&journal),
        indicator: SimLamp {
            journal: journal.clone(),
        },
    };

    let cycle = DonationCycle::new(peripherals, config, sink.clone());
    (
        cycle,
        Rig {
            clock,
            journal,
            sink,
            range_a,
            range_b,
            measurements,
        },
    )
}
