//! Mock pins and clocks shared by the driver tests

use std::boxed::Box;
use std::cell::Cell;
use std::rc::Rc;

use almonry_hal::{Clock, InputPin, OutputPin, PwmOutput};

/// Output pin whose level the test can watch through a clone
#[derive(Clone, Default)]
pub struct MockPin {
    high: Rc<Cell<bool>>,
    writes: Rc<Cell<u32>>,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn high(&self) -> bool {
        self.high.get()
    }

    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.high.set(true);
        self.writes.set(self.writes.get() + 1);
    }

    fn set_low(&mut self) {
        self.high.set(false);
        self.writes.set(self.writes.get() + 1);
    }

    fn is_set_high(&self) -> bool {
        self.high.get()
    }
}

/// PWM channel recording the last duty
#[derive(Clone, Default)]
pub struct MockPwm {
    duty: Rc<Cell<u16>>,
}

impl MockPwm {
    pub fn duty(&self) -> u16 {
        self.duty.get()
    }
}

impl PwmOutput for MockPwm {
    fn set_duty_permille(&mut self, permille: u16) {
        self.duty.set(permille.min(1000));
    }
}

/// Clock that moves forward a fixed amount on every read
///
/// Busy-wait loops in the drivers make progress without a real timer.
#[derive(Clone)]
pub struct TickClock {
    now_us: Rc<Cell<u64>>,
    tick_us: u64,
}

impl TickClock {
    pub fn new(tick_us: u64) -> Self {
        Self {
            now_us: Rc::default(),
            tick_us,
        }
    }

    pub fn peek_us(&self) -> u64 {
        self.now_us.get()
    }
}

impl Clock for TickClock {
    fn now_us(&self) -> u64 {
        let now = self.now_us.get();
        self.now_us.set(now + self.tick_us);
        now
    }

    fn delay_us(&self, us: u32) {
        self.now_us.set(self.now_us.get() + us as u64);
    }
}

/// Input whose level is a function of the clock
pub struct ScriptedPin {
    clock: TickClock,
    level: Box<dyn Fn(u64) -> bool>,
}

impl ScriptedPin {
    pub fn new(clock: &TickClock, level: impl Fn(u64) -> bool + 'static) -> Self {
        Self {
            clock: clock.clone(),
            level: Box::new(level),
        }
    }
}

impl InputPin for ScriptedPin {
    fn is_high(&self) -> bool {
        (self.level)(self.clock.peek_us())
    }
}
