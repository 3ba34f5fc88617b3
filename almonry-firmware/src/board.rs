//! Pin map and driver assembly for the donation box controller board
//!
//! | Function            | GPIO            |
//! |---------------------|-----------------|
//! | Viewer UART TX / RX | 0 / 1           |
//! | Donate button       | 2 (pull-down)   |
//! | PIR                 | 3               |
//! | Ranger A TRIG/ECHO  | 4 / 5           |
//! | Ranger B TRIG/ECHO  | 6 / 7           |
//! | Lock bridge 1 IN1/2 | 8 / 9           |
//! | Lock bridge 2 IN1/2 | 10 / 11         |
//! | Lock flag servo     | 12 (PWM6 A)     |
//! | Lamp green/white/red| 13 / 14 / 15    |
//! | Door A coils        | 16, 17, 18, 19  |
//! | Door B coils        | 20, 21, 22, 26  |
//! | Belt relay          | 27              |
//! | Service switch      | 28 (pull-up)    |
//!
//! The ranger ECHO lines are 5 V and go through dividers on the board.

use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use embassy_rp::Peri;

use almonry_core::config::MachineConfig;
use almonry_core::cycle::{Board, Peripherals};
use almonry_drivers::actuator::{
    relay, FourWireCoils, HBridgeChannel, HobbyServo, Relay, SolenoidLock,
};
use almonry_drivers::compat::{EhInput, EhOutput};
use almonry_drivers::indicator::StackLamp;
use almonry_drivers::sensor::HcSr04;
use almonry_hal_rp2040::{EmbassyClock, ServoPwm};

pub type Out = EhOutput<Output<'static>>;
pub type In = EhInput<Input<'static>>;

/// Driver types of this board
pub struct DonationBoard;

impl Board for DonationBoard {
    type Clock = EmbassyClock;
    type Trigger = In;
    type Motion = In;
    type Range = HcSr04<Out, In, EmbassyClock>;
    type Lock = SolenoidLock<Out, ServoPwm<'static>, 2>;
    type Coils = FourWireCoils<Out>;
    type Belt = Relay<Out>;
    type Indicator = StackLamp<Out>;
}

/// GPIOs handed to the control core
pub struct BoardPins {
    pub trigger: Peri<'static, AnyPin>,
    pub motion: Peri<'static, AnyPin>,
    pub range_a: [Peri<'static, AnyPin>; 2],
    pub range_b: [Peri<'static, AnyPin>; 2],
    pub lock: [Peri<'static, AnyPin>; 4],
    pub lamp: [Peri<'static, AnyPin>; 3],
    pub door_a: [Peri<'static, AnyPin>; 4],
    pub door_b: [Peri<'static, AnyPin>; 4],
    pub belt: Peri<'static, AnyPin>,
}

fn output(pin: Peri<'static, AnyPin>) -> Out {
    output_at(pin, false)
}

fn output_at(pin: Peri<'static, AnyPin>, high: bool) -> Out {
    let level = if high { Level::High } else { Level::Low };
    EhOutput::new(Output::new(pin, level), high)
}

fn input(pin: Peri<'static, AnyPin>, pull: Pull) -> In {
    EhInput::new(Input::new(pin, pull))
}

/// Build every driver the controller owns, outputs in their safe state
pub fn assemble(
    pins: BoardPins,
    servo: ServoPwm<'static>,
    config: &MachineConfig,
) -> Peripherals<DonationBoard> {
    let clock = EmbassyClock;
    let BoardPins {
        trigger,
        motion,
        range_a,
        range_b,
        lock,
        lamp,
        door_a,
        door_b,
        belt,
    } = pins;

    let [a_trig, a_echo] = range_a;
    let [b_trig, b_echo] = range_b;
    let [l1a, l1b, l2a, l2b] = lock;
    let [green, white, red] = lamp;

    Peripherals {
        clock,
        trigger: input(trigger, Pull::Down),
        motion: input(motion, Pull::None),
        range_a: HcSr04::new(output(a_trig), input(a_echo, Pull::None), clock, config.echo),
        range_b: HcSr04::new(output(b_trig), input(b_echo, Pull::None), clock, config.echo),
        lock: SolenoidLock::new(
            [
                HBridgeChannel::new(output(l1a), output(l1b)),
                HBridgeChannel::new(output(l2a), output(l2b)),
            ],
            HobbyServo::new(servo),
        ),
        door_a: FourWireCoils::new(door_a.map(output)),
        door_b: FourWireCoils::new(door_b.map(output)),
        belt: Relay::new(
            output_at(belt, relay::idle_high(config.belt.active_low)),
            config.belt.active_low,
        ),
        indicator: StackLamp::new(output(green), output(white), output(red)),
    }
}
