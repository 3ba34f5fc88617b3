//! Almonry - Donation Intake Controller Firmware
//!
//! Main firmware binary for RP2040-based donation boxes. A donor presses
//! the button, the rangers check something was put in, the PIR checks
//! nobody is reaching in, and only then do the doors open and the belt
//! carry the donation away.
//!
//! Core 1 runs the donation cycle with blocking delays and nothing else.
//! Core 0 runs the status observer, the viewer link and the service switch.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{Executor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use almonry_hal_rp2040::pwm::{PwmChannel, ServoPwm};

use crate::board::BoardPins;

mod board;
mod channels;
mod config;
mod sink;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
// TX is sized for a burst of log entries
static TX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

static CORE1_STACK: StaticCell<Stack<8192>> = StaticCell::new();
static CORE1_EXECUTOR: StaticCell<Executor> = StaticCell::new();

/// Main entry point (core 0)
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Almonry firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();
    info!(
        "Thresholds A {} / B {} hundredths cm, motion window {} ms",
        config.detection.sensor_a.hundredths(),
        config.detection.sensor_b.hundredths(),
        config.motion.window_ms
    );

    // Setup UART for the status viewer (115200 baud default)
    let tx_buf = TX_BUF.init([0u8; 1024]);
    let rx_buf = RX_BUF.init([0u8; 64]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized for status viewer");

    let servo = ServoPwm::new(
        Pwm::new_output_a(p.PWM_SLICE6, p.PIN_12, Default::default()),
        PwmChannel::A,
    );

    let pins = BoardPins {
        trigger: p.PIN_2.into(),
        motion: p.PIN_3.into(),
        range_a: [p.PIN_4.into(), p.PIN_5.into()],
        range_b: [p.PIN_6.into(), p.PIN_7.into()],
        lock: [p.PIN_8.into(), p.PIN_9.into(), p.PIN_10.into(), p.PIN_11.into()],
        lamp: [p.PIN_13.into(), p.PIN_14.into(), p.PIN_15.into()],
        door_a: [p.PIN_16.into(), p.PIN_17.into(), p.PIN_18.into(), p.PIN_19.into()],
        door_b: [p.PIN_20.into(), p.PIN_21.into(), p.PIN_22.into(), p.PIN_26.into()],
        belt: p.PIN_27.into(),
    };
    let peripherals = board::assemble(pins, servo, &config);
    let service_switch = Input::new(p.PIN_28, Pull::Up);
    info!("Drivers assembled, outputs safe");

    // Observer side first so the start-up events have somewhere to go
    spawner
        .spawn(tasks::status_task(config.status))
        .unwrap();
    spawner.spawn(tasks::viewer_rx_task(rx)).unwrap();
    spawner.spawn(tasks::viewer_tx_task(tx)).unwrap();
    spawner.spawn(tasks::shutdown_task(service_switch)).unwrap();

    spawn_core1(p.CORE1, CORE1_STACK.init(Stack::new()), move || {
        let executor = CORE1_EXECUTOR.init(Executor::new());
        executor.run(|spawner| {
            spawner
                .spawn(tasks::control_task(peripherals, config))
                .unwrap();
        })
    });

    info!("All tasks spawned, firmware running");
}
