// CLASSIFICATION: COMMUNITY
// Filename: lifecycle.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-08-02

//! Session lifecycle: power programs land in order, failures are
//! tolerated, and shutdown leaves every device dark.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use sensefs::bus::MemBus;
use sensefs::drivers::{hts221, led2472g, lps25h, lsm9ds1_ag, lsm9ds1_mag};
use sensefs::session::{Session, SessionState};

#[test]
fn start_programs_every_device() {
    let bus = MemBus::new();
    let mut session = Session::new(Arc::new(bus.clone()));
    session.on_start();

    assert_eq!(
        bus.journal(lps25h::ADDR),
        vec![(0x20, 0x90), (0x21, 0x80)],
        "barometer program"
    );
    assert_eq!(
        bus.journal(hts221::ADDR),
        vec![(0x10, 0x1B), (0x20, 0x81), (0x21, 0x81)],
        "hygrometer program"
    );
    assert_eq!(
        bus.journal(lsm9ds1_mag::ADDR),
        vec![(0x20, 0x50), (0x21, 0x00), (0x22, 0x00), (0x23, 0x08)],
        "magnetometer program"
    );
    assert_eq!(
        bus.journal(lsm9ds1_ag::ADDR),
        vec![(0x20, 0x60), (0x10, 0x68), (0x1E, 0x38)],
        "imu program"
    );
    let clears = bus.blocks(led2472g::ADDR);
    assert_eq!(clears.len(), 1, "one clear on power up");
    assert_eq!(clears[0], vec![0u8; 193]);
}

#[test]
fn stop_zeroes_control_registers_and_clears_the_panel() {
    let bus = MemBus::new();
    let mut session = Session::new(Arc::new(bus.clone()));
    session.on_start();
    session.on_stop();

    assert_eq!(bus.journal(lps25h::ADDR).last(), Some(&(0x20, 0x00)));
    assert_eq!(bus.journal(hts221::ADDR).last(), Some(&(0x20, 0x00)));
    assert_eq!(bus.journal(lsm9ds1_mag::ADDR).last(), Some(&(0x22, 0x03)));
    assert_eq!(bus.journal(lsm9ds1_ag::ADDR).last(), Some(&(0x20, 0x00)));
    assert_eq!(bus.blocks(led2472g::ADDR).len(), 2, "second clear on stop");

    assert_eq!(session.state(), SessionState::Stopped);
    assert!(session.shutdown_signal().load(Ordering::SeqCst));
}

#[test]
fn failed_power_up_does_not_abort_the_pass() {
    let bus = MemBus::new();
    bus.set_absent(lps25h::ADDR);
    let mut session = Session::new(Arc::new(bus.clone()));
    session.on_start();

    assert_eq!(session.state(), SessionState::Running);
    assert!(bus.journal(lps25h::ADDR).is_empty(), "dead device untouched");
    assert!(
        !bus.journal(hts221::ADDR).is_empty(),
        "later devices still programmed"
    );
    assert_eq!(bus.blocks(led2472g::ADDR).len(), 1);
}

#[test]
fn calibration_is_seeded_during_start() {
    let bus = MemBus::new();
    bus.set_reg(hts221::ADDR, 0x30, 40);
    bus.set_reg(hts221::ADDR, 0x31, 160);
    bus.set_reg(hts221::ADDR, 0x3A, 0x10);
    let mut session = Session::new(Arc::new(bus.clone()));
    session.on_start();

    // raw 0 sits exactly on reference point 0
    let humid = sensefs::registry::lookup("humid").expect("humid");
    assert_eq!(session.read_node(humid).expect("humid"), "20.0\n");
}
