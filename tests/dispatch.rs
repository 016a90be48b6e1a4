// CLASSIFICATION: COMMUNITY
// Filename: dispatch.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-08-02

//! End-to-end dispatch over the in-memory bus: every node serves its
//! documented payload, wrong-direction and short-frame requests are
//! refused, and one dead device never takes the rest of the tree down.

use std::sync::Arc;

use sensefs::bus::MemBus;
use sensefs::drivers::{hts221, led2472g, lps25h};
use sensefs::error::DeviceError;
use sensefs::registry::{lookup, nodes};
use sensefs::session::Session;

/// Seed every sensor with a known register image.
fn seed(bus: &MemBus) {
    // barometer: raw temp 96 -> 42.7 C, raw pressure 0x020000 -> 32 hPa
    bus.set_reg(lps25h::ADDR, 0x2B, 0x60);
    bus.set_reg(lps25h::ADDR, 0x2A, 0x02);

    // hygrometer calibration: 20-80 %RH over 0-6000, 10-30 C over 0-4000
    bus.set_reg(hts221::ADDR, 0x30, 40);
    bus.set_reg(hts221::ADDR, 0x31, 160);
    bus.set_reg(hts221::ADDR, 0x32, 80);
    bus.set_reg(hts221::ADDR, 0x33, 240);
    bus.set_reg(hts221::ADDR, 0x3A, 0x70);
    bus.set_reg(hts221::ADDR, 0x3B, 0x17);
    bus.set_reg(hts221::ADDR, 0x3E, 0xA0);
    bus.set_reg(hts221::ADDR, 0x3F, 0x0F);
    // raw humidity 1500 -> 35.0, raw temp 3000 -> 25.0
    bus.set_reg(hts221::ADDR, 0x28, 0xDC);
    bus.set_reg(hts221::ADDR, 0x29, 0x05);
    bus.set_reg(hts221::ADDR, 0x2A, 0xB8);
    bus.set_reg(hts221::ADDR, 0x2B, 0x0B);

    // magnetometer x=-2, accel y=3, gyro z=-256
    bus.set_reg(0x1c, 0x28, 0xFE);
    bus.set_reg(0x1c, 0x29, 0xFF);
    bus.set_reg(0x6a, 0x2A, 0x03);
    bus.set_reg(0x6a, 0x1D, 0xFF);
}

fn running(bus: &MemBus) -> Session {
    let mut session = Session::new(Arc::new(bus.clone()));
    session.on_start();
    session
}

#[test]
fn every_read_node_serves_its_documented_format() {
    let bus = MemBus::new();
    seed(&bus);
    let session = running(&bus);

    let expect = [
        ("tempp", "42.7\n"),
        ("press", "32\n"),
        ("temph", "25.0\n"),
        ("humid", "35.0\n"),
        ("accel", "0 3 0\n"),
        ("gyro", "0 0 -256\n"),
        ("mag", "-2 0 0\n"),
    ];
    for (name, want) in expect {
        let entry = lookup(name).unwrap_or_else(|| panic!("missing node {name}"));
        let got = session
            .read_node(entry)
            .unwrap_or_else(|e| panic!("read {name} failed: {e}"));
        assert_eq!(got, want, "payload for {name}");
    }
}

#[test]
fn reads_are_sampled_fresh_per_request() {
    let bus = MemBus::new();
    seed(&bus);
    let session = running(&bus);
    let entry = lookup("press").expect("press");
    assert_eq!(session.read_node(entry).expect("first"), "32\n");
    bus.set_reg(lps25h::ADDR, 0x2A, 0x04);
    assert_eq!(session.read_node(entry).expect("second"), "64\n");
}

#[test]
fn wrong_direction_never_reaches_a_driver() {
    let bus = MemBus::new();
    seed(&bus);
    let session = running(&bus);

    for entry in nodes() {
        match entry.name {
            "led" => assert!(matches!(
                session.read_node(entry),
                Err(DeviceError::Unsupported(_))
            )),
            _ => assert!(matches!(
                session.write_node(entry, &[0u8; 192]),
                Err(DeviceError::Unsupported(_))
            )),
        }
    }
    // only the power-up clear ever reached the LED
    assert_eq!(bus.blocks(led2472g::ADDR).len(), 1);
}

#[test]
fn led_frame_must_be_exactly_192_bytes() {
    let bus = MemBus::new();
    let session = running(&bus);
    let led = lookup("led").expect("led");

    let clears = bus.blocks(led2472g::ADDR).len();
    for bad in [0usize, 1, 191, 193, 384] {
        let err = session
            .write_node(led, &vec![0xAAu8; bad])
            .expect_err("oversize or undersize frame must fail");
        assert!(matches!(err, DeviceError::FrameSize { expected: 192, .. }));
    }
    assert_eq!(bus.blocks(led2472g::ADDR).len(), clears, "bus untouched");

    let frame: Vec<u8> = (0..192u8).collect();
    session.write_node(led, &frame).expect("exact frame");
    assert_eq!(bus.blocks(led2472g::ADDR).last(), Some(&frame));
}

#[test]
fn dead_device_is_isolated_to_its_own_nodes() {
    let bus = MemBus::new();
    seed(&bus);
    bus.set_absent(hts221::ADDR);
    let session = running(&bus);

    for name in ["temph", "humid"] {
        let err = session
            .read_node(lookup(name).expect(name))
            .expect_err("absent device must fail");
        assert!(matches!(err, DeviceError::Open("hts221", _)), "{name}: {err}");
    }
    for name in ["tempp", "press", "accel", "gyro", "mag"] {
        assert!(
            session.read_node(lookup(name).expect(name)).is_ok(),
            "{name} must keep serving"
        );
    }
    assert!(
        session
            .write_node(lookup("led").expect("led"), &[0u8; 192])
            .is_ok(),
        "led must keep serving"
    );
}
