// CLASSIFICATION: COMMUNITY
// Filename: lib.rs v0.4
// Author: Lukas Bower
// Date Modified: 2026-08-02

//! Root library for the sensefs file server.
//
// ─────────────────────────────────────────────────────────────────────────────
// sensefs – Sense HAT sensor cluster as a 9P file tree
//
// The Raspberry Pi Sense HAT carries five I²C devices:
//
//   LPS25H      0x5c    barometric pressure / temperature
//   HTS221      0x5f    relative humidity / temperature
//   LSM9DS1-M   0x1c    magnetometer
//   LSM9DS1-AG  0x6a    gyroscope / accelerometer
//   LED2472G    0x46    8×8 LED matrix
//
// Each sensor is published as a leaf node under a single `sense` directory.
// Reading a node samples the device and returns newline-terminated text;
// writing the `led` node pushes a raw 192-byte framebuffer to the matrix.
// The 9P wire protocol itself is owned by the `ninep` crate; this library
// supplies the node registry, the per-device register discipline, the
// humidity calibration math, and the power-up/power-down lifecycle.
//
// # Public Surface
// * [`bus`]      – register transport seam (`DevBus` for hardware, `MemBus`
//                  for the test suites)
// * [`drivers`]  – one driver per physical device
// * [`registry`] – static node table and lookup
// * [`session`]  – lifecycle controller and request dispatch
// * [`server`]   – `Serve9p` adapter binding the tree to the protocol engine
// ─────────────────────────────────────────────────────────────────────────────

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Register transport traits and implementations.
pub mod bus;

/// HTS221 factory calibration table and unit conversion.
pub mod cal;

/// Runtime configuration knobs.
pub mod config;

/// Per-device sensor drivers.
pub mod drivers;

/// Error taxonomy shared by drivers and dispatch.
pub mod error;

/// Static virtual-file registry.
pub mod registry;

/// 9P adapter and server wrapper.
pub mod server;

/// Device session lifecycle and node dispatch.
pub mod session;
