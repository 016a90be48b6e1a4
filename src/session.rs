// CLASSIFICATION: COMMUNITY
// Filename: session.rs v0.4
// Author: Lukas Bower
// Date Modified: 2026-08-02

//! Device session lifecycle and node dispatch.
//!
//! The session owns all five drivers. `on_start` powers them up in a
//! fixed order before the namespace is published; a driver that fails
//! stays down and its nodes report the failure per request, the rest of
//! the tree keeps serving. `on_stop` powers everything down best-effort
//! and raises the shutdown flag the serving binary waits on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};

use crate::bus::RegisterBus;
use crate::drivers::{Device, Hts221, Led2472g, Lps25h, Lsm9ds1Ag, Lsm9ds1Mag};
use crate::error::{DeviceError, Result};
use crate::registry::{Access, NodeEntry, NodeKind};

/// Lifecycle states of the device session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No devices powered.
    Stopped,
    /// Power-up pass in progress.
    Starting,
    /// Namespace is live.
    Running,
    /// Power-down pass in progress.
    Stopping,
}

/// Owner of the drivers and the dispatch target for every request.
pub struct Session {
    state: SessionState,
    lps25h: Lps25h,
    hts221: Hts221,
    mag: Lsm9ds1Mag,
    imu: Lsm9ds1Ag,
    led: Led2472g,
    shutdown: Arc<AtomicBool>,
}

impl Session {
    /// Build a stopped session with every driver on the given bus.
    pub fn new(bus: Arc<dyn RegisterBus>) -> Self {
        Self {
            state: SessionState::Stopped,
            lps25h: Lps25h::new(Arc::clone(&bus)),
            hts221: Hts221::new(Arc::clone(&bus)),
            mag: Lsm9ds1Mag::new(Arc::clone(&bus)),
            imu: Lsm9ds1Ag::new(Arc::clone(&bus)),
            led: Led2472g::new(bus),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Flag raised once `on_stop` has completed.
    pub fn shutdown_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    fn drivers(&mut self) -> [&mut dyn Device; 5] {
        [
            &mut self.lps25h,
            &mut self.hts221,
            &mut self.mag,
            &mut self.imu,
            &mut self.led,
        ]
    }

    /// Power up every driver in order. Individual failures are logged
    /// and do not stop the pass; the affected node fails per request.
    pub fn on_start(&mut self) {
        self.state = SessionState::Starting;
        for dev in self.drivers() {
            if let Err(e) = dev.power_up() {
                warn!("power up {}: {}", dev.name(), e);
            }
        }
        self.state = SessionState::Running;
        info!("device session running");
    }

    /// Power down every driver in order, best-effort, then raise the
    /// shutdown flag.
    pub fn on_stop(&mut self) {
        self.state = SessionState::Stopping;
        for dev in self.drivers() {
            if let Err(e) = dev.power_down() {
                warn!("power down {}: {}", dev.name(), e);
            }
        }
        self.state = SessionState::Stopped;
        self.shutdown.store(true, Ordering::SeqCst);
        info!("device session stopped");
    }

    /// Serve a read against a registry entry: sample the backing device
    /// and return the formatted text.
    pub fn read_node(&self, entry: &NodeEntry) -> Result<String> {
        if entry.access != Access::Read {
            return Err(DeviceError::Unsupported(format!(
                "{} is write-only",
                entry.name
            )));
        }
        match entry.kind {
            NodeKind::PressureTemperature => self.lps25h.sample_temperature(),
            NodeKind::Pressure => self.lps25h.sample_pressure(),
            NodeKind::HumidityTemperature => self.hts221.sample_temperature(),
            NodeKind::Humidity => self.hts221.sample_humidity(),
            NodeKind::Accelerometer => self.imu.sample_accel(),
            NodeKind::Gyroscope => self.imu.sample_gyro(),
            NodeKind::Magnetometer => self.mag.sample_vector(),
            NodeKind::LedFrame => Err(DeviceError::Unsupported(format!(
                "{} is write-only",
                entry.name
            ))),
        }
    }

    /// Serve a write against a registry entry.
    pub fn write_node(&self, entry: &NodeEntry, data: &[u8]) -> Result<()> {
        if entry.access != Access::Write {
            return Err(DeviceError::Unsupported(format!(
                "{} is read-only",
                entry.name
            )));
        }
        match entry.kind {
            NodeKind::LedFrame => self.led.blit(data),
            _ => Err(DeviceError::Unsupported(format!(
                "{} is read-only",
                entry.name
            ))),
        }
    }
}
