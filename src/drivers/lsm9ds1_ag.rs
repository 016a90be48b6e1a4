// CLASSIFICATION: COMMUNITY
// Filename: lsm9ds1_ag.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-07-27

//! LSM9DS1 gyroscope / accelerometer driver (the 0x6a half of the part).
//!
//! One bus address, two sensors: the accelerometer output block sits at
//! 0x28–0x2D and the gyroscope block at 0x18–0x1D. Both publish as
//! independent nodes.

use std::sync::Arc;

use log::debug;

use crate::bus::{RegisterBus, RegisterChannel};
use crate::drivers::{open_err, read_vector, Device};
use crate::error::Result;

/// Bus address of the accel/gyro die.
pub const ADDR: u8 = 0x6a;

/// Combined gyroscope / accelerometer.
pub struct Lsm9ds1Ag {
    bus: Arc<dyn RegisterBus>,
}

impl Lsm9ds1Ag {
    /// Driver over the shared register bus.
    pub fn new(bus: Arc<dyn RegisterBus>) -> Self {
        Self { bus }
    }

    fn channel(&self) -> Result<Box<dyn RegisterChannel>> {
        self.bus.open(ADDR).map_err(open_err("lsm9gyac"))
    }

    /// Sample the acceleration vector, raw signed counts per axis.
    pub fn sample_accel(&self) -> Result<String> {
        let mut ch = self.channel()?;
        read_vector(ch.as_mut(), 0x28)
    }

    /// Sample the angular rate vector, raw signed counts per axis.
    pub fn sample_gyro(&self) -> Result<String> {
        let mut ch = self.channel()?;
        read_vector(ch.as_mut(), 0x18)
    }
}

impl Device for Lsm9ds1Ag {
    fn name(&self) -> &'static str {
        "lsm9gyac"
    }

    fn power_up(&mut self) -> Result<()> {
        let mut ch = self.channel()?;
        // ctrl_reg6_xl: accelerometer 119 Hz
        ch.write_reg(0x20, 0x60)?;
        // ctrl_reg1_g: gyro 119 Hz, 500 dps, default bandwidth
        ch.write_reg(0x10, 0x68)?;
        // ctrl_reg4: enable gyro x, y, z
        ch.write_reg(0x1E, 0x38)?;
        debug!("lsm9gyac powered up");
        Ok(())
    }

    fn power_down(&mut self) -> Result<()> {
        let mut ch = self.channel()?;
        ch.write_reg(0x20, 0x00)?;
        debug!("lsm9gyac powered down");
        Ok(())
    }
}
