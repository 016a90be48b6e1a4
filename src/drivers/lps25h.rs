// CLASSIFICATION: COMMUNITY
// Filename: lps25h.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-08-01

//! LPS25H barometric pressure / temperature driver.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::debug;

use crate::bus::{RegisterBus, RegisterChannel};
use crate::drivers::{open_err, read_s16, Device};
use crate::error::Result;

/// Bus address of the LPS25H.
pub const ADDR: u8 = 0x5c;

/// Wait after boot before the first conversion is trustworthy. Until one
/// cycle completes the part reports its reset defaults (42.5 °C, 760 hPa).
const SETTLE: Duration = Duration::from_millis(100);

/// Barometric pressure / temperature sensor.
pub struct Lps25h {
    bus: Arc<dyn RegisterBus>,
}

impl Lps25h {
    /// Driver over the shared register bus.
    pub fn new(bus: Arc<dyn RegisterBus>) -> Self {
        Self { bus }
    }

    fn channel(&self) -> Result<Box<dyn RegisterChannel>> {
        self.bus.open(ADDR).map_err(open_err("lps25h"))
    }

    /// Sample the temperature output, tenths of a degree C.
    pub fn sample_temperature(&self) -> Result<String> {
        let mut ch = self.channel()?;
        let raw = read_s16(ch.as_mut(), 0x2B, 0x2C)?;
        let t = 425 + raw / 48;
        Ok(format!("{}.{}\n", t / 10, t % 10))
    }

    /// Sample the pressure output, integer hPa.
    pub fn sample_pressure(&self) -> Result<String> {
        let mut ch = self.channel()?;
        let xl = ch.read_reg(0x28)? as u32;
        let low = ch.read_reg(0x29)? as u32;
        let high = ch.read_reg(0x2A)? as u32;
        let press = (xl | (low << 8) | (high << 16)) / 4096;
        Ok(format!("{}\n", press))
    }
}

impl Device for Lps25h {
    fn name(&self) -> &'static str {
        "lps25h"
    }

    fn power_up(&mut self) -> Result<()> {
        let mut ch = self.channel()?;
        // ctrl_reg1: power on, 1 Hz
        ch.write_reg(0x20, 0x90)?;
        // ctrl_reg2: boot
        ch.write_reg(0x21, 0x80)?;
        drop(ch);
        thread::sleep(SETTLE);
        debug!("lps25h powered up");
        Ok(())
    }

    fn power_down(&mut self) -> Result<()> {
        let mut ch = self.channel()?;
        ch.write_reg(0x20, 0x00)?;
        debug!("lps25h powered down");
        Ok(())
    }
}
