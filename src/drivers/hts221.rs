// CLASSIFICATION: COMMUNITY
// Filename: hts221.rs v0.4
// Author: Lukas Bower
// Date Modified: 2026-08-01

//! HTS221 relative humidity / temperature driver.
//!
//! The raw outputs are meaningless without the part's factory calibration
//! table, so power-up reads it right after programming the control
//! registers. The table lives inside the driver; until it is populated
//! every conversion fails rather than reporting garbage.

use std::sync::Arc;

use log::debug;

use crate::bus::{RegisterBus, RegisterChannel};
use crate::cal::CalTable;
use crate::drivers::{open_err, read_s16, Device};
use crate::error::{DeviceError, Result};

/// Bus address of the HTS221.
pub const ADDR: u8 = 0x5f;

/// Humidity / temperature sensor with its calibration state.
pub struct Hts221 {
    bus: Arc<dyn RegisterBus>,
    cal: Option<CalTable>,
}

impl Hts221 {
    /// Driver over the shared register bus; calibration unpopulated.
    pub fn new(bus: Arc<dyn RegisterBus>) -> Self {
        Self { bus, cal: None }
    }

    fn channel(&self) -> Result<Box<dyn RegisterChannel>> {
        self.bus.open(ADDR).map_err(open_err("hts221"))
    }

    fn cal(&self) -> Result<&CalTable> {
        self.cal.as_ref().ok_or(DeviceError::CalibrationMissing)
    }

    /// Calibration constants, once power-up has populated them.
    pub fn calibration(&self) -> Option<&CalTable> {
        self.cal.as_ref()
    }

    /// Sample relative humidity, one decimal, percent RH.
    pub fn sample_humidity(&self) -> Result<String> {
        let mut ch = self.channel()?;
        let raw = read_s16(ch.as_mut(), 0x28, 0x29)?;
        let rh = self.cal()?.humidity(raw)?;
        Ok(format!("{:.1}\n", rh))
    }

    /// Sample temperature, one decimal, degrees C.
    pub fn sample_temperature(&self) -> Result<String> {
        let mut ch = self.channel()?;
        let raw = read_s16(ch.as_mut(), 0x2A, 0x2B)?;
        let t = self.cal()?.temperature(raw)?;
        Ok(format!("{:.1}\n", t))
    }
}

impl Device for Hts221 {
    fn name(&self) -> &'static str {
        "hts221"
    }

    fn power_up(&mut self) -> Result<()> {
        let mut ch = self.channel()?;
        // av_conf: 16-sample temperature / 32-sample humidity averaging
        ch.write_reg(0x10, 0x1B)?;
        // ctrl_reg1: power up, 1 Hz
        ch.write_reg(0x20, 0x81)?;
        // ctrl_reg2: boot, enable one-shot
        ch.write_reg(0x21, 0x81)?;
        self.cal = Some(CalTable::read_from(ch.as_mut())?);
        debug!("hts221 powered up, calibration loaded");
        Ok(())
    }

    fn power_down(&mut self) -> Result<()> {
        let mut ch = self.channel()?;
        ch.write_reg(0x20, 0x00)?;
        debug!("hts221 powered down");
        Ok(())
    }
}
