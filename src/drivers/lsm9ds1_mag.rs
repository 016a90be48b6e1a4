// CLASSIFICATION: COMMUNITY
// Filename: lsm9ds1_mag.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-07-27

//! LSM9DS1 magnetometer driver (the 0x1c half of the part).

use std::sync::Arc;

use log::debug;

use crate::bus::{RegisterBus, RegisterChannel};
use crate::drivers::{open_err, read_vector, Device};
use crate::error::Result;

/// Bus address of the magnetometer die.
pub const ADDR: u8 = 0x1c;

/// Three-axis magnetometer.
pub struct Lsm9ds1Mag {
    bus: Arc<dyn RegisterBus>,
}

impl Lsm9ds1Mag {
    /// Driver over the shared register bus.
    pub fn new(bus: Arc<dyn RegisterBus>) -> Self {
        Self { bus }
    }

    fn channel(&self) -> Result<Box<dyn RegisterChannel>> {
        self.bus.open(ADDR).map_err(open_err("lsm9mag"))
    }

    /// Sample the field vector, raw signed counts per axis.
    pub fn sample_vector(&self) -> Result<String> {
        let mut ch = self.channel()?;
        read_vector(ch.as_mut(), 0x28)
    }
}

impl Device for Lsm9ds1Mag {
    fn name(&self) -> &'static str {
        "lsm9mag"
    }

    fn power_up(&mut self) -> Result<()> {
        let mut ch = self.channel()?;
        // ctrl_reg1_m: high performance XY, 10 Hz
        ch.write_reg(0x20, 0x50)?;
        // ctrl_reg2_m: default scale
        ch.write_reg(0x21, 0x00)?;
        // ctrl_reg3_m: power on, continuous conversion
        ch.write_reg(0x22, 0x00)?;
        // ctrl_reg4_m: high performance Z
        ch.write_reg(0x23, 0x08)?;
        debug!("lsm9mag powered up");
        Ok(())
    }

    fn power_down(&mut self) -> Result<()> {
        let mut ch = self.channel()?;
        ch.write_reg(0x22, 0x03)?;
        debug!("lsm9mag powered down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MemBus;

    #[test]
    fn vector_reads_three_signed_axes() {
        let bus = MemBus::new();
        bus.set_reg(ADDR, 0x28, 0x01); // x = 1
        bus.set_reg(ADDR, 0x2A, 0xFF); // y = -1
        bus.set_reg(ADDR, 0x2B, 0xFF);
        bus.set_reg(ADDR, 0x2D, 0x02); // z = 512
        let dev = Lsm9ds1Mag::new(Arc::new(bus.clone()));
        assert_eq!(dev.sample_vector().expect("mag"), "1 -1 512\n");
    }

    #[test]
    fn power_cycle_register_program() {
        let bus = MemBus::new();
        let mut dev = Lsm9ds1Mag::new(Arc::new(bus.clone()));
        dev.power_up().expect("up");
        dev.power_down().expect("down");
        assert_eq!(
            bus.journal(ADDR),
            vec![
                (0x20, 0x50),
                (0x21, 0x00),
                (0x22, 0x00),
                (0x23, 0x08),
                (0x22, 0x03)
            ]
        );
    }
}
