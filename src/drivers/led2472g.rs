// CLASSIFICATION: COMMUNITY
// Filename: led2472g.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-08-01

//! LED2472G 8×8 LED matrix driver.
//!
//! The matrix consumes a 192-byte framebuffer (8 rows × 24 channel
//! bytes) written whole at offset 0. A full clear takes 193 bytes — the
//! device swallows one framing/status byte beyond the pixel data — and
//! is issued on both power-up and power-down so the panel never holds a
//! stale frame across a server restart.

use std::sync::Arc;

use log::debug;

use crate::bus::{RegisterBus, RegisterChannel};
use crate::drivers::{open_err, Device};
use crate::error::{DeviceError, Result};

/// Bus address of the LED controller.
pub const ADDR: u8 = 0x46;

/// Framebuffer length clients must supply.
pub const FRAME_LEN: usize = 192;

/// Clear length: frame plus the framing/status byte.
const CLEAR_LEN: usize = 193;

/// 8×8 LED matrix.
pub struct Led2472g {
    bus: Arc<dyn RegisterBus>,
}

impl Led2472g {
    /// Driver over the shared register bus.
    pub fn new(bus: Arc<dyn RegisterBus>) -> Self {
        Self { bus }
    }

    fn channel(&self) -> Result<Box<dyn RegisterChannel>> {
        self.bus.open(ADDR).map_err(open_err("led"))
    }

    fn clear(&self) -> Result<()> {
        let mut ch = self.channel()?;
        ch.write_block(&[0u8; CLEAR_LEN])?;
        Ok(())
    }

    /// Push a client-supplied frame to the panel, unvalidated and
    /// verbatim. Anything but exactly [`FRAME_LEN`] bytes is rejected
    /// before the bus is touched.
    pub fn blit(&self, frame: &[u8]) -> Result<()> {
        if frame.len() != FRAME_LEN {
            return Err(DeviceError::FrameSize {
                expected: FRAME_LEN,
                got: frame.len(),
            });
        }
        let mut ch = self.channel()?;
        ch.write_block(frame)?;
        Ok(())
    }
}

impl Device for Led2472g {
    fn name(&self) -> &'static str {
        "led"
    }

    fn power_up(&mut self) -> Result<()> {
        self.clear()?;
        debug!("led cleared on power up");
        Ok(())
    }

    fn power_down(&mut self) -> Result<()> {
        self.clear()?;
        debug!("led cleared on power down");
        Ok(())
    }
}
