// CLASSIFICATION: COMMUNITY
// Filename: error.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-07-19

//! Error taxonomy for device sessions and node dispatch.
//!
//! Every failure a client can observe maps to one of these variants; the
//! 9P adapter renders the `Display` string into the protocol error reply,
//! so messages stay short and human-readable.

use std::io;

use thiserror::Error;

/// Failures surfaced by drivers, calibration, and dispatch.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device's register channel could not be acquired.
    #[error("open {0} fail: {1}")]
    Open(&'static str, #[source] io::Error),

    /// A register transaction failed after the channel was open.
    #[error("register transfer fail: {0}")]
    Transfer(#[from] io::Error),

    /// Humidity/temperature conversion requested before the calibration
    /// table was populated (HTS221 power-up failed or never ran).
    #[error("calibration table not populated")]
    CalibrationMissing,

    /// The two calibration reference outputs coincide; interpolation is
    /// undefined.
    #[error("calibration fault: reference outputs coincide")]
    CalibrationDegenerate,

    /// Unknown node, or an access direction the node does not support.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// LED frame payload was not exactly the required length.
    #[error("led frame must be {expected} bytes, got {got}")]
    FrameSize {
        /// Required frame length in bytes.
        expected: usize,
        /// Length the client actually sent.
        got: usize,
    },
}

/// Convenience alias used throughout the driver layer.
pub type Result<T> = std::result::Result<T, DeviceError>;
