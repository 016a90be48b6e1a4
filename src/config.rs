// CLASSIFICATION: COMMUNITY
// Filename: config.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-07-19

//! Runtime configuration for the sensefs daemon.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the register-transport root.
pub const DEV_ROOT_ENV: &str = "SENSEFS_DEV_ROOT";

/// Knobs the CLI threads into the core.
#[derive(Debug, Clone)]
pub struct Config {
    /// Service name used when posting to a Unix socket.
    pub service: String,
    /// TCP port used when serving over the network.
    pub port: u16,
    /// Directory holding the per-device `i2c.<addr>.data` files.
    pub dev_root: PathBuf,
    /// Emit per-operation diagnostics.
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: String::from("sensefs"),
            port: 564, // the classic Plan 9 port
            dev_root: default_dev_root(),
            verbose: false,
        }
    }
}

/// The device root: `SENSEFS_DEV_ROOT` when set, `/dev/i2c1` otherwise.
pub fn default_dev_root() -> PathBuf {
    env::var(DEV_ROOT_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/dev/i2c1"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn env_var_overrides_device_root() {
        env::set_var(DEV_ROOT_ENV, "/tmp/simhat");
        assert_eq!(default_dev_root(), PathBuf::from("/tmp/simhat"));
        env::remove_var(DEV_ROOT_ENV);
        assert_eq!(default_dev_root(), PathBuf::from("/dev/i2c1"));
    }

    #[test]
    #[serial]
    fn defaults_name_the_classic_port() {
        let cfg = Config::default();
        assert_eq!(cfg.service, "sensefs");
        assert_eq!(cfg.port, 564);
        assert!(!cfg.verbose);
    }
}
