// CLASSIFICATION: COMMUNITY
// Filename: bus.rs v0.5
// Author: Lukas Bower
// Date Modified: 2026-08-01

//! Register transport seam.
//!
//! Every Sense HAT device hangs off one physical I²C bus and is reached
//! through a per-address data file (`i2c.<addr>.data` under the device
//! root). A channel is opened for the duration of a single operation and
//! closed when dropped; nothing holds a handle across requests.
//!
//! All five devices share the bus, so each addressed transaction — write
//! the register address, then read or write the data byte — must not
//! interleave with another device's transaction. [`DevBus`] owns the bus
//! mutex and every channel it hands out holds the pair under that lock.
//!
//! [`MemBus`] is the in-memory double used by the test suites: it keeps a
//! register map per address and journals every write so power sequences
//! can be checked byte-for-byte.

use std::collections::{HashMap, HashSet};
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::FileExt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// Addressed byte channel factory, one per physical bus.
pub trait RegisterBus: Send + Sync {
    /// Open a fresh channel to the device at `addr`.
    fn open(&self, addr: u8) -> io::Result<Box<dyn RegisterChannel>>;
}

/// A single open conversation with one device.
///
/// Channels are cheap and short-lived; drop closes them.
pub trait RegisterChannel: Send {
    /// Select `reg` and read back one data byte.
    fn read_reg(&mut self, reg: u8) -> io::Result<u8>;

    /// Write `val` into `reg`.
    fn write_reg(&mut self, reg: u8, val: u8) -> io::Result<()>;

    /// Write a raw block at offset 0 (LED framebuffer path).
    fn write_block(&mut self, data: &[u8]) -> io::Result<()>;
}

fn hold(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Production transport over per-device files.
pub struct DevBus {
    root: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl DevBus {
    /// Create a bus rooted at `root` (normally `/dev/i2c1`).
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            lock: Arc::new(Mutex::new(())),
        }
    }

    fn path_for(&self, addr: u8) -> PathBuf {
        self.root.join(format!("i2c.{:02x}.data", addr))
    }
}

impl RegisterBus for DevBus {
    fn open(&self, addr: u8) -> io::Result<Box<dyn RegisterChannel>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(self.path_for(addr))?;
        Ok(Box::new(DevChannel {
            file,
            lock: Arc::clone(&self.lock),
        }))
    }
}

struct DevChannel {
    file: File,
    lock: Arc<Mutex<()>>,
}

impl RegisterChannel for DevChannel {
    fn read_reg(&mut self, reg: u8) -> io::Result<u8> {
        let _bus = hold(&self.lock);
        self.file.write_all_at(&[reg], 0)?;
        let mut data = [0u8; 1];
        self.file.read_exact_at(&mut data, 0)?;
        Ok(data[0])
    }

    fn write_reg(&mut self, reg: u8, val: u8) -> io::Result<()> {
        let _bus = hold(&self.lock);
        self.file.write_all_at(&[reg, val], 0)
    }

    fn write_block(&mut self, data: &[u8]) -> io::Result<()> {
        let _bus = hold(&self.lock);
        self.file.write_all_at(data, 0)
    }
}

#[derive(Default)]
struct MemState {
    regs: HashMap<u8, HashMap<u8, u8>>,
    absent: HashSet<u8>,
    journal: HashMap<u8, Vec<(u8, u8)>>,
    blocks: HashMap<u8, Vec<Vec<u8>>>,
}

/// In-memory register transport for tests.
///
/// Unset registers read back as zero, which is also what the hardware
/// reports before its first conversion cycle.
#[derive(Clone, Default)]
pub struct MemBus {
    state: Arc<Mutex<MemState>>,
}

impl MemBus {
    /// Fresh bus with every device present and all registers zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> MutexGuard<'_, MemState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Seed a register value.
    pub fn set_reg(&self, addr: u8, reg: u8, val: u8) {
        self.locked().regs.entry(addr).or_default().insert(reg, val);
    }

    /// Current value of a register, if anything ever wrote it.
    pub fn reg(&self, addr: u8, reg: u8) -> Option<u8> {
        self.locked().regs.get(&addr).and_then(|m| m.get(&reg)).copied()
    }

    /// Make `open` fail for `addr`, simulating a missing device.
    pub fn set_absent(&self, addr: u8) {
        self.locked().absent.insert(addr);
    }

    /// Ordered journal of `(reg, val)` writes to `addr`.
    pub fn journal(&self, addr: u8) -> Vec<(u8, u8)> {
        self.locked().journal.get(&addr).cloned().unwrap_or_default()
    }

    /// Every raw block written to `addr`, oldest first.
    pub fn blocks(&self, addr: u8) -> Vec<Vec<u8>> {
        self.locked().blocks.get(&addr).cloned().unwrap_or_default()
    }
}

impl RegisterBus for MemBus {
    fn open(&self, addr: u8) -> io::Result<Box<dyn RegisterChannel>> {
        if self.locked().absent.contains(&addr) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no device at {:#04x}", addr),
            ));
        }
        Ok(Box::new(MemChannel {
            state: Arc::clone(&self.state),
            addr,
        }))
    }
}

struct MemChannel {
    state: Arc<Mutex<MemState>>,
    addr: u8,
}

impl MemChannel {
    fn locked(&self) -> MutexGuard<'_, MemState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl RegisterChannel for MemChannel {
    fn read_reg(&mut self, reg: u8) -> io::Result<u8> {
        Ok(self
            .locked()
            .regs
            .get(&self.addr)
            .and_then(|m| m.get(&reg))
            .copied()
            .unwrap_or(0))
    }

    fn write_reg(&mut self, reg: u8, val: u8) -> io::Result<()> {
        let mut state = self.locked();
        state.regs.entry(self.addr).or_default().insert(reg, val);
        state.journal.entry(self.addr).or_default().push((reg, val));
        Ok(())
    }

    fn write_block(&mut self, data: &[u8]) -> io::Result<()> {
        self.locked()
            .blocks
            .entry(self.addr)
            .or_default()
            .push(data.to_vec());
        Ok(())
    }
}
