// CLASSIFICATION: COMMUNITY
// Filename: registry.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-08-01

//! Static virtual-file registry.
//!
//! The namespace is a fixed two-level tree: one directory holding eight
//! leaf nodes, one per sensor reading or actuator. The table is built
//! once and never changes at runtime; lookups are by leaf name.

use once_cell::sync::Lazy;

/// Name of the single directory the leaves live under.
pub const DIR_NAME: &str = "sense";

/// What a node does when read or written. One variant per leaf; the
/// session dispatches through a match so an entry can never point at a
/// missing handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Temperature from the barometric sensor.
    PressureTemperature,
    /// Barometric pressure.
    Pressure,
    /// Temperature from the humidity sensor.
    HumidityTemperature,
    /// Relative humidity.
    Humidity,
    /// Acceleration vector.
    Accelerometer,
    /// Angular rate vector.
    Gyroscope,
    /// Magnetic field vector.
    Magnetometer,
    /// LED matrix framebuffer sink.
    LedFrame,
}

/// Direction a node supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Node is sampled on read.
    Read,
    /// Node accepts a payload on write.
    Write,
}

/// One entry in the virtual-file table.
#[derive(Clone, Copy, Debug)]
pub struct NodeEntry {
    /// Leaf name under [`DIR_NAME`].
    pub name: &'static str,
    /// Behavior selector.
    pub kind: NodeKind,
    /// Supported direction.
    pub access: Access,
    /// At most one open handle at a time.
    pub exclusive: bool,
}

static NODES: Lazy<Vec<NodeEntry>> = Lazy::new(|| {
    use Access::{Read, Write};
    use NodeKind::*;
    vec![
        NodeEntry { name: "tempp", kind: PressureTemperature, access: Read, exclusive: true },
        NodeEntry { name: "press", kind: Pressure, access: Read, exclusive: true },
        NodeEntry { name: "temph", kind: HumidityTemperature, access: Read, exclusive: true },
        NodeEntry { name: "humid", kind: Humidity, access: Read, exclusive: true },
        NodeEntry { name: "accel", kind: Accelerometer, access: Read, exclusive: true },
        NodeEntry { name: "gyro", kind: Gyroscope, access: Read, exclusive: true },
        NodeEntry { name: "mag", kind: Magnetometer, access: Read, exclusive: true },
        NodeEntry { name: "led", kind: LedFrame, access: Write, exclusive: true },
    ]
});

/// The full node table, in publication order.
pub fn nodes() -> &'static [NodeEntry] {
    &NODES
}

/// Find the entry for a leaf name.
pub fn lookup(name: &str) -> Option<&'static NodeEntry> {
    NODES.iter().find(|n| n.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_leaves_all_exclusive() {
        assert_eq!(nodes().len(), 8);
        assert!(nodes().iter().all(|n| n.exclusive));
    }

    #[test]
    fn led_is_the_only_writable_node() {
        let writable: Vec<_> = nodes()
            .iter()
            .filter(|n| n.access == Access::Write)
            .map(|n| n.name)
            .collect();
        assert_eq!(writable, vec!["led"]);
        assert_eq!(lookup("led").expect("led").kind, NodeKind::LedFrame);
    }

    #[test]
    fn lookup_misses_unknown_names() {
        assert!(lookup("tempp").is_some());
        assert!(lookup("sense").is_none());
        assert!(lookup("").is_none());
    }
}
