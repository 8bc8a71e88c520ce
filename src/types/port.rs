//! Port types with validation and parsing.
//!
//! `Port` wraps a raw `u16` so port numbers are never confused with counts
//! or indices. `PortRange` is the inclusive interval a scan walks, with the
//! four standard IANA presets.

use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A TCP port number (0-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Lowest port number.
    pub const MIN: u16 = 0;
    /// Highest port number.
    pub const MAX: u16 = 65535;

    #[inline]
    pub const fn new(port: u16) -> Self {
        Self(port)
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for Port {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// An inclusive range of ports, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    /// Create a new port range, rejecting inverted bounds.
    pub fn new(start: u16, end: u16) -> ValidationResult<Self> {
        if start > end {
            Err(ValidationError::InvalidRange(start, end))
        } else {
            Ok(Self {
                start: Port(start),
                end: Port(end),
            })
        }
    }

    /// Create a range containing a single port.
    pub const fn single(port: Port) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    /// Well-known ports (0-1023).
    pub const fn well_known() -> Self {
        Self {
            start: Port(0),
            end: Port(1023),
        }
    }

    /// Registered ports (1024-49151).
    pub const fn registered() -> Self {
        Self {
            start: Port(1024),
            end: Port(49151),
        }
    }

    /// Dynamic/private ports (49152-65535).
    pub const fn dynamic() -> Self {
        Self {
            start: Port(49152),
            end: Port(Port::MAX),
        }
    }

    /// Every port (0-65535).
    pub const fn all() -> Self {
        Self {
            start: Port(Port::MIN),
            end: Port(Port::MAX),
        }
    }

    pub const fn start(&self) -> Port {
        self.start
    }

    pub const fn end(&self) -> Port {
        self.end
    }

    /// Get the number of ports in this range.
    pub const fn len(&self) -> usize {
        (self.end.0 - self.start.0) as usize + 1
    }

    /// A valid range always holds at least one port.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over all ports in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.start.0..=self.end.0).map(Port)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Parses `"80"` or `"1000-2000"`.
impl FromStr for PortRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::MissingRange);
        }

        match s.split_once('-') {
            Some((start, end)) => Self::new(parse_port(start)?, parse_port(end)?),
            None => Ok(Self::single(Port(parse_port(s)?))),
        }
    }
}

fn parse_port(s: &str) -> ValidationResult<u16> {
    let s = s.trim();
    s.parse()
        .map_err(|_| ValidationError::InvalidPort(s.to_string()))
}
