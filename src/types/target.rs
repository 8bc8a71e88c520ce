//! Scan target: a validated IPv4 host paired with the port range to walk.

use super::port::PortRange;
use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// An immutable, validated scan target.
///
/// Construction is the only place a target can fail; once built, a scan
/// over it never produces a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTarget {
    host: Ipv4Addr,
    ports: PortRange,
}

impl ScanTarget {
    /// Validate `host` and pair it with an already validated range.
    pub fn new(host: &str, ports: PortRange) -> ValidationResult<Self> {
        Ok(Self {
            host: parse_host(host)?,
            ports,
        })
    }

    /// Validate both the host and the raw range bounds.
    pub fn parse(host: &str, start: u16, end: u16) -> ValidationResult<Self> {
        let host = parse_host(host)?;
        let ports = PortRange::new(start, end)?;
        Ok(Self { host, ports })
    }

    pub fn host(&self) -> Ipv4Addr {
        self.host
    }

    pub fn ports(&self) -> PortRange {
        self.ports
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.ports)
    }
}

/// Accept only full dotted-decimal addresses: three separators, four octets.
fn parse_host(host: &str) -> ValidationResult<Ipv4Addr> {
    let host = host.trim();
    if host.matches('.').count() != 3 {
        return Err(ValidationError::MalformedHost(host.to_string()));
    }

    host.parse()
        .map_err(|_| ValidationError::MalformedHost(host.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4() {
        let target = ScanTarget::parse("192.168.1.10", 0, 1023).unwrap();
        assert_eq!(target.host(), Ipv4Addr::new(192, 168, 1, 10));
        assert_eq!(target.ports(), PortRange::well_known());
        assert_eq!(target.to_string(), "192.168.1.10:0-1023");
    }

    #[test]
    fn test_hostname_rejected() {
        assert_eq!(
            ScanTarget::parse("localhost", 1, 10),
            Err(ValidationError::MalformedHost("localhost".into()))
        );
    }

    #[test]
    fn test_partial_address_rejected() {
        assert!(ScanTarget::new("192.168.1", PortRange::all()).is_err());
        assert!(ScanTarget::new("10.0.0.0.1", PortRange::all()).is_err());
        assert!(ScanTarget::new("::1", PortRange::all()).is_err());
    }

    #[test]
    fn test_three_dots_but_not_an_address() {
        assert!(matches!(
            ScanTarget::new("a.b.c.d", PortRange::all()),
            Err(ValidationError::MalformedHost(_))
        ));
        assert!(ScanTarget::new("300.1.1.1", PortRange::all()).is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert_eq!(
            ScanTarget::parse("127.0.0.1", 10, 5),
            Err(ValidationError::InvalidRange(10, 5))
        );
    }
}
