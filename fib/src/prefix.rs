// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Types to represent IP-version neutral network prefixes and MPLS labels.

use ipnet::{Ipv4Net, Ipv6Net};
use iptrie::{IpPrefix, IpPrefixCovering, Ipv4Prefix, Ipv6Prefix};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrefixError {
    #[error("Invalid Prefix: {0}")]
    Invalid(String),
    #[error("Mask length {0} is invalid")]
    InvalidLength(u8),
}

/// Type to represent both IPv4 and IPv6 prefixes to expose an IP
/// version-independent API.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd)]
pub enum Prefix {
    IPV4(Ipv4Prefix),
    IPV6(Ipv6Prefix),
}

impl Prefix {
    pub const MAX_LEN_IPV4: u8 = 32;
    pub const MAX_LEN_IPV6: u8 = 128;

    /// Build 0.0.0.0/0. "Default" is a very overloaded term. Calling this `root_v4`.
    #[must_use]
    pub fn root_v4() -> Prefix {
        Prefix::IPV4(Ipv4Prefix::default())
    }
    /// Build `::/0`.
    #[must_use]
    pub fn root_v6() -> Prefix {
        Prefix::IPV6(Ipv6Prefix::default())
    }

    /// Build the host prefix (/32 or /128) for an address
    #[must_use]
    pub fn host_from_addr(addr: &IpAddr) -> Prefix {
        match addr {
            IpAddr::V4(a) => Prefix::IPV4(Ipv4Prefix::from(*a)),
            IpAddr::V6(a) => Prefix::IPV6(Ipv6Prefix::from(*a)),
        }
    }

    /// Check whether the prefix is IPv4
    #[must_use]
    pub fn is_ipv4(&self) -> bool {
        matches!(self, Prefix::IPV4(_))
    }

    /// Check whether the prefix is IPv6
    #[must_use]
    pub fn is_ipv6(&self) -> bool {
        matches!(self, Prefix::IPV6(_))
    }

    /// Build an `IpAddr` from a prefix
    #[must_use]
    pub fn as_address(&self) -> IpAddr {
        match *self {
            Prefix::IPV4(p) => p.network().into(),
            Prefix::IPV6(p) => p.network().into(),
        }
    }

    /// Get prefix length
    #[must_use]
    pub fn length(&self) -> u8 {
        match *self {
            Prefix::IPV4(p) => p.len(),
            Prefix::IPV6(p) => p.len(),
        }
    }

    /// Check whether prefix covers a given address
    #[must_use]
    pub fn covers_addr(&self, addr: &IpAddr) -> bool {
        match (self, addr) {
            (Prefix::IPV4(p), IpAddr::V4(a)) => p.covers(a),
            (Prefix::IPV6(p), IpAddr::V6(a)) => p.covers(a),
            _ => false,
        }
    }

    /// Build the prefix with the same network address truncated to `len` bits.
    ///
    /// # Errors
    /// Fails if `len` exceeds the maximum for the address family.
    pub fn truncate(&self, len: u8) -> Result<Prefix, PrefixError> {
        match *self {
            Prefix::IPV4(p) => {
                let net = Ipv4Net::new(p.network(), len)
                    .map_err(|e| PrefixError::Invalid(e.to_string()))?;
                Ok(Prefix::IPV4(Ipv4Prefix::from(net.trunc())))
            }
            Prefix::IPV6(p) => {
                let net = Ipv6Net::new(p.network(), len)
                    .map_err(|e| PrefixError::Invalid(e.to_string()))?;
                Ok(Prefix::IPV6(Ipv6Prefix::from(net.trunc())))
            }
        }
    }

    /// Tell if prefix is a host
    #[must_use]
    pub fn is_host(&self) -> bool {
        match self {
            Prefix::IPV4(_) => self.length() == Self::MAX_LEN_IPV4,
            Prefix::IPV6(_) => self.length() == Self::MAX_LEN_IPV6,
        }
    }

    #[cfg(any(test, feature = "testing"))]
    pub fn expect_from<T>(val: T) -> Self
    where
        T: TryInto<Prefix>,
        T::Error: std::fmt::Debug,
    {
        val.try_into().expect("Invalid prefix")
    }
}

impl TryFrom<(IpAddr, u8)> for Prefix {
    type Error = PrefixError;

    fn try_from(tuple: (IpAddr, u8)) -> Result<Self, Self::Error> {
        match tuple.0 {
            IpAddr::V4(a) => Ok(Prefix::IPV4(
                Ipv4Prefix::new(a, tuple.1).map_err(|e| PrefixError::Invalid(e.to_string()))?,
            )),
            IpAddr::V6(a) => Ok(Prefix::IPV6(
                Ipv6Prefix::new(a, tuple.1).map_err(|e| PrefixError::Invalid(e.to_string()))?,
            )),
        }
    }
}

impl TryFrom<(&str, u8)> for Prefix {
    type Error = PrefixError;

    fn try_from((addr_str, mask_len): (&str, u8)) -> Result<Self, Self::Error> {
        let addr = IpAddr::from_str(addr_str)
            .map_err(|_| PrefixError::Invalid("Invalid address format".to_string()))?;
        let max_len = match addr {
            IpAddr::V4(_) => Prefix::MAX_LEN_IPV4,
            IpAddr::V6(_) => Prefix::MAX_LEN_IPV6,
        };
        if mask_len > max_len {
            return Err(PrefixError::InvalidLength(mask_len));
        }
        Prefix::try_from((addr, mask_len))
    }
}

impl From<Ipv4Prefix> for Prefix {
    fn from(value: Ipv4Prefix) -> Self {
        Self::IPV4(value)
    }
}
impl From<Ipv6Prefix> for Prefix {
    fn from(value: Ipv6Prefix) -> Self {
        Self::IPV6(value)
    }
}

/// Only for testing. Will panic with badly formatted prefix strings
#[cfg(any(test, feature = "testing"))]
impl From<&str> for Prefix {
    fn from(s: &str) -> Self {
        if let Ok(p) = Ipv4Net::from_str(s) {
            Prefix::IPV4(Ipv4Prefix::from(p))
        } else if let Ok(p) = Ipv6Net::from_str(s) {
            Prefix::IPV6(Ipv6Prefix::from(p))
        } else {
            panic!("Invalid prefix '{s}'")
        }
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Prefix::IPV4(p) => write!(f, "{p}"),
            Prefix::IPV6(p) => write!(f, "{p}"),
        }
    }
}

/// An MPLS label. A recursive path may resolve through one in the label space
/// of some table, so labels share the prefix vocabulary.
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub struct MplsLabel(pub u32);

impl MplsLabel {
    #[must_use]
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl Display for MplsLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The all-zeros address of an address family
#[must_use]
pub fn zero_addr_v4() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

/// The all-zeros address of an address family
#[must_use]
pub fn zero_addr_v6() -> IpAddr {
    IpAddr::V6(Ipv6Addr::UNSPECIFIED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_prefix() {
        let a: IpAddr = "1.1.1.1".parse().expect("Bad address");
        let p = Prefix::host_from_addr(&a);
        assert!(p.is_host());
        assert_eq!(p.length(), 32);
        assert_eq!(p.as_address(), a);

        let a6: IpAddr = "2001:a:b::1".parse().expect("Bad address");
        let p6 = Prefix::host_from_addr(&a6);
        assert!(p6.is_host());
        assert_eq!(p6.length(), 128);
    }

    #[test]
    fn test_truncate() {
        let p = Prefix::expect_from(("10.1.2.3", 32));
        let t = p.truncate(8).expect("Should truncate");
        assert_eq!(t, Prefix::expect_from(("10.0.0.0", 8)));
        assert!(t.covers_addr(&"10.9.9.9".parse().expect("Bad address")));
        assert!(p.truncate(33).is_err());
    }

    #[test]
    fn test_roots() {
        assert_eq!(Prefix::root_v4().length(), 0);
        assert_eq!(Prefix::root_v6().length(), 0);
        assert!(Prefix::root_v4().is_ipv4());
        assert!(Prefix::root_v6().is_ipv6());
    }
}
