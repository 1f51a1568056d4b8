//! Classification of resolved addresses against reserved and private ranges.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnet::{Ipv4Net, Ipv6Net};

/// Routing class of a single IP address. Only [`AddressClass::Public`] is fetchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressClass {
    Public,
    Private,
    Loopback,
    LinkLocal,
    Multicast,
    Reserved,
    Unspecified,
}

impl AddressClass {
    /// Classify an address, looking through IPv4-mapped IPv6 addresses.
    pub fn of(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => classify_v4(v4),
            IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
                Some(v4) => classify_v4(v4),
                None => classify_v6(v6),
            },
        }
    }

    pub fn is_public(self) -> bool {
        self == Self::Public
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Loopback => "loopback",
            Self::LinkLocal => "link-local",
            Self::Multicast => "multicast",
            Self::Reserved => "reserved",
            Self::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for AddressClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Order matters: the first matching range wins, so 0.0.0.0 is checked
// before the wider 0.0.0.0/8.
const V4_RANGES: &[(Ipv4Net, AddressClass)] = &[
    (v4(0, 0, 0, 0, 32), AddressClass::Unspecified),
    (v4(127, 0, 0, 0, 8), AddressClass::Loopback),
    (v4(10, 0, 0, 0, 8), AddressClass::Private),
    (v4(172, 16, 0, 0, 12), AddressClass::Private),
    (v4(192, 168, 0, 0, 16), AddressClass::Private),
    (v4(169, 254, 0, 0, 16), AddressClass::LinkLocal), // cloud metadata lives here
    (v4(224, 0, 0, 0, 4), AddressClass::Multicast),
    (v4(0, 0, 0, 0, 8), AddressClass::Reserved),
    (v4(100, 64, 0, 0, 10), AddressClass::Reserved), // carrier-grade NAT
    (v4(192, 0, 0, 0, 24), AddressClass::Reserved),
    (v4(192, 0, 2, 0, 24), AddressClass::Reserved),
    (v4(198, 18, 0, 0, 15), AddressClass::Reserved),
    (v4(198, 51, 100, 0, 24), AddressClass::Reserved),
    (v4(203, 0, 113, 0, 24), AddressClass::Reserved),
    (v4(240, 0, 0, 0, 4), AddressClass::Reserved), // includes 255.255.255.255
];

const V6_RANGES: &[(Ipv6Net, AddressClass)] = &[
    (v6([0, 0, 0, 0, 0, 0, 0, 0], 128), AddressClass::Unspecified),
    (v6([0, 0, 0, 0, 0, 0, 0, 1], 128), AddressClass::Loopback),
    // IPv4-compatible (::a.b.c.d) and NAT64 (64:ff9b::/96, 64:ff9b:1::/48)
    // forms embed an IPv4 address and can reach it through a translator.
    (v6([0, 0, 0, 0, 0, 0, 0, 0], 8), AddressClass::Reserved),
    (v6([0xfc00, 0, 0, 0, 0, 0, 0, 0], 7), AddressClass::Private),
    (v6([0xfe80, 0, 0, 0, 0, 0, 0, 0], 10), AddressClass::LinkLocal),
    (v6([0xff00, 0, 0, 0, 0, 0, 0, 0], 8), AddressClass::Multicast),
    (v6([0xfec0, 0, 0, 0, 0, 0, 0, 0], 10), AddressClass::Reserved), // deprecated site-local
    (v6([0x2001, 0, 0, 0, 0, 0, 0, 0], 23), AddressClass::Reserved), // IETF protocol assignments
    (v6([0x2001, 0x0db8, 0, 0, 0, 0, 0, 0], 32), AddressClass::Reserved),
    (v6([0x0100, 0, 0, 0, 0, 0, 0, 0], 64), AddressClass::Reserved), // discard-only
];

const fn v4(a: u8, b: u8, c: u8, d: u8, prefix: u8) -> Ipv4Net {
    Ipv4Net::new_assert(Ipv4Addr::new(a, b, c, d), prefix)
}

const fn v6(s: [u16; 8], prefix: u8) -> Ipv6Net {
    Ipv6Net::new_assert(
        Ipv6Addr::new(s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7]),
        prefix,
    )
}

fn classify_v4(addr: Ipv4Addr) -> AddressClass {
    V4_RANGES
        .iter()
        .find(|(net, _)| net.contains(&addr))
        .map(|(_, class)| *class)
        .unwrap_or(AddressClass::Public)
}

fn classify_v6(addr: Ipv6Addr) -> AddressClass {
    V6_RANGES
        .iter()
        .find(|(net, _)| net.contains(&addr))
        .map(|(_, class)| *class)
        .unwrap_or(AddressClass::Public)
}
