//! Sender identity

use std::fmt;
use std::net::SocketAddr;

/// Opaque identity of one logical sender.
///
/// Derived from a datagram's origin address, or generated randomly for
/// sources with no natural identity (such as a ring consumer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(Origin);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Origin {
    Network(SocketAddr),
    Synthetic(u64),
}

impl SourceId {
    /// Identity of the sender at `addr`.
    pub fn from_addr(addr: SocketAddr) -> Self {
        SourceId(Origin::Network(addr))
    }

    /// A fresh random identity.
    pub fn random() -> Self {
        SourceId(Origin::Synthetic(rand::random()))
    }

    /// The network origin, when this identity has one.
    pub fn addr(&self) -> Option<SocketAddr> {
        match self.0 {
            Origin::Network(addr) => Some(addr),
            Origin::Synthetic(_) => None,
        }
    }
}

impl From<SocketAddr> for SourceId {
    fn from(addr: SocketAddr) -> Self {
        SourceId::from_addr(addr)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Origin::Network(addr) => write!(f, "{addr}"),
            Origin::Synthetic(id) => write!(f, "synthetic:{id:016x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_identity_follows_address() {
        let a: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        let b: SocketAddr = "127.0.0.1:4001".parse().unwrap();
        assert_eq!(SourceId::from_addr(a), SourceId::from(a));
        assert_ne!(SourceId::from_addr(a), SourceId::from_addr(b));
        assert_eq!(SourceId::from_addr(a).addr(), Some(a));
    }

    #[test]
    fn random_identities_differ() {
        let first = SourceId::random();
        assert_ne!(first, SourceId::random());
        assert!(first.addr().is_none());
        assert!(first.to_string().starts_with("synthetic:"));
    }
}
