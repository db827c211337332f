//! Configuration values for the ingest pipeline.
//!
//! Loading is YAML via `serde_yaml_ng`; every field has a default so a
//! partial document is enough:
//!
//! ```rust
//! use mediasync::SyncConfig;
//!
//! let config = SyncConfig::from_yaml("udp:\n  port: 5004\nring:\n  capacity: 8\n").unwrap();
//! assert_eq!(config.udp.port, 5004);
//! assert_eq!(config.ring.capacity, 8);
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::Tick;
use crate::{Result, SyncError};

/// Which local address the UDP source binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindPreference {
    /// 0.0.0.0
    #[default]
    AllInterfaces,

    /// 127.0.0.1
    Localhost,

    /// A specific local address
    Address(IpAddr),
}

impl BindPreference {
    pub fn ip(self) -> IpAddr {
        match self {
            BindPreference::AllInterfaces => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            BindPreference::Localhost => IpAddr::V4(Ipv4Addr::LOCALHOST),
            BindPreference::Address(ip) => ip,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UdpSourceConfig {
    /// Port to listen on; 0 picks an ephemeral port
    pub port: u16,

    /// `all_interfaces`, `localhost` or `address: <ip>`
    #[serde(with = "serde_yaml_ng::with::singleton_map")]
    pub bind: BindPreference,
}

impl UdpSourceConfig {
    pub fn new(port: u16, bind: BindPreference) -> Self {
        Self { port, bind }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind.ip(), self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Maximum queued elements
    pub capacity: usize,

    /// How long the consumer waits for data before counting a stall
    pub poll_interval_ms: u64,

    /// Expected frame duration on the consumer side. The output content
    /// type's own duration wins when both are known.
    pub poll_target_ms: Option<u64>,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self { capacity: 16, poll_interval_ms: 10, poll_target_ms: None }
    }
}

impl RingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Resolve the consumer's target frame duration.
    ///
    /// `content_duration` comes from the output content type when it has a
    /// static duration and takes precedence over the configured value.
    pub fn resolve_poll_target(&self, content_duration: Option<Tick>) -> Result<Tick> {
        let configured = self.poll_target_ms.map(Tick::from_millis);
        match (content_duration, configured) {
            (Some(typed), Some(configured)) if typed != configured => {
                warn!(
                    "Configured poll target {} conflicts with content duration {}; using content duration",
                    configured, typed
                );
                Ok(typed)
            }
            (Some(typed), _) => Ok(typed),
            (None, Some(configured)) if !configured.is_zero_or_negative() => Ok(configured),
            _ => Err(SyncError::config("ring.poll_target_ms", "no positive poll target available")),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub udp: UdpSourceConfig,
    pub ring: RingConfig,

    /// Expected segment duration, checked against the segment type in use
    pub segment_duration_ms: Option<u64>,
}

impl SyncConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: SyncConfig = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ring.capacity == 0 {
            return Err(SyncError::config("ring.capacity", "must be greater than zero"));
        }
        if self.ring.poll_interval_ms == 0 {
            return Err(SyncError::config("ring.poll_interval_ms", "must be greater than zero"));
        }
        if self.ring.poll_target_ms == Some(0) {
            return Err(SyncError::config("ring.poll_target_ms", "must be greater than zero"));
        }
        if self.segment_duration_ms == Some(0) {
            return Err(SyncError::config("segment_duration_ms", "must be greater than zero"));
        }
        Ok(())
    }

    /// Check the configured segment duration against a static one.
    ///
    /// The static duration is authoritative; a mismatch is only logged.
    pub fn check_segment_duration(&self, static_ms: u64) -> bool {
        match self.segment_duration_ms {
            Some(configured) if configured != static_ms => {
                warn!(
                    "Configured segment duration {}ms differs from segment type duration {}ms",
                    configured, static_ms
                );
                false
            }
            _ => true,
        }
    }
}
