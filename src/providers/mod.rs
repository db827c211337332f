//! Concrete event sources

pub mod udp;

pub use udp::UdpFrameSource;
