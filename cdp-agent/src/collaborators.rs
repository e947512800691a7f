//! Concrete collaborator implementations for running the engine outside a
//! test harness.
//!
//! Raw frame I/O, interface enumeration, and host identity probing are
//! explicitly out of scope for the engine crate: each operating system
//! exposes its own socket and interface APIs. The implementations here are
//! the minimal stand-ins this binary ships with; a real deployment swaps
//! `LoggingFrameIo` for one that opens a raw 802.2 SNAP socket and
//! `ConfiguredInterfaceSource` for one that asks the kernel for live
//! Ethernet links.

use cdp::address::CdpAddress;
use cdp::{FrameIo, IdentityProbe, InterfaceInfo, InterfaceSource, LinkConfig};
use tracing::info;

/// Emits transmitted frames to the log instead of onto the wire.
pub struct LoggingFrameIo;

impl FrameIo for LoggingFrameIo {
    fn transmit(&self, link: &str, frame: &[u8]) -> std::io::Result<()> {
        info!(link, bytes = frame.len(), "would transmit CDP frame");
        Ok(())
    }
}

/// Identity sourced from configuration overrides, falling back to the
/// local hostname and this crate's own version string.
pub struct ConfiguredIdentity {
    pub device_id: String,
    pub software_version: String,
}

impl ConfiguredIdentity {
    pub fn from_config(cfg: &cdp::AgentConfig) -> Self {
        let device_id = cfg.device_id.clone().unwrap_or_else(|| {
            hostname_fallback()
        });
        let software_version = cfg
            .software_version
            .clone()
            .unwrap_or_else(|| format!("cdp-agent/{}", env!("CARGO_PKG_VERSION")));
        Self {
            device_id,
            software_version,
        }
    }
}

fn hostname_fallback() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "cdp-agent".to_string())
}

impl IdentityProbe for ConfiguredIdentity {
    fn device_id(&self) -> String {
        self.device_id.clone()
    }

    fn software_version(&self) -> String {
        self.software_version.clone()
    }
}

/// Interface source backed by the configured link names and their static
/// addresses; a platform-specific enumerator would discover both instead
/// of reading them from a file.
pub struct ConfiguredInterfaceSource {
    links: Vec<LinkConfig>,
}

impl ConfiguredInterfaceSource {
    pub fn new(links: Vec<LinkConfig>) -> Self {
        Self { links }
    }
}

impl InterfaceSource for ConfiguredInterfaceSource {
    fn interfaces(&self) -> Vec<InterfaceInfo> {
        self.links
            .iter()
            .map(|link| InterfaceInfo {
                link: link.name.clone(),
                addresses: link.addresses.iter().map(|a| CdpAddress::from(*a)).collect(),
            })
            .collect()
    }
}
