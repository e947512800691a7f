//! Trait seams for the external collaborators named in the interface
//! catalogue: frame I/O, host identity, and interface enumeration. The
//! engine never touches an OS socket or interface API directly — concrete
//! implementations live in the agent binary or its tests.

use crate::address::CdpAddress;
use crate::neighbor::Timestamp;

/// Pushes received frames in, and emits serialized frames out.
pub trait FrameIo: Send + Sync {
    /// Called by the driver once per live interface when a transmit is due.
    /// `frame` is a complete, checksummed CDP payload; the destination MAC
    /// is always the CDP multicast address `01:00:0C:CC:CC:CC`.
    fn transmit(&self, link: &str, frame: &[u8]) -> std::io::Result<()>;
}

/// Host identity, probed once at startup and held for the engine's
/// lifetime.
pub trait IdentityProbe: Send + Sync {
    fn device_id(&self) -> String;
    fn software_version(&self) -> String;
}

/// One live Ethernet link and the addresses presently bound to it, used
/// only while building an outgoing frame.
pub struct InterfaceInfo {
    pub link: String,
    pub addresses: Vec<CdpAddress>,
}

pub trait InterfaceSource: Send + Sync {
    fn interfaces(&self) -> Vec<InterfaceInfo>;
}

/// A frame observed on `link` from `src_mac` at `now`; the shape the
/// driver's receive path consumes before handing bytes to the parser.
pub struct ReceivedFrame<'a> {
    pub link: &'a str,
    pub src_mac: &'a [u8],
    pub bytes: &'a [u8],
    pub received_at: Timestamp,
}
