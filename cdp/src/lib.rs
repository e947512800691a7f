#![forbid(unsafe_code)]

pub mod address;
pub mod codec;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod neighbor;
pub mod packet;

pub use collaborators::{FrameIo, IdentityProbe, InterfaceInfo, InterfaceSource, ReceivedFrame};
pub use config::{load_from_path, AgentConfig, LinkConfig};
pub use error::{CdpError, Result};
pub use neighbor::{ingest, FrameBuilder, NeighborKey, NeighborRecord, NeighborTable, PeriodicDriver, Timestamp};
pub use packet::{parse_packet, serialize_packet, ClusterManagement, Duplex, Packet, PoeAvailability};
