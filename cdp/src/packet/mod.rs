pub mod cluster;
pub mod poe;
pub mod record;

mod parser;
mod serializer;

pub use cluster::{ClusterManagement, CLUSTER_MANAGEMENT_OUI};
pub use parser::parse_packet;
pub use poe::PoeAvailability;
pub use record::{capability, tlv_type, Duplex, Packet};
pub use serializer::serialize_packet;
