use std::net::Ipv4Addr;

/// TLV 8, "Cluster management protocol" in the naming used here (some
/// reference headers call it "hello protocol"; same wire layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterManagement {
    pub oui: u32,
    pub protocol_id: u16,
    pub cluster_master: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub version: u16,
    pub status: u8,
    pub cluster_commander_mac: [u8; 6],
    pub local_mac: [u8; 6],
    pub management_vlan: u16,
}

/// The only OUI the cluster-management TLV accepts; any other value is a
/// malformed-TLV parse failure.
pub const CLUSTER_MANAGEMENT_OUI: u32 = 0x00_000C;
