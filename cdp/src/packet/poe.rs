/// TLV 26, Power-over-Ethernet availability advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoeAvailability {
    pub request_id: u16,
    pub management_id: u16,
    pub available_milliwatts: u32,
    pub power_management_level: i32,
}
