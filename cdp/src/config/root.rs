use serde::Deserialize;
use std::net::IpAddr;

fn default_platform() -> String {
    "Rust".to_string()
}

fn default_hold_time_secs() -> u8 {
    180
}

fn default_transmit_interval_secs() -> u64 {
    60
}

fn default_reap_tick_secs() -> u64 {
    5
}

fn default_capabilities() -> u32 {
    crate::packet::capability::HOST
}

/// One Ethernet link to listen and transmit on, with the static addresses
/// to advertise for it. `addresses` stands in for a platform-specific
/// interface enumerator; see [`InterfaceSource`](crate::collaborators::InterfaceSource).
#[derive(Debug, Deserialize, Clone)]
pub struct LinkConfig {
    pub name: String,

    /// Addresses advertised in the Addresses TLV for this link. Empty by
    /// default, matching a link with no configured addresses.
    #[serde(default)]
    pub addresses: Vec<IpAddr>,
}

/// Top-level agent configuration, loaded from a TOML file.
#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    /// Ethernet links to listen and transmit on, with their statically
    /// configured addresses. Required, must be non-empty.
    pub links: Vec<LinkConfig>,

    /// Overrides the identity-probe collaborator's device-id call when set.
    #[serde(default)]
    pub device_id: Option<String>,

    /// Overrides the identity-probe collaborator's software-version call
    /// when set.
    #[serde(default)]
    pub software_version: Option<String>,

    /// Platform string advertised in transmitted frames.
    #[serde(default = "default_platform")]
    pub platform: String,

    /// Hold time (TTL) written into transmitted frames, in seconds.
    #[serde(default = "default_hold_time_secs")]
    pub hold_time_secs: u8,

    /// How often the driver transmits a frame on each live interface.
    #[serde(default = "default_transmit_interval_secs")]
    pub transmit_interval_secs: u64,

    /// How often the driver checks for expired neighbors. Must not exceed
    /// `transmit_interval_secs`.
    #[serde(default = "default_reap_tick_secs")]
    pub reap_tick_secs: u64,

    /// Capability bitmap advertised in transmitted frames; see
    /// `cdp::packet::capability` for the individual bits.
    #[serde(default = "default_capabilities")]
    pub capabilities: u32,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
