use std::fs;
use std::path::Path;

use crate::config::AgentConfig;
use crate::error::{CdpError, Result};

pub fn load_from_path<P: AsRef<Path>>(p: P) -> Result<AgentConfig> {
    let txt = fs::read_to_string(p)
        .map_err(|e| CdpError::Config(format!("failed to read config file: {e}")))?;
    let cfg: AgentConfig =
        toml::from_str(&txt).map_err(|e| CdpError::Config(format!("failed to parse config: {e}")))?;

    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &AgentConfig) -> Result<()> {
    if cfg.links.is_empty() {
        return Err(CdpError::Config("no links configured".into()));
    }

    if cfg.hold_time_secs == 0 {
        return Err(CdpError::Config(
            "hold_time_secs must be at least 1 (a zero hold time reaps the neighbor immediately)".into(),
        ));
    }

    if cfg.reap_tick_secs == 0 {
        return Err(CdpError::Config("reap_tick_secs must be at least 1".into()));
    }

    if cfg.reap_tick_secs > cfg.transmit_interval_secs {
        return Err(CdpError::Config(format!(
            "reap_tick_secs ({}) must not exceed transmit_interval_secs ({})",
            cfg.reap_tick_secs, cfg.transmit_interval_secs
        )));
    }

    Ok(())
}
