use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::collaborators::{FrameIo, InterfaceSource};
use crate::error::Result;
use crate::neighbor::record::Timestamp;
use crate::neighbor::table::NeighborTable;
use crate::packet::Packet;

/// Builds the outgoing frame for one interface; supplied by the agent
/// binary since only it knows the identity and configured attributes.
pub type FrameBuilder = dyn Fn(&str, &[crate::address::CdpAddress]) -> Result<(Packet, Vec<u8>)> + Send + Sync;

/// Background timer that reaps expired neighbors and, once per configured
/// transmit interval, emits a frame on every live interface.
///
/// Mirrors a thread-plus-atomic-shutdown-flag discipline: `shutdown()` (and
/// `Drop`) flip the flag and join the handle, so no tick is left running
/// after shutdown returns.
pub struct PeriodicDriver {
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicDriver {
    pub fn spawn(
        table: Arc<NeighborTable>,
        interfaces: Arc<dyn InterfaceSource>,
        frame_io: Arc<dyn FrameIo>,
        build_frame: Arc<FrameBuilder>,
        reap_tick: Duration,
        transmit_interval: Duration,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let loop_shutdown = shutdown.clone();
        let last_transmit = Arc::new(Mutex::new(None::<Timestamp>));

        let handle = thread::spawn(move || {
            driver_loop(
                table,
                interfaces,
                frame_io,
                build_frame,
                reap_tick,
                transmit_interval,
                last_transmit,
                loop_shutdown,
            );
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Disarms the timer, waits for any in-flight tick to complete, then
    /// runs a terminal reap-all before returning.
    pub fn shutdown(mut self, table: &NeighborTable) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        if let Err(err) = table.reap(Timestamp::from_secs(u64::MAX)) {
            warn!(%err, "terminal reap during driver shutdown failed");
        }
    }
}

impl Drop for PeriodicDriver {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn driver_loop(
    table: Arc<NeighborTable>,
    interfaces: Arc<dyn InterfaceSource>,
    frame_io: Arc<dyn FrameIo>,
    build_frame: Arc<FrameBuilder>,
    reap_tick: Duration,
    transmit_interval: Duration,
    last_transmit: Arc<Mutex<Option<Timestamp>>>,
    shutdown: Arc<AtomicBool>,
) {
    while !shutdown.load(Ordering::Relaxed) {
        let now = Timestamp::now();

        match table.reap(now) {
            Ok(count) if count > 0 => debug!(count, "reaped expired neighbors"),
            Ok(_) => {}
            Err(err) => warn!(%err, "reap failed"),
        }

        let due = {
            let mut guard = last_transmit.lock().unwrap_or_else(|p| p.into_inner());
            let due = guard
                .map(|last| now.secs.saturating_sub(last.secs) >= transmit_interval.as_secs())
                .unwrap_or(true);
            if due {
                *guard = Some(now);
            }
            due
        };

        if due {
            for interface in interfaces.interfaces() {
                match build_frame(&interface.link, &interface.addresses) {
                    Ok((_, bytes)) => {
                        if let Err(err) = frame_io.transmit(&interface.link, &bytes) {
                            warn!(link = %interface.link, %err, "CDP transmit failed");
                        }
                    }
                    Err(err) => {
                        warn!(link = %interface.link, %err, "failed to build outgoing CDP frame");
                    }
                }
            }
        }

        thread::sleep(reap_tick);
    }
}
