//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured lift events through the
//! `log` facade (the host picks the backend: UART, RTT, stderr). A radio
//! or host-link adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::LiftEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`LiftEvent`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &LiftEvent) {
        match event {
            LiftEvent::Telemetry(t) => {
                info!(
                    "TELEM | state={:?} | status={:?} | axis={:.1}",
                    t.state, t.status, t.virtual_height
                );
                for (i, leg) in t.legs.iter().enumerate() {
                    info!(
                        "TELEM | leg={i} state={:?} status={:?} height={} offset={} stale={}",
                        leg.state, leg.status, leg.effective_height, leg.height_offset, leg.stale_reads,
                    );
                }
            }
            LiftEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            LiftEvent::StatusChanged { from, to } => {
                info!("LIMIT | {:?} -> {:?}", from, to);
            }
            LiftEvent::CalibrationComplete => {
                info!("CALIB | complete, all legs zeroed");
            }
            LiftEvent::CalibrationTimedOut => {
                warn!("CALIB | timed out, offsets unchanged");
            }
            LiftEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
