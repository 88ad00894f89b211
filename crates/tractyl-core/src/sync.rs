// Tractyl Split Sync
// Mirrors the pointer config from the primary half to the secondary half

use thiserror::Error;

use crate::config::{PointerConfig, CONFIG_SIZE};

/// Message id of the config sync transaction
pub const RPC_ID_CONFIG_SYNC: u8 = 0x01;

/// Split link transport errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("split link is not connected")]
    Disconnected,

    #[error("split transaction {0:#04x} failed")]
    TransactionFailed(u8),
}

/// Best-effort message channel to the other half
pub trait SplitLink {
    fn send(&mut self, msg_id: u8, payload: &[u8]) -> Result<(), LinkError>;
}

/// Primary-side sync scheduler.
///
/// Sends whenever the config differs from the last one that went through,
/// and otherwise every `interval_ms` as a keep-alive. The snapshot only
/// moves on a successful send, so a failure is retried on the next tick.
#[derive(Debug, Clone)]
pub struct SyncBridge {
    interval_ms: u32,
    last_sent: Option<PointerConfig>,
    last_sync_ms: u32,
}

impl SyncBridge {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_sent: None,
            last_sync_ms: 0,
        }
    }

    /// Config from the last successful send
    pub fn last_sent(&self) -> Option<PointerConfig> {
        self.last_sent
    }

    /// Returns true when a send went through
    pub fn housekeeping<L: SplitLink>(
        &mut self,
        now_ms: u32,
        config: &PointerConfig,
        link: &mut L,
    ) -> bool {
        let changed = self.last_sent != Some(*config);
        let stale = now_ms.wrapping_sub(self.last_sync_ms) > self.interval_ms;
        if !changed && !stale {
            log::trace!("config sync skipped: unchanged");
            return false;
        }

        match link.send(RPC_ID_CONFIG_SYNC, &config.to_bytes()) {
            Ok(()) => {
                log::trace!("config synced (changed: {})", changed);
                self.last_sent = Some(*config);
                self.last_sync_ms = now_ms;
                true
            }
            Err(e) => {
                log::warn!("config sync failed: {}", e);
                false
            }
        }
    }
}

/// Secondary-side receive: accept only an exactly sized payload
pub fn handle_sync(payload: &[u8]) -> Option<PointerConfig> {
    if payload.len() != CONFIG_SIZE {
        log::debug!(
            "dropping config sync of {} bytes, expected {}",
            payload.len(),
            CONFIG_SIZE
        );
        return None;
    }
    PointerConfig::from_slice(payload)
}

/// Link double that keeps every message it is asked to send
#[derive(Debug, Clone, Default)]
pub struct RecordingLink {
    sent: Vec<(u8, Vec<u8>)>,
    fail: bool,
}

impl RecordingLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following send fail
    pub fn set_fail(&mut self, fail: bool) {
        self.fail = fail;
    }

    pub fn sent(&self) -> &[(u8, Vec<u8>)] {
        &self.sent
    }

    pub fn send_count(&self) -> usize {
        self.sent.len()
    }

    /// Drain the delivered messages, oldest first
    pub fn take_sent(&mut self) -> Vec<(u8, Vec<u8>)> {
        std::mem::take(&mut self.sent)
    }
}

impl SplitLink for RecordingLink {
    fn send(&mut self, msg_id: u8, payload: &[u8]) -> Result<(), LinkError> {
        if self.fail {
            return Err(LinkError::TransactionFailed(msg_id));
        }
        self.sent.push((msg_id, payload.to_vec()));
        Ok(())
    }
}
