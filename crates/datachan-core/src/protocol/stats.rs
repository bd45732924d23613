// ============================================
// File: crates/datachan-core/src/protocol/stats.rs
// ============================================
//! # Codec Statistics
//!
//! Lock-free counters updated on every encode/decode. Counters are
//! observational only and never influence packet handling.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::CoreError;

// ============================================
// CodecStats
// ============================================

/// Per-codec traffic and rejection counters.
#[derive(Debug, Default)]
pub struct CodecStats {
    packets_encoded: AtomicU64,
    bytes_encoded: AtomicU64,
    packets_decoded: AtomicU64,
    bytes_decoded: AtomicU64,
    malformed: AtomicU64,
    auth_failures: AtomicU64,
    peer_id_mismatches: AtomicU64,
}

impl CodecStats {
    /// Records a frame produced by `encode`; `bytes` is the payload size.
    pub fn record_encoded(&self, bytes: usize) {
        self.bytes_encoded.fetch_add(bytes as u64, Ordering::Relaxed);
        self.packets_encoded.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a frame accepted by `decode`; `bytes` is the payload size.
    pub fn record_decoded(&self, bytes: usize) {
        self.bytes_decoded.fetch_add(bytes as u64, Ordering::Relaxed);
        self.packets_decoded.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a rejected inbound frame under the matching counter.
    ///
    /// Errors that are not per-packet rejections are ignored.
    pub fn record_rejected(&self, err: &CoreError) {
        let counter = match err {
            CoreError::PacketTooShort { .. } | CoreError::MalformedPacket { .. } => &self.malformed,
            CoreError::AuthenticationFailure => &self.auth_failures,
            CoreError::PeerIdMismatch { .. } => &self.peer_id_mismatches,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time copy of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            packets_encoded: self.packets_encoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            packets_decoded: self.packets_decoded.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            auth_failures: self.auth_failures.load(Ordering::Relaxed),
            peer_id_mismatches: self.peer_id_mismatches.load(Ordering::Relaxed),
        }
    }
}

/// Copy of [`CodecStats`] at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Frames produced.
    pub packets_encoded: u64,
    /// Payload bytes sealed.
    pub bytes_encoded: u64,
    /// Frames accepted.
    pub packets_decoded: u64,
    /// Payload bytes recovered.
    pub bytes_decoded: u64,
    /// Frames dropped as too short or structurally invalid.
    pub malformed: u64,
    /// Frames dropped on tag verification.
    pub auth_failures: u64,
    /// Authenticated frames carrying another peer's id.
    pub peer_id_mismatches: u64,
}

impl StatsSnapshot {
    /// Total inbound frames dropped for any reason.
    #[must_use]
    pub const fn rejected(&self) -> u64 {
        self.malformed + self.auth_failures + self.peer_id_mismatches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datachan_common::PeerId;

    #[test]
    fn test_counters() {
        let stats = CodecStats::default();
        stats.record_encoded(100);
        stats.record_encoded(50);
        stats.record_decoded(10);

        let snap = stats.snapshot();
        assert_eq!(snap.packets_encoded, 2);
        assert_eq!(snap.bytes_encoded, 150);
        assert_eq!(snap.packets_decoded, 1);
        assert_eq!(snap.bytes_decoded, 10);
        assert_eq!(snap.rejected(), 0);
    }

    #[test]
    fn test_rejections_by_kind() {
        let stats = CodecStats::default();
        stats.record_rejected(&CoreError::too_short(21, 3));
        stats.record_rejected(&CoreError::malformed("bad type"));
        stats.record_rejected(&CoreError::AuthenticationFailure);
        stats.record_rejected(&CoreError::PeerIdMismatch {
            expected: PeerId::new(1).unwrap(),
            received: PeerId::new(2).unwrap(),
        });
        // Not a per-packet rejection
        stats.record_rejected(&CoreError::CryptoOperation { context: "seal" });

        let snap = stats.snapshot();
        assert_eq!(snap.malformed, 2);
        assert_eq!(snap.auth_failures, 1);
        assert_eq!(snap.peer_id_mismatches, 1);
        assert_eq!(snap.rejected(), 4);
    }
}
