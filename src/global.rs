//! Protocol-wide constants and codec observability.

use std::sync::atomic::{AtomicU64, Ordering};

/// Wire version carried by every message envelope.
pub const POF_VERSION: u8 = 0x04;

/// Width of a match value or mask, in bytes.
pub const MAX_FIELD_BYTES: usize = 16;
/// Match fields a flow entry or table key can carry.
pub const MAX_MATCH_FIELDS: usize = 8;
/// Instructions a flow entry can carry.
pub const MAX_INSTRUCTIONS: usize = 6;
/// Actions an apply/write-actions instruction can carry.
pub const MAX_ACTIONS_PER_INSTRUCTION: usize = 6;
/// Actions a group entry can carry.
pub const MAX_ACTIONS_PER_GROUP: usize = 6;
/// Flow table types a device reports resources for.
pub const TABLE_TYPE_COUNT: usize = 4;
/// Packet bytes carried by an encoded packet-in.
pub const MAX_PACKET_IN_BYTES: usize = 2048;
/// Fixed width of a port name on the wire.
pub const PORT_NAME_BYTES: usize = 32;
/// Fixed width of a flow table name on the wire.
pub const TABLE_NAME_BYTES: usize = 64;

static LENIENT_FALLBACKS: AtomicU64 = AtomicU64::new(0);

/// Number of lenient decode fallbacks taken since process start: slot
/// discriminants and calc types outside their registered range that were
/// decoded as "absent" rather than rejected.
pub fn lenient_fallbacks() -> u64 {
    LENIENT_FALLBACKS.load(Ordering::Relaxed)
}

pub(crate) fn note_lenient_fallback(space: &'static str, tag: u32) {
    LENIENT_FALLBACKS.fetch_add(1, Ordering::Relaxed);
    log::debug!("out-of-range {} tag {}, decoding as absent", space, tag);
}
