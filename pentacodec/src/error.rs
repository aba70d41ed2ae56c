//! Structured error taxonomy for the codec core.
//!
//! Mirrors the disposition table from the symbol codec's error design:
//! most variants are surfaced straight to the caller, `Io` wraps the
//! underlying byte source's own failures unchanged, and `Internal` is
//! reserved for contract violations that should be unreachable by
//! construction.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// The character table failed its post-initialization invariant check.
    /// Fatal: callers should treat this as a reason to abort startup.
    #[error("character table initialization invariant violated")]
    TableInitMismatch,

    /// `decode_cipher` was called with a cipher whose top two bits are `00`
    /// (this includes cipher `0`, which must always have been filtered by
    /// the caller beforehand).
    #[error("illegal cipher argument: tag bits are reserved (00)")]
    IllegalArgument,

    /// The wire codec's first byte fell in one of the two ranges reserved
    /// for future framing tiers (`0xC0..=0xDF`, `0xF8..=0xFB`).
    #[error("reserved bit sequence in wire tag byte: 0x{0:02x}")]
    ReservedBitSequence(u8),

    /// A CESU-8 length prefix was negative (other than the `-1` null
    /// sentinel) or exceeded `i32::MAX`.
    #[error("illegal CESU-8 length: {0}")]
    IllegalLength(i64),

    /// A CESU-8 code point assembled from the byte source exceeded the
    /// Basic Multilingual Plane.
    #[error("code point 0x{0:06x} is beyond the BMP")]
    CodePointBeyondBmp(u32),

    /// Propagated unchanged from the underlying byte source / sink.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A contract violation reached through a path the codec's own
    /// invariants should make unreachable (e.g. a 35-bit penta tier whose
    /// top five bits equal neither `/` nor `$` despite `plen == 35`, fed in
    /// directly through the low-level cipher API rather than through the
    /// packer). Treat as a bug report, not a recoverable condition.
    #[error("internal codec invariant violated: {0}")]
    Internal(String),
}
