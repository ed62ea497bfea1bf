use crate::error::PofError;
use crate::pof_header::PofHeader;

/// POF Message
///
/// Version-agnostic API for handling POF messages at the byte-buffer level.
pub trait PofMessage: Sized {
    /// Return the byte-size of a `PofMessage`.
    fn size_of(msg: &Self) -> usize;
    /// Create a `PofHeader` for the given transaction id and message.
    /// The header's length field is 16 bits wide; a message bigger than
    /// that wraps, since the wire format has no wider length to offer.
    fn header_of(xid: u32, msg: &Self) -> PofHeader;
    /// Return a marshaled buffer containing a POF header and the message
    /// `msg`. The given `xid` is used as-is.
    fn marshal(xid: u32, msg: Self) -> Result<Vec<u8>, PofError>;
    /// Returns a pair `(u32, PofMessage)` of the transaction id and message
    /// parsed from the given POF header `header`, and buffer `buf`.
    fn parse(header: &PofHeader, buf: &[u8]) -> Result<(u32, Self), PofError>;
}
