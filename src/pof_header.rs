use std::sync::atomic::{AtomicU32, Ordering};

use byteorder::{BigEndian, WriteBytesExt};

use crate::buffer::Reader;
use crate::error::PofError;
use crate::pof0x04::MsgKind;

/// POF Header
///
/// The first eight bytes of every message. This is parsed to determine the
/// type and length of the remaining message, so that it can be properly
/// handled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PofHeader {
    version: u8,
    typ: u8,
    length: u16,
    xid: u32,
}

impl PofHeader {
    /// Create a `PofHeader` out of the arguments.
    pub fn new(version: u8, typ: u8, length: u16, xid: u32) -> PofHeader {
        PofHeader {
            version: version,
            typ: typ,
            length: length,
            xid: xid,
        }
    }

    /// Return the byte-size of a `PofHeader`.
    pub fn size() -> usize {
        8
    }

    /// Fills a message buffer with the header fields of a `PofHeader`.
    pub fn marshal(bytes: &mut Vec<u8>, header: PofHeader) {
        bytes.write_u8(header.version).unwrap();
        bytes.write_u8(header.typ).unwrap();
        bytes.write_u16::<BigEndian>(header.length).unwrap();
        bytes.write_u32::<BigEndian>(header.xid).unwrap();
    }

    /// Takes a message buffer (sized for a `PofHeader`) and returns a
    /// `PofHeader`.
    pub fn parse(buf: [u8; 8]) -> PofHeader {
        let mut r = Reader::new(&buf);
        // an 8-byte input cannot produce a short read
        PofHeader {
            version: r.read_u8().unwrap_or(0),
            typ: r.read_u8().unwrap_or(0),
            length: r.read_u16().unwrap_or(0),
            xid: r.read_u32().unwrap_or(0),
        }
    }

    /// Return the `version` field of a header.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Return the raw message type byte of a header.
    pub fn type_byte(&self) -> u8 {
        self.typ
    }

    /// Return the message kind of a header, or `UnknownTypeTag` for a type
    /// byte outside the registered set.
    pub fn kind(&self) -> Result<MsgKind, PofError> {
        MsgKind::from_wire(self.typ)
    }

    /// Return the `length` field of a header. Includes the length of the
    /// header itself.
    pub fn length(&self) -> usize {
        self.length as usize
    }

    /// Return the `xid` field of a header, the transaction id associated
    /// with this message. Replies use the same id to facilitate pairing.
    pub fn xid(&self) -> u32 {
        self.xid
    }
}

/// Source of transaction ids. Allocation is explicit: marshaling never
/// rewrites the xid a caller passes, so replies can be paired against
/// requests that used ids from elsewhere.
#[derive(Debug, Default)]
pub struct XidAllocator {
    next: AtomicU32,
}

impl XidAllocator {
    pub fn new() -> XidAllocator {
        XidAllocator {
            next: AtomicU32::new(0),
        }
    }

    /// Return the next transaction id. Safe to call from multiple threads;
    /// ids are unique until the counter wraps.
    pub fn next(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn header_round_trip() {
        let hdr = PofHeader::new(0x04, 15, 2192, 0x01020304);
        let mut bytes = vec![];
        PofHeader::marshal(&mut bytes, hdr);
        assert_eq!(bytes, vec![0x04, 0x0f, 0x08, 0x90, 0x01, 0x02, 0x03, 0x04]);
        let mut raw = [0; 8];
        raw.copy_from_slice(&bytes);
        assert_eq!(PofHeader::parse(raw), hdr);
    }

    #[test]
    fn xids_are_monotonic() {
        let alloc = XidAllocator::new();
        assert_eq!(alloc.next(), 0);
        assert_eq!(alloc.next(), 1);
        assert_eq!(alloc.next(), 2);
    }

    #[test]
    fn xids_are_unique_across_threads() {
        let alloc = Arc::new(XidAllocator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let alloc = Arc::clone(&alloc);
                thread::spawn(move || (0..256).map(|_| alloc.next()).collect::<Vec<u32>>())
            })
            .collect();
        let mut seen: Vec<u32> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 4 * 256);
    }
}
