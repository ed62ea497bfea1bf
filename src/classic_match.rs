//! The fixed-field match record inherited from classic OpenFlow. POF flow
//! entries match through `field::MatchX` selectors instead; this record
//! survives only as a standalone codec for tooling that still speaks it.

use byteorder::{BigEndian, WriteBytesExt};

use crate::buffer::{self, Reader};
use crate::error::PofError;

/// Wire size of a `ClassicMatch`.
pub const CLASSIC_MATCH_BYTES: usize = 40;

/// Classic twelve-tuple match. `wildcards` bits mark fields to ignore.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ClassicMatch {
    pub wildcards: u32,
    pub in_port: u16,
    pub dl_src: [u8; 6],
    pub dl_dst: [u8; 6],
    pub dl_vlan: u16,
    pub dl_vlan_pcp: u8,
    pub dl_type: u16,
    pub nw_tos: u8,
    pub nw_proto: u8,
    pub nw_src: u32,
    pub nw_dst: u32,
    pub tp_src: u16,
    pub tp_dst: u16,
}

impl ClassicMatch {
    pub fn parse(buf: &[u8]) -> Result<ClassicMatch, PofError> {
        let mut r = Reader::new(buf);
        let wildcards = r.read_u32()?;
        let in_port = r.read_u16()?;
        let mut dl_src = [0; 6];
        dl_src.copy_from_slice(r.take(6)?);
        let mut dl_dst = [0; 6];
        dl_dst.copy_from_slice(r.take(6)?);
        let dl_vlan = r.read_u16()?;
        let dl_vlan_pcp = r.read_u8()?;
        r.skip(1)?;
        let dl_type = r.read_u16()?;
        let nw_tos = r.read_u8()?;
        let nw_proto = r.read_u8()?;
        r.skip(2)?;
        Ok(ClassicMatch {
            wildcards: wildcards,
            in_port: in_port,
            dl_src: dl_src,
            dl_dst: dl_dst,
            dl_vlan: dl_vlan,
            dl_vlan_pcp: dl_vlan_pcp,
            dl_type: dl_type,
            nw_tos: nw_tos,
            nw_proto: nw_proto,
            nw_src: r.read_u32()?,
            nw_dst: r.read_u32()?,
            tp_src: r.read_u16()?,
            tp_dst: r.read_u16()?,
        })
    }

    pub fn marshal(m: ClassicMatch, bytes: &mut Vec<u8>) {
        bytes.write_u32::<BigEndian>(m.wildcards).unwrap();
        bytes.write_u16::<BigEndian>(m.in_port).unwrap();
        bytes.extend_from_slice(&m.dl_src);
        bytes.extend_from_slice(&m.dl_dst);
        bytes.write_u16::<BigEndian>(m.dl_vlan).unwrap();
        bytes.write_u8(m.dl_vlan_pcp).unwrap();
        buffer::write_zero(bytes, 1);
        bytes.write_u16::<BigEndian>(m.dl_type).unwrap();
        bytes.write_u8(m.nw_tos).unwrap();
        bytes.write_u8(m.nw_proto).unwrap();
        buffer::write_zero(bytes, 2);
        bytes.write_u32::<BigEndian>(m.nw_src).unwrap();
        bytes.write_u32::<BigEndian>(m.nw_dst).unwrap();
        bytes.write_u16::<BigEndian>(m.tp_src).unwrap();
        bytes.write_u16::<BigEndian>(m.tp_dst).unwrap();
    }
}
