//! Packet field addressing: selectors, maskable matches, and the
//! value-or-reference slot shared by actions and instructions.

use byteorder::{BigEndian, WriteBytesExt};

use crate::buffer::{self, Reader};
use crate::error::PofError;
use crate::global::{self, MAX_FIELD_BYTES};

/// Wire size of a `FieldSelector`.
pub const FIELD_SELECTOR_BYTES: usize = 8;
/// Wire size of a `MatchX`.
pub const MATCH_X_BYTES: usize = 40;
/// Wire size of a `ValueOrField` payload (the discriminant byte lives in
/// the enclosing record).
pub const SLOT_BYTES: usize = 8;

/// Addresses a span of packet or metadata bits: protocols are not named,
/// only located.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct FieldSelector {
    /// Field identifier assigned by the controller.
    pub field_id: u16,
    /// Bit offset from the start of the packet (or metadata).
    pub offset: u16,
    /// Span length in bits.
    pub length: u32,
}

impl FieldSelector {
    pub fn parse(r: &mut Reader) -> Result<FieldSelector, PofError> {
        Ok(FieldSelector {
            field_id: r.read_u16()?,
            offset: r.read_u16()?,
            length: r.read_u32()?,
        })
    }

    pub fn marshal(fs: FieldSelector, bytes: &mut Vec<u8>) {
        bytes.write_u16::<BigEndian>(fs.field_id).unwrap();
        bytes.write_u16::<BigEndian>(fs.offset).unwrap();
        bytes.write_u32::<BigEndian>(fs.length).unwrap();
    }
}

/// A selector plus literal value and mask bytes, the unit of a flow entry's
/// match key. Value and mask occupy `MAX_FIELD_BYTES` each on the wire no
/// matter how wide the selected span is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatchX {
    pub selector: FieldSelector,
    pub value: [u8; MAX_FIELD_BYTES],
    pub mask: [u8; MAX_FIELD_BYTES],
}

impl Default for MatchX {
    fn default() -> MatchX {
        MatchX {
            selector: FieldSelector::default(),
            value: [0; MAX_FIELD_BYTES],
            mask: [0; MAX_FIELD_BYTES],
        }
    }
}

impl MatchX {
    pub fn parse(r: &mut Reader) -> Result<MatchX, PofError> {
        let selector = FieldSelector::parse(r)?;
        let mut value = [0; MAX_FIELD_BYTES];
        value.copy_from_slice(r.take(MAX_FIELD_BYTES)?);
        let mut mask = [0; MAX_FIELD_BYTES];
        mask.copy_from_slice(r.take(MAX_FIELD_BYTES)?);
        Ok(MatchX {
            selector: selector,
            value: value,
            mask: mask,
        })
    }

    pub fn marshal(mx: MatchX, bytes: &mut Vec<u8>) {
        FieldSelector::marshal(mx.selector, bytes);
        bytes.extend_from_slice(&mx.value);
        bytes.extend_from_slice(&mx.mask);
    }
}

/// An operand that is either an immediate value or a reference to packet
/// bits. The payload is always `SLOT_BYTES` wide; the enclosing record
/// carries the discriminant byte, exposed here as `kind`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueOrField {
    /// Immediate 32-bit value.
    Value(u32),
    /// Take the operand from the packet at decode time.
    Field(FieldSelector),
    /// No operand. Also the lenient decoding of any discriminant outside
    /// the registered range.
    Absent,
}

impl ValueOrField {
    /// Discriminant byte written into the enclosing record.
    pub fn kind(&self) -> u8 {
        match *self {
            ValueOrField::Value(_) => 0,
            ValueOrField::Field(_) => 1,
            ValueOrField::Absent => 2,
        }
    }

    /// Decode the payload for a previously read discriminant. An
    /// out-of-range discriminant decodes as `Absent`; the payload bytes are
    /// consumed either way, keeping the enclosing record aligned.
    pub fn parse(kind: u8, r: &mut Reader) -> Result<ValueOrField, PofError> {
        match kind {
            0 => {
                let v = r.read_u32()?;
                r.skip(4)?;
                Ok(ValueOrField::Value(v))
            }
            1 => Ok(ValueOrField::Field(FieldSelector::parse(r)?)),
            2 => {
                r.skip(SLOT_BYTES)?;
                Ok(ValueOrField::Absent)
            }
            k => {
                r.skip(SLOT_BYTES)?;
                global::note_lenient_fallback("operand kind", k as u32);
                Ok(ValueOrField::Absent)
            }
        }
    }

    /// Like `parse`, but an out-of-range discriminant is an error rather
    /// than `Absent`.
    pub fn parse_strict(kind: u8, r: &mut Reader) -> Result<ValueOrField, PofError> {
        if kind > 2 {
            return Err(PofError::UnknownTypeTag {
                space: "operand kind",
                tag: kind as u32,
            });
        }
        ValueOrField::parse(kind, r)
    }

    /// Write the fixed-width payload.
    pub fn marshal(vf: ValueOrField, bytes: &mut Vec<u8>) {
        match vf {
            ValueOrField::Value(v) => {
                bytes.write_u32::<BigEndian>(v).unwrap();
                buffer::write_zero(bytes, 4);
            }
            ValueOrField::Field(fs) => FieldSelector::marshal(fs, bytes),
            ValueOrField::Absent => buffer::write_zero(bytes, SLOT_BYTES),
        }
    }
}

/// Write a selector list into a fixed region of `cap` eight-byte slots,
/// zero-filling unused slots. An absent list writes an all-zero region.
/// The declared count must not exceed the list length or the capacity.
pub fn marshal_selector_region(
    num: u8,
    fields: &Option<Vec<FieldSelector>>,
    cap: usize,
    bytes: &mut Vec<u8>,
) -> Result<(), PofError> {
    let list = match *fields {
        None => {
            buffer::write_zero(bytes, cap * FIELD_SELECTOR_BYTES);
            return Ok(());
        }
        Some(ref list) => list,
    };
    let num = num as usize;
    if num > cap {
        return Err(PofError::CountExceedsList {
            what: "match field",
            declared: num,
            actual: cap,
        });
    }
    if num > list.len() {
        return Err(PofError::CountExceedsList {
            what: "match field",
            declared: num,
            actual: list.len(),
        });
    }
    for fs in list.iter().take(num) {
        FieldSelector::marshal(*fs, bytes);
    }
    buffer::write_zero(bytes, (cap - num) * FIELD_SELECTOR_BYTES);
    Ok(())
}

/// Read `cap` selector slots and keep the first `num`.
pub fn parse_selector_region(
    r: &mut Reader,
    num: u8,
    cap: usize,
) -> Result<Vec<FieldSelector>, PofError> {
    let mut fields = Vec::with_capacity(cap);
    for _ in 0..cap {
        fields.push(FieldSelector::parse(r)?);
    }
    fields.truncate(num as usize);
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot_round_trip(vf: ValueOrField) -> ValueOrField {
        let mut bytes = vec![];
        ValueOrField::marshal(vf, &mut bytes);
        assert_eq!(bytes.len(), SLOT_BYTES);
        let mut r = Reader::new(&bytes);
        ValueOrField::parse(vf.kind(), &mut r).unwrap()
    }

    #[test]
    fn slot_round_trips_every_kind() {
        assert_eq!(
            slot_round_trip(ValueOrField::Value(0xdeadbeef)),
            ValueOrField::Value(0xdeadbeef)
        );
        let fs = FieldSelector {
            field_id: 3,
            offset: 96,
            length: 32,
        };
        assert_eq!(slot_round_trip(ValueOrField::Field(fs)), ValueOrField::Field(fs));
        assert_eq!(slot_round_trip(ValueOrField::Absent), ValueOrField::Absent);
    }

    #[test]
    fn out_of_range_kind_is_absent_and_consumes_payload() {
        let bytes = [0xffu8; 8];
        let mut r = Reader::new(&bytes);
        assert_eq!(ValueOrField::parse(7, &mut r).unwrap(), ValueOrField::Absent);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn strict_parse_rejects_out_of_range_kind() {
        let bytes = [0u8; 8];
        let mut r = Reader::new(&bytes);
        assert_eq!(
            ValueOrField::parse_strict(7, &mut r).unwrap_err(),
            PofError::UnknownTypeTag {
                space: "operand kind",
                tag: 7,
            }
        );
    }

    #[test]
    fn match_x_is_forty_bytes() {
        let mx = MatchX {
            selector: FieldSelector {
                field_id: 1,
                offset: 208,
                length: 16,
            },
            value: [0xaa; MAX_FIELD_BYTES],
            mask: [0xff; MAX_FIELD_BYTES],
        };
        let mut bytes = vec![];
        MatchX::marshal(mx, &mut bytes);
        assert_eq!(bytes.len(), MATCH_X_BYTES);
        let mut r = Reader::new(&bytes);
        assert_eq!(MatchX::parse(&mut r).unwrap(), mx);
    }
}
