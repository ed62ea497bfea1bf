//! Actions: the per-packet operations carried by instructions, groups, and
//! packet-out messages. Every action has a fixed wire length; action lists
//! travel in fixed-capacity slot regions so the enclosing record never
//! changes size.

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::buffer::{self, Reader};
use crate::error::PofError;
use crate::field::{FieldSelector, MatchX, ValueOrField};
use crate::global::MAX_FIELD_BYTES;

/// Bytes of the type/length/pad header every action starts with.
pub const ACTION_HEADER_BYTES: usize = 8;
/// Width of one action slot in a slot region: the largest action
/// (`SetField`) padded to nothing.
pub const ACTION_SLOT_BYTES: usize = 48;

/// Action type registry. Tags are a dense range plus the experimenter
/// escape; anything else is `UnknownTypeTag`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Output,
    SetField,
    SetFieldFromMetadata,
    ModifyField,
    AddField,
    DeleteField,
    CalculateChecksum,
    Group,
    Drop,
    PacketIn,
    Counter,
    Experimenter,
}

impl ActionKind {
    /// Every registered kind, in tag order.
    pub const ALL: [ActionKind; 12] = [
        ActionKind::Output,
        ActionKind::SetField,
        ActionKind::SetFieldFromMetadata,
        ActionKind::ModifyField,
        ActionKind::AddField,
        ActionKind::DeleteField,
        ActionKind::CalculateChecksum,
        ActionKind::Group,
        ActionKind::Drop,
        ActionKind::PacketIn,
        ActionKind::Counter,
        ActionKind::Experimenter,
    ];

    pub fn from_wire(tag: u16) -> Result<ActionKind, PofError> {
        let kind = match tag {
            0 => ActionKind::Output,
            1 => ActionKind::SetField,
            2 => ActionKind::SetFieldFromMetadata,
            3 => ActionKind::ModifyField,
            4 => ActionKind::AddField,
            5 => ActionKind::DeleteField,
            6 => ActionKind::CalculateChecksum,
            7 => ActionKind::Group,
            8 => ActionKind::Drop,
            9 => ActionKind::PacketIn,
            10 => ActionKind::Counter,
            0xffff => ActionKind::Experimenter,
            t => {
                return Err(PofError::UnknownTypeTag {
                    space: "action type",
                    tag: t as u32,
                })
            }
        };
        Ok(kind)
    }

    pub fn to_wire(self) -> u16 {
        match self {
            ActionKind::Output => 0,
            ActionKind::SetField => 1,
            ActionKind::SetFieldFromMetadata => 2,
            ActionKind::ModifyField => 3,
            ActionKind::AddField => 4,
            ActionKind::DeleteField => 5,
            ActionKind::CalculateChecksum => 6,
            ActionKind::Group => 7,
            ActionKind::Drop => 8,
            ActionKind::PacketIn => 9,
            ActionKind::Counter => 10,
            ActionKind::Experimenter => 0xffff,
        }
    }

    /// Encoded length, header included. Constant per kind.
    pub fn wire_len(self) -> usize {
        match self {
            ActionKind::Output => 24,
            ActionKind::SetField => 48,
            ActionKind::SetFieldFromMetadata => 24,
            ActionKind::ModifyField => 24,
            ActionKind::AddField => 32,
            ActionKind::DeleteField => 24,
            ActionKind::CalculateChecksum => 24,
            ActionKind::Group => 16,
            ActionKind::Drop => 16,
            ActionKind::PacketIn => 16,
            ActionKind::Counter => 16,
            ActionKind::Experimenter => 16,
        }
    }
}

/// One per-packet operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Forward the packet, with `metadata_length` bits of metadata from
    /// `metadata_offset` prepended and the packet taken from `packet_offset`.
    Output {
        port: ValueOrField,
        metadata_offset: u16,
        metadata_length: u16,
        packet_offset: u16,
    },
    /// Overwrite the matched span with the masked value.
    SetField(MatchX),
    /// Overwrite a packet span with bits taken from metadata.
    SetFieldFromMetadata {
        field: FieldSelector,
        metadata_offset: u16,
    },
    /// Add a signed increment to the field's current value.
    ModifyField {
        field: FieldSelector,
        increment: i32,
    },
    /// Insert `length` bits of `value` at bit `position`.
    AddField {
        field_id: u16,
        position: u16,
        length: u32,
        value: [u8; MAX_FIELD_BYTES],
    },
    /// Remove bits at `position`; the span width is a literal or taken from
    /// the packet.
    DeleteField {
        position: u16,
        length: ValueOrField,
    },
    /// Recompute a checksum over `[calc_start_position, +calc_length)` and
    /// store it at `[checksum_position, +checksum_length)`. The two kind
    /// bytes say whether each region lives in the packet (0) or metadata (1).
    CalculateChecksum {
        checksum_pos_kind: u8,
        calc_pos_kind: u8,
        checksum_position: u16,
        checksum_length: u16,
        calc_start_position: u16,
        calc_length: u16,
    },
    /// Hand the packet to a group entry.
    Group { group_id: u32 },
    /// Drop the packet, noting why.
    Drop { reason: u32 },
    /// Punt the packet to the controller.
    PacketIn { reason: u32 },
    /// Bump a counter.
    Counter { counter_id: u32 },
    /// Vendor escape.
    Experimenter { experimenter: u32 },
}

impl Action {
    pub fn kind(act: &Action) -> ActionKind {
        match *act {
            Action::Output { .. } => ActionKind::Output,
            Action::SetField(_) => ActionKind::SetField,
            Action::SetFieldFromMetadata { .. } => ActionKind::SetFieldFromMetadata,
            Action::ModifyField { .. } => ActionKind::ModifyField,
            Action::AddField { .. } => ActionKind::AddField,
            Action::DeleteField { .. } => ActionKind::DeleteField,
            Action::CalculateChecksum { .. } => ActionKind::CalculateChecksum,
            Action::Group { .. } => ActionKind::Group,
            Action::Drop { .. } => ActionKind::Drop,
            Action::PacketIn { .. } => ActionKind::PacketIn,
            Action::Counter { .. } => ActionKind::Counter,
            Action::Experimenter { .. } => ActionKind::Experimenter,
        }
    }

    /// An all-zero action of the given kind.
    pub fn default_for(kind: ActionKind) -> Action {
        match kind {
            ActionKind::Output => Action::Output {
                port: ValueOrField::Value(0),
                metadata_offset: 0,
                metadata_length: 0,
                packet_offset: 0,
            },
            ActionKind::SetField => Action::SetField(MatchX::default()),
            ActionKind::SetFieldFromMetadata => Action::SetFieldFromMetadata {
                field: FieldSelector::default(),
                metadata_offset: 0,
            },
            ActionKind::ModifyField => Action::ModifyField {
                field: FieldSelector::default(),
                increment: 0,
            },
            ActionKind::AddField => Action::AddField {
                field_id: 0,
                position: 0,
                length: 0,
                value: [0; MAX_FIELD_BYTES],
            },
            ActionKind::DeleteField => Action::DeleteField {
                position: 0,
                length: ValueOrField::Value(0),
            },
            ActionKind::CalculateChecksum => Action::CalculateChecksum {
                checksum_pos_kind: 0,
                calc_pos_kind: 0,
                checksum_position: 0,
                checksum_length: 0,
                calc_start_position: 0,
                calc_length: 0,
            },
            ActionKind::Group => Action::Group { group_id: 0 },
            ActionKind::Drop => Action::Drop { reason: 0 },
            ActionKind::PacketIn => Action::PacketIn { reason: 0 },
            ActionKind::Counter => Action::Counter { counter_id: 0 },
            ActionKind::Experimenter => Action::Experimenter { experimenter: 0 },
        }
    }

    /// Return the byte-size of an `Action`.
    pub fn size_of(act: &Action) -> usize {
        Action::kind(act).wire_len()
    }

    /// Parse one action, header first, dispatching on the type tag.
    pub fn parse(r: &mut Reader) -> Result<Action, PofError> {
        let tag = r.read_u16()?;
        let _declared_len = r.read_u16()?;
        r.skip(4)?;
        let act = match ActionKind::from_wire(tag)? {
            ActionKind::Output => {
                let port_kind = r.read_u8()?;
                r.skip(1)?;
                let metadata_offset = r.read_u16()?;
                let metadata_length = r.read_u16()?;
                let packet_offset = r.read_u16()?;
                Action::Output {
                    port: ValueOrField::parse(port_kind, r)?,
                    metadata_offset: metadata_offset,
                    metadata_length: metadata_length,
                    packet_offset: packet_offset,
                }
            }
            ActionKind::SetField => Action::SetField(MatchX::parse(r)?),
            ActionKind::SetFieldFromMetadata => {
                let field = FieldSelector::parse(r)?;
                let metadata_offset = r.read_u16()?;
                r.skip(6)?;
                Action::SetFieldFromMetadata {
                    field: field,
                    metadata_offset: metadata_offset,
                }
            }
            ActionKind::ModifyField => {
                let field = FieldSelector::parse(r)?;
                let increment = r.read_i32()?;
                r.skip(4)?;
                Action::ModifyField {
                    field: field,
                    increment: increment,
                }
            }
            ActionKind::AddField => {
                let field_id = r.read_u16()?;
                let position = r.read_u16()?;
                let length = r.read_u32()?;
                let mut value = [0; MAX_FIELD_BYTES];
                value.copy_from_slice(r.take(MAX_FIELD_BYTES)?);
                Action::AddField {
                    field_id: field_id,
                    position: position,
                    length: length,
                    value: value,
                }
            }
            ActionKind::DeleteField => {
                let position = r.read_u16()?;
                let length_kind = r.read_u8()?;
                r.skip(5)?;
                Action::DeleteField {
                    position: position,
                    length: ValueOrField::parse(length_kind, r)?,
                }
            }
            ActionKind::CalculateChecksum => {
                let checksum_pos_kind = r.read_u8()?;
                let calc_pos_kind = r.read_u8()?;
                let act = Action::CalculateChecksum {
                    checksum_pos_kind: checksum_pos_kind,
                    calc_pos_kind: calc_pos_kind,
                    checksum_position: r.read_u16()?,
                    checksum_length: r.read_u16()?,
                    calc_start_position: r.read_u16()?,
                    calc_length: r.read_u16()?,
                };
                r.skip(6)?;
                act
            }
            ActionKind::Group => {
                let group_id = r.read_u32()?;
                r.skip(4)?;
                Action::Group { group_id: group_id }
            }
            ActionKind::Drop => {
                let reason = r.read_u32()?;
                r.skip(4)?;
                Action::Drop { reason: reason }
            }
            ActionKind::PacketIn => {
                let reason = r.read_u32()?;
                r.skip(4)?;
                Action::PacketIn { reason: reason }
            }
            ActionKind::Counter => {
                let counter_id = r.read_u32()?;
                r.skip(4)?;
                Action::Counter { counter_id: counter_id }
            }
            ActionKind::Experimenter => {
                let experimenter = r.read_u32()?;
                r.skip(4)?;
                Action::Experimenter {
                    experimenter: experimenter,
                }
            }
        };
        Ok(act)
    }

    /// Marshal one action, emitting exactly `wire_len` bytes.
    pub fn marshal(act: Action, bytes: &mut Vec<u8>) {
        let kind = Action::kind(&act);
        bytes.write_u16::<BigEndian>(kind.to_wire()).unwrap();
        bytes.write_u16::<BigEndian>(kind.wire_len() as u16).unwrap();
        buffer::write_zero(bytes, 4);
        match act {
            Action::Output {
                port,
                metadata_offset,
                metadata_length,
                packet_offset,
            } => {
                bytes.write_u8(port.kind()).unwrap();
                buffer::write_zero(bytes, 1);
                bytes.write_u16::<BigEndian>(metadata_offset).unwrap();
                bytes.write_u16::<BigEndian>(metadata_length).unwrap();
                bytes.write_u16::<BigEndian>(packet_offset).unwrap();
                ValueOrField::marshal(port, bytes);
            }
            Action::SetField(mx) => MatchX::marshal(mx, bytes),
            Action::SetFieldFromMetadata {
                field,
                metadata_offset,
            } => {
                FieldSelector::marshal(field, bytes);
                bytes.write_u16::<BigEndian>(metadata_offset).unwrap();
                buffer::write_zero(bytes, 6);
            }
            Action::ModifyField { field, increment } => {
                FieldSelector::marshal(field, bytes);
                bytes.write_i32::<BigEndian>(increment).unwrap();
                buffer::write_zero(bytes, 4);
            }
            Action::AddField {
                field_id,
                position,
                length,
                value,
            } => {
                bytes.write_u16::<BigEndian>(field_id).unwrap();
                bytes.write_u16::<BigEndian>(position).unwrap();
                bytes.write_u32::<BigEndian>(length).unwrap();
                bytes.extend_from_slice(&value);
            }
            Action::DeleteField { position, length } => {
                bytes.write_u16::<BigEndian>(position).unwrap();
                bytes.write_u8(length.kind()).unwrap();
                buffer::write_zero(bytes, 5);
                ValueOrField::marshal(length, bytes);
            }
            Action::CalculateChecksum {
                checksum_pos_kind,
                calc_pos_kind,
                checksum_position,
                checksum_length,
                calc_start_position,
                calc_length,
            } => {
                bytes.write_u8(checksum_pos_kind).unwrap();
                bytes.write_u8(calc_pos_kind).unwrap();
                bytes.write_u16::<BigEndian>(checksum_position).unwrap();
                bytes.write_u16::<BigEndian>(checksum_length).unwrap();
                bytes.write_u16::<BigEndian>(calc_start_position).unwrap();
                bytes.write_u16::<BigEndian>(calc_length).unwrap();
                buffer::write_zero(bytes, 6);
            }
            Action::Group { group_id } => {
                bytes.write_u32::<BigEndian>(group_id).unwrap();
                buffer::write_zero(bytes, 4);
            }
            Action::Drop { reason } => {
                bytes.write_u32::<BigEndian>(reason).unwrap();
                buffer::write_zero(bytes, 4);
            }
            Action::PacketIn { reason } => {
                bytes.write_u32::<BigEndian>(reason).unwrap();
                buffer::write_zero(bytes, 4);
            }
            Action::Counter { counter_id } => {
                bytes.write_u32::<BigEndian>(counter_id).unwrap();
                buffer::write_zero(bytes, 4);
            }
            Action::Experimenter { experimenter } => {
                bytes.write_u32::<BigEndian>(experimenter).unwrap();
                buffer::write_zero(bytes, 4);
            }
        }
    }
}

/// Write an action list into a region of `cap` slots of `ACTION_SLOT_BYTES`
/// each. Each action sits at the head of its slot with the tail zeroed;
/// unused slots are all zero. An absent list writes an all-zero region. The
/// declared count must not exceed the list length or the capacity.
pub fn marshal_region(
    num: u8,
    actions: &Option<Vec<Action>>,
    cap: usize,
    bytes: &mut Vec<u8>,
) -> Result<(), PofError> {
    let list = match *actions {
        None => {
            buffer::write_zero(bytes, cap * ACTION_SLOT_BYTES);
            return Ok(());
        }
        Some(ref list) => list,
    };
    let num = num as usize;
    if num > cap {
        return Err(PofError::CountExceedsList {
            what: "action",
            declared: num,
            actual: cap,
        });
    }
    if num > list.len() {
        return Err(PofError::CountExceedsList {
            what: "action",
            declared: num,
            actual: list.len(),
        });
    }
    for act in list.iter().take(num) {
        let start = bytes.len();
        Action::marshal(act.clone(), bytes);
        buffer::write_zero(bytes, ACTION_SLOT_BYTES - (bytes.len() - start));
    }
    buffer::write_zero(bytes, (cap - num) * ACTION_SLOT_BYTES);
    Ok(())
}

/// Parse an action list out of a region of `cap` slots. A slot whose
/// declared length is below the action header is empty and ends the list;
/// the kept list is cut down to the declared count.
pub fn parse_region(r: &mut Reader, num: u8, cap: usize) -> Result<Vec<Action>, PofError> {
    let region = r.take(cap * ACTION_SLOT_BYTES)?;
    let mut actions = Vec::new();
    for i in 0..cap {
        let slot = &region[i * ACTION_SLOT_BYTES..(i + 1) * ACTION_SLOT_BYTES];
        if BigEndian::read_u16(&slot[2..4]) < ACTION_HEADER_BYTES as u16 {
            break;
        }
        let mut slot_r = Reader::new(slot);
        actions.push(Action::parse(&mut slot_r)?);
    }
    actions.truncate(num as usize);
    Ok(actions)
}
