//! Instructions: the per-flow-entry operations carried by flow mods. Like
//! actions they are fixed-length records, and flow mods carry them in a
//! fixed-capacity slot region sized for the largest instruction.

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::action::{self, Action, ACTION_SLOT_BYTES};
use crate::buffer::{self, Reader};
use crate::error::PofError;
use crate::field::{self, FieldSelector, ValueOrField};
use crate::global::{self, MAX_ACTIONS_PER_INSTRUCTION, MAX_FIELD_BYTES, MAX_MATCH_FIELDS};

/// Bytes of the type/length/pad header every instruction starts with.
pub const INSTRUCTION_HEADER_BYTES: usize = 8;
/// Width of one instruction slot: the largest instruction (`ApplyActions`,
/// 16 bytes of its own plus a full action region) padded to nothing.
pub const INSTRUCTION_SLOT_BYTES: usize = 16 + MAX_ACTIONS_PER_INSTRUCTION * ACTION_SLOT_BYTES;

/// Instruction type registry. Tags start at 1; 0 never names an
/// instruction, which is what lets an all-zero slot read as empty.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InstructionKind {
    GotoTable,
    WriteMetadata,
    WriteActions,
    ApplyActions,
    ClearActions,
    Meter,
    WriteMetadataFromPacket,
    GotoDirectTable,
    ConditionJmp,
    CalculateField,
    MovePacketOffset,
    Experimenter,
}

impl InstructionKind {
    /// Every registered kind, in tag order.
    pub const ALL: [InstructionKind; 12] = [
        InstructionKind::GotoTable,
        InstructionKind::WriteMetadata,
        InstructionKind::WriteActions,
        InstructionKind::ApplyActions,
        InstructionKind::ClearActions,
        InstructionKind::Meter,
        InstructionKind::WriteMetadataFromPacket,
        InstructionKind::GotoDirectTable,
        InstructionKind::ConditionJmp,
        InstructionKind::CalculateField,
        InstructionKind::MovePacketOffset,
        InstructionKind::Experimenter,
    ];

    pub fn from_wire(tag: u16) -> Result<InstructionKind, PofError> {
        let kind = match tag {
            1 => InstructionKind::GotoTable,
            2 => InstructionKind::WriteMetadata,
            3 => InstructionKind::WriteActions,
            4 => InstructionKind::ApplyActions,
            5 => InstructionKind::ClearActions,
            6 => InstructionKind::Meter,
            7 => InstructionKind::WriteMetadataFromPacket,
            8 => InstructionKind::GotoDirectTable,
            9 => InstructionKind::ConditionJmp,
            10 => InstructionKind::CalculateField,
            11 => InstructionKind::MovePacketOffset,
            0xffff => InstructionKind::Experimenter,
            t => {
                return Err(PofError::UnknownTypeTag {
                    space: "instruction type",
                    tag: t as u32,
                })
            }
        };
        Ok(kind)
    }

    pub fn to_wire(self) -> u16 {
        match self {
            InstructionKind::GotoTable => 1,
            InstructionKind::WriteMetadata => 2,
            InstructionKind::WriteActions => 3,
            InstructionKind::ApplyActions => 4,
            InstructionKind::ClearActions => 5,
            InstructionKind::Meter => 6,
            InstructionKind::WriteMetadataFromPacket => 7,
            InstructionKind::GotoDirectTable => 8,
            InstructionKind::ConditionJmp => 9,
            InstructionKind::CalculateField => 10,
            InstructionKind::MovePacketOffset => 11,
            InstructionKind::Experimenter => 0xffff,
        }
    }

    /// Encoded length, header included. Constant per kind.
    pub fn wire_len(self) -> usize {
        match self {
            InstructionKind::GotoTable => 80,
            InstructionKind::WriteMetadata => 32,
            InstructionKind::WriteActions => INSTRUCTION_SLOT_BYTES,
            InstructionKind::ApplyActions => INSTRUCTION_SLOT_BYTES,
            InstructionKind::ClearActions => 16,
            InstructionKind::Meter => 16,
            InstructionKind::WriteMetadataFromPacket => 16,
            InstructionKind::GotoDirectTable => 24,
            InstructionKind::ConditionJmp => 56,
            InstructionKind::CalculateField => 32,
            InstructionKind::MovePacketOffset => 24,
            InstructionKind::Experimenter => 16,
        }
    }
}

/// Arithmetic applied by `CalculateField`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CalcType {
    Add,
    Subtract,
    LeftShift,
    RightShift,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseNor,
}

impl CalcType {
    /// An out-of-range calc type is not worth failing the whole flow mod
    /// over; it decodes as `None` and is tallied.
    pub fn from_wire(tag: u16) -> Option<CalcType> {
        let t = match tag {
            0 => CalcType::Add,
            1 => CalcType::Subtract,
            2 => CalcType::LeftShift,
            3 => CalcType::RightShift,
            4 => CalcType::BitwiseAnd,
            5 => CalcType::BitwiseOr,
            6 => CalcType::BitwiseXor,
            7 => CalcType::BitwiseNor,
            t => {
                global::note_lenient_fallback("calc type", t as u32);
                return None;
            }
        };
        Some(t)
    }

    pub fn to_wire(self) -> u16 {
        match self {
            CalcType::Add => 0,
            CalcType::Subtract => 1,
            CalcType::LeftShift => 2,
            CalcType::RightShift => 3,
            CalcType::BitwiseAnd => 4,
            CalcType::BitwiseOr => 5,
            CalcType::BitwiseXor => 6,
            CalcType::BitwiseNor => 7,
        }
    }
}

/// One per-flow-entry operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Continue matching in `next_table_id`, with the key rebuilt from the
    /// given selectors.
    GotoTable {
        next_table_id: u8,
        match_field_num: u8,
        packet_offset: u16,
        match_fields: Option<Vec<FieldSelector>>,
    },
    /// Write literal bits into metadata.
    WriteMetadata {
        metadata_offset: u16,
        write_length: u16,
        value: [u8; MAX_FIELD_BYTES],
    },
    /// Replace the action set with these actions.
    WriteActions {
        action_num: u8,
        actions: Option<Vec<Action>>,
    },
    /// Run these actions immediately, in order.
    ApplyActions {
        action_num: u8,
        actions: Option<Vec<Action>>,
    },
    /// Empty the action set.
    ClearActions,
    /// Rate-limit through a meter entry.
    Meter { meter_id: u32 },
    /// Copy packet bits into metadata.
    WriteMetadataFromPacket {
        metadata_offset: u16,
        packet_offset: u16,
        write_length: u16,
    },
    /// Jump straight to an entry of a direct table; the entry index is a
    /// literal or taken from the packet.
    GotoDirectTable {
        next_table_id: u8,
        packet_offset: u16,
        index: ValueOrField,
    },
    /// Compare `field1` against `field2` and skip forward or backward by
    /// one of three offsets depending on the sign of the comparison.
    ConditionJmp {
        field1: FieldSelector,
        field2: ValueOrField,
        off1_direction: u8,
        off1: ValueOrField,
        off2_direction: u8,
        off2: ValueOrField,
        off3_direction: u8,
        off3: ValueOrField,
    },
    /// dst = dst op src.
    CalculateField {
        calc_type: Option<CalcType>,
        dst: FieldSelector,
        src: ValueOrField,
    },
    /// Move the packet parsing offset; `direction` 0 is forward, 1 back.
    MovePacketOffset {
        direction: u8,
        value: ValueOrField,
    },
    /// Vendor escape.
    Experimenter { experimenter: u32 },
}

impl Instruction {
    pub fn kind(ins: &Instruction) -> InstructionKind {
        match *ins {
            Instruction::GotoTable { .. } => InstructionKind::GotoTable,
            Instruction::WriteMetadata { .. } => InstructionKind::WriteMetadata,
            Instruction::WriteActions { .. } => InstructionKind::WriteActions,
            Instruction::ApplyActions { .. } => InstructionKind::ApplyActions,
            Instruction::ClearActions => InstructionKind::ClearActions,
            Instruction::Meter { .. } => InstructionKind::Meter,
            Instruction::WriteMetadataFromPacket { .. } => InstructionKind::WriteMetadataFromPacket,
            Instruction::GotoDirectTable { .. } => InstructionKind::GotoDirectTable,
            Instruction::ConditionJmp { .. } => InstructionKind::ConditionJmp,
            Instruction::CalculateField { .. } => InstructionKind::CalculateField,
            Instruction::MovePacketOffset { .. } => InstructionKind::MovePacketOffset,
            Instruction::Experimenter { .. } => InstructionKind::Experimenter,
        }
    }

    /// An all-zero instruction of the given kind.
    pub fn default_for(kind: InstructionKind) -> Instruction {
        match kind {
            InstructionKind::GotoTable => Instruction::GotoTable {
                next_table_id: 0,
                match_field_num: 0,
                packet_offset: 0,
                match_fields: Some(vec![]),
            },
            InstructionKind::WriteMetadata => Instruction::WriteMetadata {
                metadata_offset: 0,
                write_length: 0,
                value: [0; MAX_FIELD_BYTES],
            },
            InstructionKind::WriteActions => Instruction::WriteActions {
                action_num: 0,
                actions: Some(vec![]),
            },
            InstructionKind::ApplyActions => Instruction::ApplyActions {
                action_num: 0,
                actions: Some(vec![]),
            },
            InstructionKind::ClearActions => Instruction::ClearActions,
            InstructionKind::Meter => Instruction::Meter { meter_id: 0 },
            InstructionKind::WriteMetadataFromPacket => Instruction::WriteMetadataFromPacket {
                metadata_offset: 0,
                packet_offset: 0,
                write_length: 0,
            },
            InstructionKind::GotoDirectTable => Instruction::GotoDirectTable {
                next_table_id: 0,
                packet_offset: 0,
                index: ValueOrField::Value(0),
            },
            InstructionKind::ConditionJmp => Instruction::ConditionJmp {
                field1: FieldSelector::default(),
                field2: ValueOrField::Value(0),
                off1_direction: 0,
                off1: ValueOrField::Value(0),
                off2_direction: 0,
                off2: ValueOrField::Value(0),
                off3_direction: 0,
                off3: ValueOrField::Value(0),
            },
            InstructionKind::CalculateField => Instruction::CalculateField {
                calc_type: Some(CalcType::Add),
                dst: FieldSelector::default(),
                src: ValueOrField::Value(0),
            },
            InstructionKind::MovePacketOffset => Instruction::MovePacketOffset {
                direction: 0,
                value: ValueOrField::Value(0),
            },
            InstructionKind::Experimenter => Instruction::Experimenter { experimenter: 0 },
        }
    }

    /// Return the byte-size of an `Instruction`.
    pub fn size_of(ins: &Instruction) -> usize {
        Instruction::kind(ins).wire_len()
    }

    /// Parse one instruction, header first, dispatching on the type tag.
    pub fn parse(r: &mut Reader) -> Result<Instruction, PofError> {
        let tag = r.read_u16()?;
        let _declared_len = r.read_u16()?;
        r.skip(4)?;
        let ins = match InstructionKind::from_wire(tag)? {
            InstructionKind::GotoTable => {
                let next_table_id = r.read_u8()?;
                let match_field_num = r.read_u8()?;
                let packet_offset = r.read_u16()?;
                r.skip(4)?;
                let fields = field::parse_selector_region(r, match_field_num, MAX_MATCH_FIELDS)?;
                Instruction::GotoTable {
                    next_table_id: next_table_id,
                    match_field_num: match_field_num,
                    packet_offset: packet_offset,
                    match_fields: Some(fields),
                }
            }
            InstructionKind::WriteMetadata => {
                let metadata_offset = r.read_u16()?;
                let write_length = r.read_u16()?;
                let mut value = [0; MAX_FIELD_BYTES];
                value.copy_from_slice(r.take(MAX_FIELD_BYTES)?);
                r.skip(4)?;
                Instruction::WriteMetadata {
                    metadata_offset: metadata_offset,
                    write_length: write_length,
                    value: value,
                }
            }
            InstructionKind::WriteActions => {
                let action_num = r.read_u8()?;
                r.skip(7)?;
                let actions = action::parse_region(r, action_num, MAX_ACTIONS_PER_INSTRUCTION)?;
                Instruction::WriteActions {
                    action_num: action_num,
                    actions: Some(actions),
                }
            }
            InstructionKind::ApplyActions => {
                let action_num = r.read_u8()?;
                r.skip(7)?;
                let actions = action::parse_region(r, action_num, MAX_ACTIONS_PER_INSTRUCTION)?;
                Instruction::ApplyActions {
                    action_num: action_num,
                    actions: Some(actions),
                }
            }
            InstructionKind::ClearActions => {
                r.skip(8)?;
                Instruction::ClearActions
            }
            InstructionKind::Meter => {
                let meter_id = r.read_u32()?;
                r.skip(4)?;
                Instruction::Meter { meter_id: meter_id }
            }
            InstructionKind::WriteMetadataFromPacket => {
                let metadata_offset = r.read_u16()?;
                let packet_offset = r.read_u16()?;
                let write_length = r.read_u16()?;
                r.skip(2)?;
                Instruction::WriteMetadataFromPacket {
                    metadata_offset: metadata_offset,
                    packet_offset: packet_offset,
                    write_length: write_length,
                }
            }
            InstructionKind::GotoDirectTable => {
                let next_table_id = r.read_u8()?;
                let index_kind = r.read_u8()?;
                let packet_offset = r.read_u16()?;
                r.skip(4)?;
                Instruction::GotoDirectTable {
                    next_table_id: next_table_id,
                    packet_offset: packet_offset,
                    index: ValueOrField::parse(index_kind, r)?,
                }
            }
            InstructionKind::ConditionJmp => {
                let field2_kind = r.read_u8()?;
                let off1_direction = r.read_u8()?;
                let off1_kind = r.read_u8()?;
                let off2_direction = r.read_u8()?;
                let off2_kind = r.read_u8()?;
                let off3_direction = r.read_u8()?;
                let off3_kind = r.read_u8()?;
                r.skip(1)?;
                Instruction::ConditionJmp {
                    field1: FieldSelector::parse(r)?,
                    field2: ValueOrField::parse(field2_kind, r)?,
                    off1_direction: off1_direction,
                    off1: ValueOrField::parse(off1_kind, r)?,
                    off2_direction: off2_direction,
                    off2: ValueOrField::parse(off2_kind, r)?,
                    off3_direction: off3_direction,
                    off3: ValueOrField::parse(off3_kind, r)?,
                }
            }
            InstructionKind::CalculateField => {
                let calc_type = CalcType::from_wire(r.read_u16()?);
                let src_kind = r.read_u8()?;
                r.skip(5)?;
                Instruction::CalculateField {
                    calc_type: calc_type,
                    dst: FieldSelector::parse(r)?,
                    src: ValueOrField::parse(src_kind, r)?,
                }
            }
            InstructionKind::MovePacketOffset => {
                let direction = r.read_u8()?;
                let value_kind = r.read_u8()?;
                r.skip(6)?;
                Instruction::MovePacketOffset {
                    direction: direction,
                    value: ValueOrField::parse(value_kind, r)?,
                }
            }
            InstructionKind::Experimenter => {
                let experimenter = r.read_u32()?;
                r.skip(4)?;
                Instruction::Experimenter {
                    experimenter: experimenter,
                }
            }
        };
        Ok(ins)
    }

    /// Marshal one instruction, emitting exactly `wire_len` bytes.
    pub fn marshal(ins: Instruction, bytes: &mut Vec<u8>) -> Result<(), PofError> {
        let kind = Instruction::kind(&ins);
        bytes.write_u16::<BigEndian>(kind.to_wire()).unwrap();
        bytes.write_u16::<BigEndian>(kind.wire_len() as u16).unwrap();
        buffer::write_zero(bytes, 4);
        match ins {
            Instruction::GotoTable {
                next_table_id,
                match_field_num,
                packet_offset,
                match_fields,
            } => {
                bytes.write_u8(next_table_id).unwrap();
                bytes.write_u8(match_field_num).unwrap();
                bytes.write_u16::<BigEndian>(packet_offset).unwrap();
                buffer::write_zero(bytes, 4);
                field::marshal_selector_region(
                    match_field_num,
                    &match_fields,
                    MAX_MATCH_FIELDS,
                    bytes,
                )?;
            }
            Instruction::WriteMetadata {
                metadata_offset,
                write_length,
                value,
            } => {
                bytes.write_u16::<BigEndian>(metadata_offset).unwrap();
                bytes.write_u16::<BigEndian>(write_length).unwrap();
                bytes.extend_from_slice(&value);
                buffer::write_zero(bytes, 4);
            }
            Instruction::WriteActions {
                action_num,
                actions,
            }
            | Instruction::ApplyActions {
                action_num,
                actions,
            } => {
                bytes.write_u8(action_num).unwrap();
                buffer::write_zero(bytes, 7);
                action::marshal_region(action_num, &actions, MAX_ACTIONS_PER_INSTRUCTION, bytes)?;
            }
            Instruction::ClearActions => buffer::write_zero(bytes, 8),
            Instruction::Meter { meter_id } => {
                bytes.write_u32::<BigEndian>(meter_id).unwrap();
                buffer::write_zero(bytes, 4);
            }
            Instruction::WriteMetadataFromPacket {
                metadata_offset,
                packet_offset,
                write_length,
            } => {
                bytes.write_u16::<BigEndian>(metadata_offset).unwrap();
                bytes.write_u16::<BigEndian>(packet_offset).unwrap();
                bytes.write_u16::<BigEndian>(write_length).unwrap();
                buffer::write_zero(bytes, 2);
            }
            Instruction::GotoDirectTable {
                next_table_id,
                packet_offset,
                index,
            } => {
                bytes.write_u8(next_table_id).unwrap();
                bytes.write_u8(index.kind()).unwrap();
                bytes.write_u16::<BigEndian>(packet_offset).unwrap();
                buffer::write_zero(bytes, 4);
                ValueOrField::marshal(index, bytes);
            }
            Instruction::ConditionJmp {
                field1,
                field2,
                off1_direction,
                off1,
                off2_direction,
                off2,
                off3_direction,
                off3,
            } => {
                bytes.write_u8(field2.kind()).unwrap();
                bytes.write_u8(off1_direction).unwrap();
                bytes.write_u8(off1.kind()).unwrap();
                bytes.write_u8(off2_direction).unwrap();
                bytes.write_u8(off2.kind()).unwrap();
                bytes.write_u8(off3_direction).unwrap();
                bytes.write_u8(off3.kind()).unwrap();
                buffer::write_zero(bytes, 1);
                FieldSelector::marshal(field1, bytes);
                ValueOrField::marshal(field2, bytes);
                ValueOrField::marshal(off1, bytes);
                ValueOrField::marshal(off2, bytes);
                ValueOrField::marshal(off3, bytes);
            }
            Instruction::CalculateField {
                calc_type,
                dst,
                src,
            } => {
                let tag = calc_type.map(CalcType::to_wire).unwrap_or(0);
                bytes.write_u16::<BigEndian>(tag).unwrap();
                bytes.write_u8(src.kind()).unwrap();
                buffer::write_zero(bytes, 5);
                FieldSelector::marshal(dst, bytes);
                ValueOrField::marshal(src, bytes);
            }
            Instruction::MovePacketOffset { direction, value } => {
                bytes.write_u8(direction).unwrap();
                bytes.write_u8(value.kind()).unwrap();
                buffer::write_zero(bytes, 6);
                ValueOrField::marshal(value, bytes);
            }
            Instruction::Experimenter { experimenter } => {
                bytes.write_u32::<BigEndian>(experimenter).unwrap();
                buffer::write_zero(bytes, 4);
            }
        }
        Ok(())
    }
}

/// Write an instruction list into a region of `cap` slots of
/// `INSTRUCTION_SLOT_BYTES` each, zero-padding each slot tail and any
/// unused slots. An absent list writes an all-zero region.
pub fn marshal_region(
    num: u8,
    instructions: &Option<Vec<Instruction>>,
    cap: usize,
    bytes: &mut Vec<u8>,
) -> Result<(), PofError> {
    let list = match *instructions {
        None => {
            buffer::write_zero(bytes, cap * INSTRUCTION_SLOT_BYTES);
            return Ok(());
        }
        Some(ref list) => list,
    };
    let num = num as usize;
    if num > cap {
        return Err(PofError::CountExceedsList {
            what: "instruction",
            declared: num,
            actual: cap,
        });
    }
    if num > list.len() {
        return Err(PofError::CountExceedsList {
            what: "instruction",
            declared: num,
            actual: list.len(),
        });
    }
    for ins in list.iter().take(num) {
        let start = bytes.len();
        Instruction::marshal(ins.clone(), bytes)?;
        buffer::write_zero(bytes, INSTRUCTION_SLOT_BYTES - (bytes.len() - start));
    }
    buffer::write_zero(bytes, (cap - num) * INSTRUCTION_SLOT_BYTES);
    Ok(())
}

/// Parse an instruction list out of a region of `cap` slots. A slot whose
/// declared length is below the instruction header is empty and ends the
/// list; the kept list is cut down to the declared count.
pub fn parse_region(r: &mut Reader, num: u8, cap: usize) -> Result<Vec<Instruction>, PofError> {
    let region = r.take(cap * INSTRUCTION_SLOT_BYTES)?;
    let mut instructions = Vec::new();
    for i in 0..cap {
        let slot = &region[i * INSTRUCTION_SLOT_BYTES..(i + 1) * INSTRUCTION_SLOT_BYTES];
        if BigEndian::read_u16(&slot[2..4]) < INSTRUCTION_HEADER_BYTES as u16 {
            break;
        }
        let mut slot_r = Reader::new(slot);
        instructions.push(Instruction::parse(&mut slot_r)?);
    }
    instructions.truncate(num as usize);
    Ok(instructions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(ins: Instruction) -> Instruction {
        let mut bytes = vec![];
        Instruction::marshal(ins.clone(), &mut bytes).unwrap();
        assert_eq!(bytes.len(), Instruction::size_of(&ins));
        Instruction::parse(&mut Reader::new(&bytes)).unwrap()
    }

    #[test]
    fn every_kind_encodes_to_its_wire_len() {
        for &kind in InstructionKind::ALL.iter() {
            let ins = Instruction::default_for(kind);
            let mut bytes = vec![];
            Instruction::marshal(ins, &mut bytes).unwrap();
            assert_eq!(bytes.len(), kind.wire_len());
        }
    }

    #[test]
    fn apply_actions_slot_is_the_largest_instruction() {
        assert_eq!(INSTRUCTION_SLOT_BYTES, 304);
        for &kind in InstructionKind::ALL.iter() {
            assert!(kind.wire_len() <= INSTRUCTION_SLOT_BYTES);
        }
    }

    #[test]
    fn goto_table_zero_fills_unused_selector_slots() {
        let fields = vec![
            FieldSelector {
                field_id: 1,
                offset: 0,
                length: 48,
            },
            FieldSelector {
                field_id: 2,
                offset: 48,
                length: 48,
            },
        ];
        let ins = Instruction::GotoTable {
            next_table_id: 3,
            match_field_num: 2,
            packet_offset: 0,
            match_fields: Some(fields),
        };
        let mut bytes = vec![];
        Instruction::marshal(ins.clone(), &mut bytes).unwrap();
        assert_eq!(bytes.len(), 80);
        // two selectors used, six slots of zeros behind them
        assert!(bytes[32..].iter().all(|&b| b == 0));
        assert_eq!(round_trip(ins.clone()), ins);
    }

    #[test]
    fn apply_actions_round_trips_nested_actions() {
        let acts = vec![
            Action::Output {
                port: ValueOrField::Value(2),
                metadata_offset: 0,
                metadata_length: 0,
                packet_offset: 0,
            },
            Action::Counter { counter_id: 9 },
        ];
        let ins = Instruction::ApplyActions {
            action_num: 2,
            actions: Some(acts),
        };
        assert_eq!(round_trip(ins.clone()), ins);
    }

    #[test]
    fn condition_jmp_round_trips_mixed_operands() {
        let ins = Instruction::ConditionJmp {
            field1: FieldSelector {
                field_id: 4,
                offset: 128,
                length: 16,
            },
            field2: ValueOrField::Value(80),
            off1_direction: 0,
            off1: ValueOrField::Value(1),
            off2_direction: 1,
            off2: ValueOrField::Field(FieldSelector {
                field_id: 5,
                offset: 0,
                length: 8,
            }),
            off3_direction: 0,
            off3: ValueOrField::Absent,
        };
        assert_eq!(round_trip(ins.clone()), ins);
    }

    #[test]
    fn out_of_range_calc_type_decodes_as_none() {
        let ins = Instruction::CalculateField {
            calc_type: Some(CalcType::BitwiseXor),
            dst: FieldSelector::default(),
            src: ValueOrField::Value(3),
        };
        let mut bytes = vec![];
        Instruction::marshal(ins, &mut bytes).unwrap();
        // overwrite the calc type with something unregistered
        bytes[8] = 0xff;
        bytes[9] = 0xff;
        match Instruction::parse(&mut Reader::new(&bytes)).unwrap() {
            Instruction::CalculateField { calc_type, .. } => assert_eq!(calc_type, None),
            other => panic!("unexpected instruction: {:?}", other),
        }
    }

    #[test]
    fn region_round_trips_and_terminates_on_empty_slot() {
        let list = vec![
            Instruction::Meter { meter_id: 1 },
            Instruction::ClearActions,
        ];
        let mut bytes = vec![];
        marshal_region(2, &Some(list.clone()), 6, &mut bytes).unwrap();
        assert_eq!(bytes.len(), 6 * INSTRUCTION_SLOT_BYTES);
        let parsed = parse_region(&mut Reader::new(&bytes), 2, 6).unwrap();
        assert_eq!(parsed, list);
    }

    #[test]
    fn region_declared_count_over_capacity_is_an_error() {
        let list = vec![Instruction::ClearActions; 7];
        let mut bytes = vec![];
        assert_eq!(
            marshal_region(7, &Some(list), 6, &mut bytes).unwrap_err(),
            PofError::CountExceedsList {
                what: "instruction",
                declared: 7,
                actual: 6,
            }
        );
    }
}
