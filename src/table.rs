//! Flow tables: the table type enum, per-type resource records, and the
//! table creation/removal body carried by table mod messages.

use byteorder::{BigEndian, WriteBytesExt};

use crate::buffer::{self, Reader};
use crate::error::PofError;
use crate::field::{self, FieldSelector};
use crate::global::{MAX_MATCH_FIELDS, TABLE_NAME_BYTES};

/// Wire size of a `TableResource`.
pub const TABLE_RESOURCE_BYTES: usize = 16;
/// Wire size of a `FlowTable`.
pub const FLOW_TABLE_BYTES: usize = 144;

/// Flow table types, in pipeline order. The wire encodes them as their
/// position in this order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TableType {
    /// Masked match.
    Mm,
    /// Longest prefix match.
    Lpm,
    /// Exact match.
    Em,
    /// Linear (direct-indexed) table.
    Linear,
}

impl TableType {
    /// Every table type, in wire order.
    pub const ALL: [TableType; 4] = [TableType::Mm, TableType::Lpm, TableType::Em, TableType::Linear];

    pub fn from_wire(tag: u8) -> Result<TableType, PofError> {
        let t = match tag {
            0 => TableType::Mm,
            1 => TableType::Lpm,
            2 => TableType::Em,
            3 => TableType::Linear,
            t => {
                return Err(PofError::UnknownTypeTag {
                    space: "table type",
                    tag: t as u32,
                })
            }
        };
        Ok(t)
    }

    pub fn to_wire(self) -> u8 {
        match self {
            TableType::Mm => 0,
            TableType::Lpm => 1,
            TableType::Em => 2,
            TableType::Linear => 3,
        }
    }
}

/// What a table mod does to a flow table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TableModCommand {
    Add,
    Modify,
    Delete,
}

impl TableModCommand {
    pub fn from_wire(tag: u8) -> Result<TableModCommand, PofError> {
        let c = match tag {
            0 => TableModCommand::Add,
            1 => TableModCommand::Modify,
            2 => TableModCommand::Delete,
            t => {
                return Err(PofError::UnknownTypeTag {
                    space: "table mod command",
                    tag: t as u32,
                })
            }
        };
        Ok(c)
    }

    pub fn to_wire(self) -> u8 {
        match self {
            TableModCommand::Add => 0,
            TableModCommand::Modify => 1,
            TableModCommand::Delete => 2,
        }
    }
}

/// Capacity a device reports for one table type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TableResource {
    pub table_type: TableType,
    /// How many tables of this type the device offers.
    pub table_num: u8,
    /// Widest supported key, in bits.
    pub key_length: u16,
    /// Total entries across the type's tables.
    pub total_size: u32,
}

impl TableResource {
    pub fn parse(r: &mut Reader) -> Result<TableResource, PofError> {
        let table_type = TableType::from_wire(r.read_u8()?)?;
        let table_num = r.read_u8()?;
        let key_length = r.read_u16()?;
        let total_size = r.read_u32()?;
        r.skip(8)?;
        Ok(TableResource {
            table_type: table_type,
            table_num: table_num,
            key_length: key_length,
            total_size: total_size,
        })
    }

    pub fn marshal(tr: TableResource, bytes: &mut Vec<u8>) {
        bytes.write_u8(tr.table_type.to_wire()).unwrap();
        bytes.write_u8(tr.table_num).unwrap();
        bytes.write_u16::<BigEndian>(tr.key_length).unwrap();
        bytes.write_u32::<BigEndian>(tr.total_size).unwrap();
        buffer::write_zero(bytes, 8);
    }
}

/// The body of a table mod: create, reshape, or remove a flow table. The
/// name and key selectors occupy fixed-width regions so the record is
/// always `FLOW_TABLE_BYTES`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowTable {
    pub command: TableModCommand,
    pub table_id: u8,
    pub table_type: TableType,
    pub match_field_num: u8,
    /// Key width in bits.
    pub key_length: u16,
    /// Entry capacity.
    pub table_size: u32,
    pub name: String,
    pub match_fields: Option<Vec<FieldSelector>>,
}

impl FlowTable {
    pub fn size_of(_: &FlowTable) -> usize {
        FLOW_TABLE_BYTES
    }

    pub fn parse(buf: &[u8]) -> Result<FlowTable, PofError> {
        let mut r = Reader::new(buf);
        let command = TableModCommand::from_wire(r.read_u8()?)?;
        let table_id = r.read_u8()?;
        let table_type = TableType::from_wire(r.read_u8()?)?;
        let match_field_num = r.read_u8()?;
        let key_length = r.read_u16()?;
        r.skip(2)?;
        let table_size = r.read_u32()?;
        r.skip(4)?;
        let raw_name = r.take(TABLE_NAME_BYTES)?;
        let end = raw_name.iter().position(|&b| b == 0).unwrap_or(TABLE_NAME_BYTES);
        let name = String::from_utf8_lossy(&raw_name[..end]).into_owned();
        let fields = field::parse_selector_region(&mut r, match_field_num, MAX_MATCH_FIELDS)?;
        Ok(FlowTable {
            command: command,
            table_id: table_id,
            table_type: table_type,
            match_field_num: match_field_num,
            key_length: key_length,
            table_size: table_size,
            name: name,
            match_fields: Some(fields),
        })
    }

    pub fn marshal(ft: FlowTable, bytes: &mut Vec<u8>) -> Result<(), PofError> {
        bytes.write_u8(ft.command.to_wire()).unwrap();
        bytes.write_u8(ft.table_id).unwrap();
        bytes.write_u8(ft.table_type.to_wire()).unwrap();
        bytes.write_u8(ft.match_field_num).unwrap();
        bytes.write_u16::<BigEndian>(ft.key_length).unwrap();
        buffer::write_zero(bytes, 2);
        bytes.write_u32::<BigEndian>(ft.table_size).unwrap();
        buffer::write_zero(bytes, 4);
        buffer::write_fixed(bytes, ft.name.as_bytes(), TABLE_NAME_BYTES);
        field::marshal_selector_region(ft.match_field_num, &ft.match_fields, MAX_MATCH_FIELDS, bytes)
    }
}
