//! POF protocol version 0x04: message bodies and the `message::Message`
//! enum tying them to the envelope.

use byteorder::{BigEndian, WriteBytesExt};

use crate::bits::{bit, test_bit};
use crate::buffer::{self, Reader};
use crate::error::PofError;
use crate::field::MatchX;
use crate::global::{
    MAX_ACTIONS_PER_GROUP, MAX_INSTRUCTIONS, MAX_MATCH_FIELDS, MAX_PACKET_IN_BYTES,
    PORT_NAME_BYTES,
};
use crate::action::{self, Action};
use crate::instruction::{self, Instruction};
use crate::table::{FlowTable, TableResource, TableType};

/// Message type registry. The gaps are tags the protocol reserves but does
/// not speak (flow removed, port mod, multipart, queue, role, async); they
/// decode as `UnknownTypeTag` like any stray byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MsgKind {
    Hello,
    Error,
    EchoRequest,
    EchoReply,
    Experimenter,
    FeaturesRequest,
    FeaturesReply,
    GetConfigRequest,
    GetConfigReply,
    SetConfig,
    PacketIn,
    PortStatus,
    ResourceReport,
    PacketOut,
    FlowMod,
    GroupMod,
    TableMod,
    BarrierRequest,
    BarrierReply,
    MeterMod,
    CounterMod,
    CounterRequest,
    CounterReply,
}

impl MsgKind {
    /// Every registered kind, in tag order.
    pub const ALL: [MsgKind; 23] = [
        MsgKind::Hello,
        MsgKind::Error,
        MsgKind::EchoRequest,
        MsgKind::EchoReply,
        MsgKind::Experimenter,
        MsgKind::FeaturesRequest,
        MsgKind::FeaturesReply,
        MsgKind::GetConfigRequest,
        MsgKind::GetConfigReply,
        MsgKind::SetConfig,
        MsgKind::PacketIn,
        MsgKind::PortStatus,
        MsgKind::ResourceReport,
        MsgKind::PacketOut,
        MsgKind::FlowMod,
        MsgKind::GroupMod,
        MsgKind::TableMod,
        MsgKind::BarrierRequest,
        MsgKind::BarrierReply,
        MsgKind::MeterMod,
        MsgKind::CounterMod,
        MsgKind::CounterRequest,
        MsgKind::CounterReply,
    ];

    pub fn from_wire(tag: u8) -> Result<MsgKind, PofError> {
        let kind = match tag {
            0 => MsgKind::Hello,
            1 => MsgKind::Error,
            2 => MsgKind::EchoRequest,
            3 => MsgKind::EchoReply,
            4 => MsgKind::Experimenter,
            5 => MsgKind::FeaturesRequest,
            6 => MsgKind::FeaturesReply,
            7 => MsgKind::GetConfigRequest,
            8 => MsgKind::GetConfigReply,
            9 => MsgKind::SetConfig,
            10 => MsgKind::PacketIn,
            12 => MsgKind::PortStatus,
            13 => MsgKind::ResourceReport,
            14 => MsgKind::PacketOut,
            15 => MsgKind::FlowMod,
            16 => MsgKind::GroupMod,
            18 => MsgKind::TableMod,
            21 => MsgKind::BarrierRequest,
            22 => MsgKind::BarrierReply,
            30 => MsgKind::MeterMod,
            31 => MsgKind::CounterMod,
            32 => MsgKind::CounterRequest,
            33 => MsgKind::CounterReply,
            t => {
                return Err(PofError::UnknownTypeTag {
                    space: "message type",
                    tag: t as u32,
                })
            }
        };
        Ok(kind)
    }

    pub fn to_wire(self) -> u8 {
        match self {
            MsgKind::Hello => 0,
            MsgKind::Error => 1,
            MsgKind::EchoRequest => 2,
            MsgKind::EchoReply => 3,
            MsgKind::Experimenter => 4,
            MsgKind::FeaturesRequest => 5,
            MsgKind::FeaturesReply => 6,
            MsgKind::GetConfigRequest => 7,
            MsgKind::GetConfigReply => 8,
            MsgKind::SetConfig => 9,
            MsgKind::PacketIn => 10,
            MsgKind::PortStatus => 12,
            MsgKind::ResourceReport => 13,
            MsgKind::PacketOut => 14,
            MsgKind::FlowMod => 15,
            MsgKind::GroupMod => 16,
            MsgKind::TableMod => 18,
            MsgKind::BarrierRequest => 21,
            MsgKind::BarrierReply => 22,
            MsgKind::MeterMod => 30,
            MsgKind::CounterMod => 31,
            MsgKind::CounterRequest => 32,
            MsgKind::CounterReply => 33,
        }
    }
}

/// Common API for message bodies (see `MsgKind` enum).
pub trait MessageType: Sized {
    /// Return the byte-size of a message body.
    fn size_of(msg: &Self) -> usize;
    /// Parse a buffer into a message body.
    fn parse(buf: &[u8]) -> Result<Self, PofError>;
    /// Marshal a message body into a `u8` buffer.
    fn marshal(msg: Self, bytes: &mut Vec<u8>) -> Result<(), PofError>;
}

/// An error the device reports back, carrying the xid of the offender.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorMsg {
    pub err_type: u16,
    pub err_code: u16,
    pub device_id: u32,
    /// Leading bytes of the offending message.
    pub data: Vec<u8>,
}

impl MessageType for ErrorMsg {
    fn size_of(msg: &ErrorMsg) -> usize {
        8 + msg.data.len()
    }

    fn parse(buf: &[u8]) -> Result<ErrorMsg, PofError> {
        let mut r = Reader::new(buf);
        Ok(ErrorMsg {
            err_type: r.read_u16()?,
            err_code: r.read_u16()?,
            device_id: r.read_u32()?,
            data: r.rest().to_vec(),
        })
    }

    fn marshal(msg: ErrorMsg, bytes: &mut Vec<u8>) -> Result<(), PofError> {
        bytes.write_u16::<BigEndian>(msg.err_type).unwrap();
        bytes.write_u16::<BigEndian>(msg.err_code).unwrap();
        bytes.write_u32::<BigEndian>(msg.device_id).unwrap();
        bytes.extend_from_slice(&msg.data);
        Ok(())
    }
}

/// Vendor escape at the message level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExperimenterMsg {
    pub experimenter: u32,
    pub data: Vec<u8>,
}

impl MessageType for ExperimenterMsg {
    fn size_of(msg: &ExperimenterMsg) -> usize {
        8 + msg.data.len()
    }

    fn parse(buf: &[u8]) -> Result<ExperimenterMsg, PofError> {
        let mut r = Reader::new(buf);
        let experimenter = r.read_u32()?;
        r.skip(4)?;
        Ok(ExperimenterMsg {
            experimenter: experimenter,
            data: r.rest().to_vec(),
        })
    }

    fn marshal(msg: ExperimenterMsg, bytes: &mut Vec<u8>) -> Result<(), PofError> {
        bytes.write_u32::<BigEndian>(msg.experimenter).unwrap();
        buffer::write_zero(bytes, 4);
        bytes.extend_from_slice(&msg.data);
        Ok(())
    }
}

/// Capabilities supported by the device.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub flow_stats: bool,
    pub table_stats: bool,
    pub port_stats: bool,
    pub group_stats: bool,
    pub ip_reasm: bool,
    pub queue_stats: bool,
    pub port_blocked: bool,
}

impl Capabilities {
    fn of_int(d: u32) -> Capabilities {
        Capabilities {
            flow_stats: test_bit(0, d as u64),
            table_stats: test_bit(1, d as u64),
            port_stats: test_bit(2, d as u64),
            group_stats: test_bit(3, d as u64),
            ip_reasm: test_bit(5, d as u64),
            queue_stats: test_bit(6, d as u64),
            port_blocked: test_bit(8, d as u64),
        }
    }

    fn to_int(c: Capabilities) -> u32 {
        let mut d = 0u64;
        d = bit(0, d, c.flow_stats);
        d = bit(1, d, c.table_stats);
        d = bit(2, d, c.port_stats);
        d = bit(3, d, c.group_stats);
        d = bit(5, d, c.ip_reasm);
        d = bit(6, d, c.queue_stats);
        d = bit(8, d, c.port_blocked);
        d as u32
    }
}

/// Device features, the reply to a features request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitchFeatures {
    pub device_id: u32,
    pub slot_id: u16,
    pub port_num: u16,
    pub table_num: u16,
    pub capabilities: Capabilities,
}

impl MessageType for SwitchFeatures {
    fn size_of(_: &SwitchFeatures) -> usize {
        16
    }

    fn parse(buf: &[u8]) -> Result<SwitchFeatures, PofError> {
        let mut r = Reader::new(buf);
        let device_id = r.read_u32()?;
        let slot_id = r.read_u16()?;
        let port_num = r.read_u16()?;
        let table_num = r.read_u16()?;
        r.skip(2)?;
        Ok(SwitchFeatures {
            device_id: device_id,
            slot_id: slot_id,
            port_num: port_num,
            table_num: table_num,
            capabilities: Capabilities::of_int(r.read_u32()?),
        })
    }

    fn marshal(msg: SwitchFeatures, bytes: &mut Vec<u8>) -> Result<(), PofError> {
        bytes.write_u32::<BigEndian>(msg.device_id).unwrap();
        bytes.write_u16::<BigEndian>(msg.slot_id).unwrap();
        bytes.write_u16::<BigEndian>(msg.port_num).unwrap();
        bytes.write_u16::<BigEndian>(msg.table_num).unwrap();
        buffer::write_zero(bytes, 2);
        bytes
            .write_u32::<BigEndian>(Capabilities::to_int(msg.capabilities))
            .unwrap();
        Ok(())
    }
}

/// Device configuration, carried by get-config replies and set-config.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct SwitchConfig {
    pub flags: u16,
    pub miss_send_len: u16,
}

impl MessageType for SwitchConfig {
    fn size_of(_: &SwitchConfig) -> usize {
        8
    }

    fn parse(buf: &[u8]) -> Result<SwitchConfig, PofError> {
        let mut r = Reader::new(buf);
        let flags = r.read_u16()?;
        let miss_send_len = r.read_u16()?;
        r.skip(4)?;
        Ok(SwitchConfig {
            flags: flags,
            miss_send_len: miss_send_len,
        })
    }

    fn marshal(msg: SwitchConfig, bytes: &mut Vec<u8>) -> Result<(), PofError> {
        bytes.write_u16::<BigEndian>(msg.flags).unwrap();
        bytes.write_u16::<BigEndian>(msg.miss_send_len).unwrap();
        buffer::write_zero(bytes, 4);
        Ok(())
    }
}

/// The reason a packet arrives at the controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PacketInReason {
    NoMatch,
    Action,
    InvalidTtl,
}

impl PacketInReason {
    fn from_wire(tag: u8) -> Result<PacketInReason, PofError> {
        let reason = match tag {
            0 => PacketInReason::NoMatch,
            1 => PacketInReason::Action,
            2 => PacketInReason::InvalidTtl,
            t => {
                return Err(PofError::UnknownTypeTag {
                    space: "packet-in reason",
                    tag: t as u32,
                })
            }
        };
        Ok(reason)
    }

    fn to_wire(self) -> u8 {
        match self {
            PacketInReason::NoMatch => 0,
            PacketInReason::Action => 1,
            PacketInReason::InvalidTtl => 2,
        }
    }
}

/// A packet handed to the controller. The encoded form always carries
/// `MAX_PACKET_IN_BYTES` of packet data, zero-padded; `total_length` says
/// how much of it is real.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketIn {
    pub buffer_id: u32,
    pub total_length: u16,
    pub reason: PacketInReason,
    pub table_id: u8,
    pub cookie: u64,
    pub device_id: u32,
    pub slot_port_id: u32,
    pub data: Vec<u8>,
}

impl MessageType for PacketIn {
    fn size_of(_: &PacketIn) -> usize {
        24 + MAX_PACKET_IN_BYTES
    }

    fn parse(buf: &[u8]) -> Result<PacketIn, PofError> {
        let mut r = Reader::new(buf);
        let buffer_id = r.read_u32()?;
        let total_length = r.read_u16()?;
        let reason = PacketInReason::from_wire(r.read_u8()?)?;
        let table_id = r.read_u8()?;
        let cookie = r.read_u64()?;
        let device_id = r.read_u32()?;
        let slot_port_id = r.read_u32()?;
        let data = r.take(total_length as usize)?.to_vec();
        Ok(PacketIn {
            buffer_id: buffer_id,
            total_length: total_length,
            reason: reason,
            table_id: table_id,
            cookie: cookie,
            device_id: device_id,
            slot_port_id: slot_port_id,
            data: data,
        })
    }

    fn marshal(msg: PacketIn, bytes: &mut Vec<u8>) -> Result<(), PofError> {
        bytes.write_u32::<BigEndian>(msg.buffer_id).unwrap();
        bytes.write_u16::<BigEndian>(msg.total_length).unwrap();
        bytes.write_u8(msg.reason.to_wire()).unwrap();
        bytes.write_u8(msg.table_id).unwrap();
        bytes.write_u64::<BigEndian>(msg.cookie).unwrap();
        bytes.write_u32::<BigEndian>(msg.device_id).unwrap();
        bytes.write_u32::<BigEndian>(msg.slot_port_id).unwrap();
        buffer::write_fixed(bytes, &msg.data, MAX_PACKET_IN_BYTES);
        Ok(())
    }
}

/// Flags to indicate behavior of a physical port.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct PortConfig {
    pub down: bool,
    pub no_recv: bool,
    pub no_fwd: bool,
    pub no_packet_in: bool,
}

impl PortConfig {
    fn of_int(d: u32) -> PortConfig {
        PortConfig {
            down: test_bit(0, d as u64),
            no_recv: test_bit(2, d as u64),
            no_fwd: test_bit(5, d as u64),
            no_packet_in: test_bit(6, d as u64),
        }
    }

    fn to_int(c: PortConfig) -> u32 {
        let mut d = 0u64;
        d = bit(0, d, c.down);
        d = bit(2, d, c.no_recv);
        d = bit(5, d, c.no_fwd);
        d = bit(6, d, c.no_packet_in);
        d as u32
    }
}

/// Current state of a physical port. Not configurable by the controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct PortState {
    pub link_down: bool,
    pub blocked: bool,
    pub live: bool,
}

impl PortState {
    fn of_int(d: u32) -> PortState {
        PortState {
            link_down: test_bit(0, d as u64),
            blocked: test_bit(1, d as u64),
            live: test_bit(2, d as u64),
        }
    }

    fn to_int(s: PortState) -> u32 {
        let mut d = 0u64;
        d = bit(0, d, s.link_down);
        d = bit(1, d, s.blocked);
        d = bit(2, d, s.live);
        d as u32
    }
}

/// Wire size of a `PhysicalPort`.
pub const PHYSICAL_PORT_BYTES: usize = 88;

/// Description of a physical port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhysicalPort {
    pub slot_port_id: u32,
    pub device_id: u32,
    pub hw_addr: [u8; 6],
    pub name: String,
    pub config: PortConfig,
    pub state: PortState,
    /// Current, advertised, supported, and peer feature bitmaps, kept raw.
    pub curr: u32,
    pub advertised: u32,
    pub supported: u32,
    pub peer: u32,
    pub current_speed: u32,
    pub max_speed: u32,
    /// Whether the port participates in the POF pipeline at all.
    pub openflow_enable: bool,
}

impl PhysicalPort {
    pub fn parse(r: &mut Reader) -> Result<PhysicalPort, PofError> {
        let slot_port_id = r.read_u32()?;
        let device_id = r.read_u32()?;
        let mut hw_addr = [0; 6];
        hw_addr.copy_from_slice(r.take(6)?);
        r.skip(2)?;
        let raw_name = r.take(PORT_NAME_BYTES)?;
        let end = raw_name.iter().position(|&b| b == 0).unwrap_or(PORT_NAME_BYTES);
        let name = String::from_utf8_lossy(&raw_name[..end]).into_owned();
        let config = PortConfig::of_int(r.read_u32()?);
        let state = PortState::of_int(r.read_u32()?);
        let curr = r.read_u32()?;
        let advertised = r.read_u32()?;
        let supported = r.read_u32()?;
        let peer = r.read_u32()?;
        let current_speed = r.read_u32()?;
        let max_speed = r.read_u32()?;
        let openflow_enable = r.read_u8()? != 0;
        r.skip(7)?;
        Ok(PhysicalPort {
            slot_port_id: slot_port_id,
            device_id: device_id,
            hw_addr: hw_addr,
            name: name,
            config: config,
            state: state,
            curr: curr,
            advertised: advertised,
            supported: supported,
            peer: peer,
            current_speed: current_speed,
            max_speed: max_speed,
            openflow_enable: openflow_enable,
        })
    }

    pub fn marshal(port: PhysicalPort, bytes: &mut Vec<u8>) {
        bytes.write_u32::<BigEndian>(port.slot_port_id).unwrap();
        bytes.write_u32::<BigEndian>(port.device_id).unwrap();
        bytes.extend_from_slice(&port.hw_addr);
        buffer::write_zero(bytes, 2);
        buffer::write_fixed(bytes, port.name.as_bytes(), PORT_NAME_BYTES);
        bytes
            .write_u32::<BigEndian>(PortConfig::to_int(port.config))
            .unwrap();
        bytes
            .write_u32::<BigEndian>(PortState::to_int(port.state))
            .unwrap();
        bytes.write_u32::<BigEndian>(port.curr).unwrap();
        bytes.write_u32::<BigEndian>(port.advertised).unwrap();
        bytes.write_u32::<BigEndian>(port.supported).unwrap();
        bytes.write_u32::<BigEndian>(port.peer).unwrap();
        bytes.write_u32::<BigEndian>(port.current_speed).unwrap();
        bytes.write_u32::<BigEndian>(port.max_speed).unwrap();
        bytes.write_u8(port.openflow_enable as u8).unwrap();
        buffer::write_zero(bytes, 7);
    }
}

/// What changed about a physical port.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PortReason {
    Add,
    Delete,
    Modify,
}

impl PortReason {
    fn from_wire(tag: u8) -> Result<PortReason, PofError> {
        let reason = match tag {
            0 => PortReason::Add,
            1 => PortReason::Delete,
            2 => PortReason::Modify,
            t => {
                return Err(PofError::UnknownTypeTag {
                    space: "port status reason",
                    tag: t as u32,
                })
            }
        };
        Ok(reason)
    }

    fn to_wire(self) -> u8 {
        match self {
            PortReason::Add => 0,
            PortReason::Delete => 1,
            PortReason::Modify => 2,
        }
    }
}

/// A physical port has changed on the device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortStatus {
    pub reason: PortReason,
    pub desc: PhysicalPort,
}

impl MessageType for PortStatus {
    fn size_of(_: &PortStatus) -> usize {
        8 + PHYSICAL_PORT_BYTES
    }

    fn parse(buf: &[u8]) -> Result<PortStatus, PofError> {
        let mut r = Reader::new(buf);
        let reason = PortReason::from_wire(r.read_u8()?)?;
        r.skip(7)?;
        Ok(PortStatus {
            reason: reason,
            desc: PhysicalPort::parse(&mut r)?,
        })
    }

    fn marshal(msg: PortStatus, bytes: &mut Vec<u8>) -> Result<(), PofError> {
        bytes.write_u8(msg.reason.to_wire()).unwrap();
        buffer::write_zero(bytes, 7);
        PhysicalPort::marshal(msg.desc, bytes);
        Ok(())
    }
}

/// Table capacity report, one `TableResource` per table type in wire order.
/// A record out of order is `TableTypeMismatch`, both ways.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceReport {
    /// 0 = flow table resources, the only kind defined so far.
    pub resource_type: u8,
    pub slot_id: u16,
    pub counter_num: u32,
    pub meter_num: u32,
    pub group_num: u32,
    pub tables: Vec<TableResource>,
}

impl MessageType for ResourceReport {
    fn size_of(_: &ResourceReport) -> usize {
        16 + TableType::ALL.len() * crate::table::TABLE_RESOURCE_BYTES
    }

    fn parse(buf: &[u8]) -> Result<ResourceReport, PofError> {
        let mut r = Reader::new(buf);
        let resource_type = r.read_u8()?;
        r.skip(1)?;
        let slot_id = r.read_u16()?;
        let counter_num = r.read_u32()?;
        let meter_num = r.read_u32()?;
        let group_num = r.read_u32()?;
        let mut tables = Vec::with_capacity(TableType::ALL.len());
        for (i, _) in TableType::ALL.iter().enumerate() {
            let tr = TableResource::parse(&mut r)?;
            if tr.table_type.to_wire() as usize != i {
                return Err(PofError::TableTypeMismatch {
                    index: i,
                    found: tr.table_type.to_wire(),
                });
            }
            tables.push(tr);
        }
        Ok(ResourceReport {
            resource_type: resource_type,
            slot_id: slot_id,
            counter_num: counter_num,
            meter_num: meter_num,
            group_num: group_num,
            tables: tables,
        })
    }

    fn marshal(msg: ResourceReport, bytes: &mut Vec<u8>) -> Result<(), PofError> {
        bytes.write_u8(msg.resource_type).unwrap();
        buffer::write_zero(bytes, 1);
        bytes.write_u16::<BigEndian>(msg.slot_id).unwrap();
        bytes.write_u32::<BigEndian>(msg.counter_num).unwrap();
        bytes.write_u32::<BigEndian>(msg.meter_num).unwrap();
        bytes.write_u32::<BigEndian>(msg.group_num).unwrap();
        for i in 0..TableType::ALL.len() {
            match msg.tables.get(i) {
                Some(tr) => {
                    if tr.table_type.to_wire() as usize != i {
                        return Err(PofError::TableTypeMismatch {
                            index: i,
                            found: tr.table_type.to_wire(),
                        });
                    }
                    TableResource::marshal(*tr, bytes);
                }
                // absent report for a table type: all zeros
                None => buffer::write_zero(bytes, crate::table::TABLE_RESOURCE_BYTES),
            }
        }
        Ok(())
    }
}

/// A packet pushed from the controller out through the device pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketOut {
    pub buffer_id: u32,
    pub in_port: u32,
    pub action_num: u8,
    pub actions: Option<Vec<Action>>,
    pub data: Vec<u8>,
}

impl MessageType for PacketOut {
    fn size_of(msg: &PacketOut) -> usize {
        12 + MAX_ACTIONS_PER_GROUP * action::ACTION_SLOT_BYTES + msg.data.len()
    }

    fn parse(buf: &[u8]) -> Result<PacketOut, PofError> {
        let mut r = Reader::new(buf);
        let buffer_id = r.read_u32()?;
        let in_port = r.read_u32()?;
        let action_num = r.read_u8()?;
        r.skip(3)?;
        let actions = action::parse_region(&mut r, action_num, MAX_ACTIONS_PER_GROUP)?;
        Ok(PacketOut {
            buffer_id: buffer_id,
            in_port: in_port,
            action_num: action_num,
            actions: Some(actions),
            data: r.rest().to_vec(),
        })
    }

    fn marshal(msg: PacketOut, bytes: &mut Vec<u8>) -> Result<(), PofError> {
        bytes.write_u32::<BigEndian>(msg.buffer_id).unwrap();
        bytes.write_u32::<BigEndian>(msg.in_port).unwrap();
        bytes.write_u8(msg.action_num).unwrap();
        buffer::write_zero(bytes, 3);
        action::marshal_region(msg.action_num, &msg.actions, MAX_ACTIONS_PER_GROUP, bytes)?;
        bytes.extend_from_slice(&msg.data);
        Ok(())
    }
}

/// Type of modification to perform on a flow table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlowModCommand {
    Add,
    Modify,
    ModifyStrict,
    Delete,
    DeleteStrict,
}

impl FlowModCommand {
    fn from_wire(tag: u8) -> Result<FlowModCommand, PofError> {
        let c = match tag {
            0 => FlowModCommand::Add,
            1 => FlowModCommand::Modify,
            2 => FlowModCommand::ModifyStrict,
            3 => FlowModCommand::Delete,
            4 => FlowModCommand::DeleteStrict,
            t => {
                return Err(PofError::UnknownTypeTag {
                    space: "flow mod command",
                    tag: t as u32,
                })
            }
        };
        Ok(c)
    }

    fn to_wire(self) -> u8 {
        match self {
            FlowModCommand::Add => 0,
            FlowModCommand::Modify => 1,
            FlowModCommand::ModifyStrict => 2,
            FlowModCommand::Delete => 3,
            FlowModCommand::DeleteStrict => 4,
        }
    }
}

/// Bytes of a flow mod body: fixed head, the match region, and the
/// instruction region.
pub const FLOW_MOD_BODY_BYTES: usize = 40
    + MAX_MATCH_FIELDS * crate::field::MATCH_X_BYTES
    + MAX_INSTRUCTIONS * instruction::INSTRUCTION_SLOT_BYTES;

/// A flow entry modification. Encodes to `FLOW_MOD_BODY_BYTES` no matter
/// how much of the match and instruction capacity is used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowMod {
    pub command: FlowModCommand,
    pub match_field_num: u8,
    pub instruction_num: u8,
    pub counter_id: u32,
    pub cookie: u64,
    pub cookie_mask: u64,
    pub table_id: u8,
    pub table_type: TableType,
    pub idle_timeout: u16,
    pub hard_timeout: u16,
    pub priority: u16,
    /// Entry index within the table.
    pub index: u32,
    pub matches: Option<Vec<MatchX>>,
    pub instructions: Option<Vec<Instruction>>,
}

fn marshal_match_region(
    num: u8,
    matches: &Option<Vec<MatchX>>,
    bytes: &mut Vec<u8>,
) -> Result<(), PofError> {
    let list = match *matches {
        None => {
            buffer::write_zero(bytes, MAX_MATCH_FIELDS * crate::field::MATCH_X_BYTES);
            return Ok(());
        }
        Some(ref list) => list,
    };
    let num = num as usize;
    if num > MAX_MATCH_FIELDS {
        return Err(PofError::CountExceedsList {
            what: "match field",
            declared: num,
            actual: MAX_MATCH_FIELDS,
        });
    }
    if num > list.len() {
        return Err(PofError::CountExceedsList {
            what: "match field",
            declared: num,
            actual: list.len(),
        });
    }
    for mx in list.iter().take(num) {
        MatchX::marshal(*mx, bytes);
    }
    buffer::write_zero(bytes, (MAX_MATCH_FIELDS - num) * crate::field::MATCH_X_BYTES);
    Ok(())
}

fn parse_match_region(r: &mut Reader, num: u8) -> Result<Vec<MatchX>, PofError> {
    let mut matches = Vec::with_capacity(MAX_MATCH_FIELDS);
    for _ in 0..MAX_MATCH_FIELDS {
        matches.push(MatchX::parse(r)?);
    }
    matches.truncate(num as usize);
    Ok(matches)
}

impl MessageType for FlowMod {
    fn size_of(_: &FlowMod) -> usize {
        FLOW_MOD_BODY_BYTES
    }

    fn parse(buf: &[u8]) -> Result<FlowMod, PofError> {
        let mut r = Reader::new(buf);
        let command = FlowModCommand::from_wire(r.read_u8()?)?;
        let match_field_num = r.read_u8()?;
        let instruction_num = r.read_u8()?;
        r.skip(1)?;
        let counter_id = r.read_u32()?;
        let cookie = r.read_u64()?;
        let cookie_mask = r.read_u64()?;
        let table_id = r.read_u8()?;
        let table_type = TableType::from_wire(r.read_u8()?)?;
        let idle_timeout = r.read_u16()?;
        let hard_timeout = r.read_u16()?;
        let priority = r.read_u16()?;
        let index = r.read_u32()?;
        r.skip(4)?;
        let matches = parse_match_region(&mut r, match_field_num)?;
        let instructions = instruction::parse_region(&mut r, instruction_num, MAX_INSTRUCTIONS)?;
        Ok(FlowMod {
            command: command,
            match_field_num: match_field_num,
            instruction_num: instruction_num,
            counter_id: counter_id,
            cookie: cookie,
            cookie_mask: cookie_mask,
            table_id: table_id,
            table_type: table_type,
            idle_timeout: idle_timeout,
            hard_timeout: hard_timeout,
            priority: priority,
            index: index,
            matches: Some(matches),
            instructions: Some(instructions),
        })
    }

    fn marshal(msg: FlowMod, bytes: &mut Vec<u8>) -> Result<(), PofError> {
        bytes.write_u8(msg.command.to_wire()).unwrap();
        bytes.write_u8(msg.match_field_num).unwrap();
        bytes.write_u8(msg.instruction_num).unwrap();
        buffer::write_zero(bytes, 1);
        bytes.write_u32::<BigEndian>(msg.counter_id).unwrap();
        bytes.write_u64::<BigEndian>(msg.cookie).unwrap();
        bytes.write_u64::<BigEndian>(msg.cookie_mask).unwrap();
        bytes.write_u8(msg.table_id).unwrap();
        bytes.write_u8(msg.table_type.to_wire()).unwrap();
        bytes.write_u16::<BigEndian>(msg.idle_timeout).unwrap();
        bytes.write_u16::<BigEndian>(msg.hard_timeout).unwrap();
        bytes.write_u16::<BigEndian>(msg.priority).unwrap();
        bytes.write_u32::<BigEndian>(msg.index).unwrap();
        buffer::write_zero(bytes, 4);
        marshal_match_region(msg.match_field_num, &msg.matches, bytes)?;
        instruction::marshal_region(msg.instruction_num, &msg.instructions, MAX_INSTRUCTIONS, bytes)
    }
}

/// What a group mod does to a group entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GroupModCommand {
    Add,
    Modify,
    Delete,
}

impl GroupModCommand {
    fn from_wire(tag: u8) -> Result<GroupModCommand, PofError> {
        let c = match tag {
            0 => GroupModCommand::Add,
            1 => GroupModCommand::Modify,
            2 => GroupModCommand::Delete,
            t => {
                return Err(PofError::UnknownTypeTag {
                    space: "group mod command",
                    tag: t as u32,
                })
            }
        };
        Ok(c)
    }

    fn to_wire(self) -> u8 {
        match self {
            GroupModCommand::Add => 0,
            GroupModCommand::Modify => 1,
            GroupModCommand::Delete => 2,
        }
    }
}

/// How a group picks among its action buckets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GroupType {
    All,
    Select,
    Indirect,
    FastFailover,
}

impl GroupType {
    fn from_wire(tag: u8) -> Result<GroupType, PofError> {
        let t = match tag {
            0 => GroupType::All,
            1 => GroupType::Select,
            2 => GroupType::Indirect,
            3 => GroupType::FastFailover,
            t => {
                return Err(PofError::UnknownTypeTag {
                    space: "group type",
                    tag: t as u32,
                })
            }
        };
        Ok(t)
    }

    fn to_wire(self) -> u8 {
        match self {
            GroupType::All => 0,
            GroupType::Select => 1,
            GroupType::Indirect => 2,
            GroupType::FastFailover => 3,
        }
    }
}

/// A group entry modification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupMod {
    pub command: GroupModCommand,
    pub group_type: GroupType,
    pub action_num: u8,
    pub group_id: u32,
    pub counter_id: u32,
    pub actions: Option<Vec<Action>>,
}

impl MessageType for GroupMod {
    fn size_of(_: &GroupMod) -> usize {
        16 + MAX_ACTIONS_PER_GROUP * action::ACTION_SLOT_BYTES
    }

    fn parse(buf: &[u8]) -> Result<GroupMod, PofError> {
        let mut r = Reader::new(buf);
        let command = GroupModCommand::from_wire(r.read_u8()?)?;
        let group_type = GroupType::from_wire(r.read_u8()?)?;
        let action_num = r.read_u8()?;
        r.skip(1)?;
        let group_id = r.read_u32()?;
        let counter_id = r.read_u32()?;
        r.skip(4)?;
        let actions = action::parse_region(&mut r, action_num, MAX_ACTIONS_PER_GROUP)?;
        Ok(GroupMod {
            command: command,
            group_type: group_type,
            action_num: action_num,
            group_id: group_id,
            counter_id: counter_id,
            actions: Some(actions),
        })
    }

    fn marshal(msg: GroupMod, bytes: &mut Vec<u8>) -> Result<(), PofError> {
        bytes.write_u8(msg.command.to_wire()).unwrap();
        bytes.write_u8(msg.group_type.to_wire()).unwrap();
        bytes.write_u8(msg.action_num).unwrap();
        buffer::write_zero(bytes, 1);
        bytes.write_u32::<BigEndian>(msg.group_id).unwrap();
        bytes.write_u32::<BigEndian>(msg.counter_id).unwrap();
        buffer::write_zero(bytes, 4);
        action::marshal_region(msg.action_num, &msg.actions, MAX_ACTIONS_PER_GROUP, bytes)
    }
}

/// What a meter mod does to a meter entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeterModCommand {
    Add,
    Modify,
    Delete,
}

impl MeterModCommand {
    fn from_wire(tag: u8) -> Result<MeterModCommand, PofError> {
        let c = match tag {
            0 => MeterModCommand::Add,
            1 => MeterModCommand::Modify,
            2 => MeterModCommand::Delete,
            t => {
                return Err(PofError::UnknownTypeTag {
                    space: "meter mod command",
                    tag: t as u32,
                })
            }
        };
        Ok(c)
    }

    fn to_wire(self) -> u8 {
        match self {
            MeterModCommand::Add => 0,
            MeterModCommand::Modify => 1,
            MeterModCommand::Delete => 2,
        }
    }
}

/// A rate meter modification. `rate` is in kbps.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MeterMod {
    pub command: MeterModCommand,
    pub rate: u16,
    pub meter_id: u32,
}

impl MessageType for MeterMod {
    fn size_of(_: &MeterMod) -> usize {
        8
    }

    fn parse(buf: &[u8]) -> Result<MeterMod, PofError> {
        let mut r = Reader::new(buf);
        let command = MeterModCommand::from_wire(r.read_u8()?)?;
        r.skip(1)?;
        Ok(MeterMod {
            command: command,
            rate: r.read_u16()?,
            meter_id: r.read_u32()?,
        })
    }

    fn marshal(msg: MeterMod, bytes: &mut Vec<u8>) -> Result<(), PofError> {
        bytes.write_u8(msg.command.to_wire()).unwrap();
        buffer::write_zero(bytes, 1);
        bytes.write_u16::<BigEndian>(msg.rate).unwrap();
        bytes.write_u32::<BigEndian>(msg.meter_id).unwrap();
        Ok(())
    }
}

/// What a counter message does to a counter entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CounterCommand {
    Add,
    Delete,
    Clear,
    Query,
}

impl CounterCommand {
    fn from_wire(tag: u8) -> Result<CounterCommand, PofError> {
        let c = match tag {
            0 => CounterCommand::Add,
            1 => CounterCommand::Delete,
            2 => CounterCommand::Clear,
            3 => CounterCommand::Query,
            t => {
                return Err(PofError::UnknownTypeTag {
                    space: "counter command",
                    tag: t as u32,
                })
            }
        };
        Ok(c)
    }

    fn to_wire(self) -> u8 {
        match self {
            CounterCommand::Add => 0,
            CounterCommand::Delete => 1,
            CounterCommand::Clear => 2,
            CounterCommand::Query => 3,
        }
    }
}

/// A counter entry, shared by counter mod, request, and reply messages.
/// Requests leave the counts zero; replies fill them in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Counter {
    pub command: CounterCommand,
    pub counter_id: u32,
    pub packet_count: u64,
    pub byte_count: u64,
}

impl MessageType for Counter {
    fn size_of(_: &Counter) -> usize {
        24
    }

    fn parse(buf: &[u8]) -> Result<Counter, PofError> {
        let mut r = Reader::new(buf);
        let command = CounterCommand::from_wire(r.read_u8()?)?;
        r.skip(3)?;
        Ok(Counter {
            command: command,
            counter_id: r.read_u32()?,
            packet_count: r.read_u64()?,
            byte_count: r.read_u64()?,
        })
    }

    fn marshal(msg: Counter, bytes: &mut Vec<u8>) -> Result<(), PofError> {
        bytes.write_u8(msg.command.to_wire()).unwrap();
        buffer::write_zero(bytes, 3);
        bytes.write_u32::<BigEndian>(msg.counter_id).unwrap();
        bytes.write_u64::<BigEndian>(msg.packet_count).unwrap();
        bytes.write_u64::<BigEndian>(msg.byte_count).unwrap();
        Ok(())
    }
}

/// Encapsulates handling of messages implementing the `MessageType` trait.
pub mod message {
    use super::*;
    use crate::error::PofError;
    use crate::global::POF_VERSION;
    use crate::pof_header::PofHeader;
    use crate::pof_message::PofMessage;

    /// Abstractions of POF messages mapping to message kinds.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Message {
        Hello,
        Error(ErrorMsg),
        EchoRequest(Vec<u8>),
        EchoReply(Vec<u8>),
        Experimenter(ExperimenterMsg),
        FeaturesRequest,
        FeaturesReply(SwitchFeatures),
        GetConfigRequest,
        GetConfigReply(SwitchConfig),
        SetConfig(SwitchConfig),
        PacketIn(PacketIn),
        PortStatus(PortStatus),
        ResourceReport(ResourceReport),
        PacketOut(PacketOut),
        FlowMod(FlowMod),
        GroupMod(GroupMod),
        TableMod(FlowTable),
        BarrierRequest,
        BarrierReply,
        MeterMod(MeterMod),
        CounterMod(Counter),
        CounterRequest(Counter),
        CounterReply(Counter),
    }

    impl Message {
        /// Map `Message` to its `MsgKind`.
        pub fn msg_kind_of_message(msg: &Message) -> MsgKind {
            match *msg {
                Message::Hello => MsgKind::Hello,
                Message::Error(_) => MsgKind::Error,
                Message::EchoRequest(_) => MsgKind::EchoRequest,
                Message::EchoReply(_) => MsgKind::EchoReply,
                Message::Experimenter(_) => MsgKind::Experimenter,
                Message::FeaturesRequest => MsgKind::FeaturesRequest,
                Message::FeaturesReply(_) => MsgKind::FeaturesReply,
                Message::GetConfigRequest => MsgKind::GetConfigRequest,
                Message::GetConfigReply(_) => MsgKind::GetConfigReply,
                Message::SetConfig(_) => MsgKind::SetConfig,
                Message::PacketIn(_) => MsgKind::PacketIn,
                Message::PortStatus(_) => MsgKind::PortStatus,
                Message::ResourceReport(_) => MsgKind::ResourceReport,
                Message::PacketOut(_) => MsgKind::PacketOut,
                Message::FlowMod(_) => MsgKind::FlowMod,
                Message::GroupMod(_) => MsgKind::GroupMod,
                Message::TableMod(_) => MsgKind::TableMod,
                Message::BarrierRequest => MsgKind::BarrierRequest,
                Message::BarrierReply => MsgKind::BarrierReply,
                Message::MeterMod(_) => MsgKind::MeterMod,
                Message::CounterMod(_) => MsgKind::CounterMod,
                Message::CounterRequest(_) => MsgKind::CounterRequest,
                Message::CounterReply(_) => MsgKind::CounterReply,
            }
        }

        fn marshal_body(msg: Message, bytes: &mut Vec<u8>) -> Result<(), PofError> {
            match msg {
                Message::Hello
                | Message::FeaturesRequest
                | Message::GetConfigRequest
                | Message::BarrierRequest
                | Message::BarrierReply => Ok(()),
                Message::Error(body) => ErrorMsg::marshal(body, bytes),
                Message::EchoRequest(buf) | Message::EchoReply(buf) => {
                    bytes.extend_from_slice(&buf);
                    Ok(())
                }
                Message::Experimenter(body) => ExperimenterMsg::marshal(body, bytes),
                Message::FeaturesReply(body) => SwitchFeatures::marshal(body, bytes),
                Message::GetConfigReply(body) | Message::SetConfig(body) => {
                    SwitchConfig::marshal(body, bytes)
                }
                Message::PacketIn(body) => PacketIn::marshal(body, bytes),
                Message::PortStatus(body) => PortStatus::marshal(body, bytes),
                Message::ResourceReport(body) => ResourceReport::marshal(body, bytes),
                Message::PacketOut(body) => PacketOut::marshal(body, bytes),
                Message::FlowMod(body) => FlowMod::marshal(body, bytes),
                Message::GroupMod(body) => GroupMod::marshal(body, bytes),
                Message::TableMod(body) => FlowTable::marshal(body, bytes),
                Message::MeterMod(body) => MeterMod::marshal(body, bytes),
                Message::CounterMod(body)
                | Message::CounterRequest(body)
                | Message::CounterReply(body) => Counter::marshal(body, bytes),
            }
        }
    }

    impl PofMessage for Message {
        fn size_of(msg: &Message) -> usize {
            let body = match *msg {
                Message::Hello
                | Message::FeaturesRequest
                | Message::GetConfigRequest
                | Message::BarrierRequest
                | Message::BarrierReply => 0,
                Message::Error(ref body) => ErrorMsg::size_of(body),
                Message::EchoRequest(ref buf) | Message::EchoReply(ref buf) => buf.len(),
                Message::Experimenter(ref body) => ExperimenterMsg::size_of(body),
                Message::FeaturesReply(ref body) => SwitchFeatures::size_of(body),
                Message::GetConfigReply(ref body) | Message::SetConfig(ref body) => {
                    SwitchConfig::size_of(body)
                }
                Message::PacketIn(ref body) => PacketIn::size_of(body),
                Message::PortStatus(ref body) => PortStatus::size_of(body),
                Message::ResourceReport(ref body) => ResourceReport::size_of(body),
                Message::PacketOut(ref body) => PacketOut::size_of(body),
                Message::FlowMod(ref body) => FlowMod::size_of(body),
                Message::GroupMod(ref body) => GroupMod::size_of(body),
                Message::TableMod(ref body) => FlowTable::size_of(body),
                Message::MeterMod(ref body) => MeterMod::size_of(body),
                Message::CounterMod(ref body)
                | Message::CounterRequest(ref body)
                | Message::CounterReply(ref body) => Counter::size_of(body),
            };
            PofHeader::size() + body
        }

        fn header_of(xid: u32, msg: &Message) -> PofHeader {
            PofHeader::new(
                POF_VERSION,
                Message::msg_kind_of_message(msg).to_wire(),
                Message::size_of(msg) as u16,
                xid,
            )
        }

        fn marshal(xid: u32, msg: Message) -> Result<Vec<u8>, PofError> {
            let hdr = Message::header_of(xid, &msg);
            let mut bytes = vec![];
            PofHeader::marshal(&mut bytes, hdr);
            Message::marshal_body(msg, &mut bytes)?;
            Ok(bytes)
        }

        fn parse(header: &PofHeader, buf: &[u8]) -> Result<(u32, Message), PofError> {
            let msg = match header.kind()? {
                MsgKind::Hello => Message::Hello,
                MsgKind::Error => Message::Error(ErrorMsg::parse(buf)?),
                MsgKind::EchoRequest => Message::EchoRequest(buf.to_vec()),
                MsgKind::EchoReply => Message::EchoReply(buf.to_vec()),
                MsgKind::Experimenter => Message::Experimenter(ExperimenterMsg::parse(buf)?),
                MsgKind::FeaturesRequest => Message::FeaturesRequest,
                MsgKind::FeaturesReply => Message::FeaturesReply(SwitchFeatures::parse(buf)?),
                MsgKind::GetConfigRequest => Message::GetConfigRequest,
                MsgKind::GetConfigReply => Message::GetConfigReply(SwitchConfig::parse(buf)?),
                MsgKind::SetConfig => Message::SetConfig(SwitchConfig::parse(buf)?),
                MsgKind::PacketIn => Message::PacketIn(PacketIn::parse(buf)?),
                MsgKind::PortStatus => Message::PortStatus(PortStatus::parse(buf)?),
                MsgKind::ResourceReport => Message::ResourceReport(ResourceReport::parse(buf)?),
                MsgKind::PacketOut => Message::PacketOut(PacketOut::parse(buf)?),
                MsgKind::FlowMod => Message::FlowMod(FlowMod::parse(buf)?),
                MsgKind::GroupMod => Message::GroupMod(GroupMod::parse(buf)?),
                MsgKind::TableMod => Message::TableMod(FlowTable::parse(buf)?),
                MsgKind::BarrierRequest => Message::BarrierRequest,
                MsgKind::BarrierReply => Message::BarrierReply,
                MsgKind::MeterMod => Message::MeterMod(MeterMod::parse(buf)?),
                MsgKind::CounterMod => Message::CounterMod(Counter::parse(buf)?),
                MsgKind::CounterRequest => Message::CounterRequest(Counter::parse(buf)?),
                MsgKind::CounterReply => Message::CounterReply(Counter::parse(buf)?),
            };
            Ok((header.xid(), msg))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::message::Message;
    use super::*;
    use crate::pof_header::PofHeader;
    use crate::pof_message::PofMessage;

    fn round_trip(msg: Message) -> Message {
        let bytes = Message::marshal(42, msg).unwrap();
        let mut raw = [0; 8];
        raw.copy_from_slice(&bytes[..8]);
        let header = PofHeader::parse(raw);
        assert_eq!(header.length(), bytes.len());
        let (xid, parsed) = Message::parse(&header, &bytes[8..]).unwrap();
        assert_eq!(xid, 42);
        parsed
    }

    fn empty_flow_mod() -> FlowMod {
        FlowMod {
            command: FlowModCommand::Add,
            match_field_num: 0,
            instruction_num: 0,
            counter_id: 0,
            cookie: 0,
            cookie_mask: 0,
            table_id: 0,
            table_type: TableType::Mm,
            idle_timeout: 0,
            hard_timeout: 0,
            priority: 0,
            index: 0,
            matches: Some(vec![]),
            instructions: Some(vec![]),
        }
    }

    fn full_resource_tables() -> Vec<TableResource> {
        TableType::ALL
            .iter()
            .map(|&t| TableResource {
                table_type: t,
                table_num: 2,
                key_length: 160,
                total_size: 4096,
            })
            .collect()
    }

    #[test]
    fn flow_mod_always_encodes_to_fixed_size() {
        assert_eq!(FLOW_MOD_BODY_BYTES, 2184);
        let empty = Message::marshal(1, Message::FlowMod(empty_flow_mod())).unwrap();
        assert_eq!(empty.len(), 2192);

        let mut full = empty_flow_mod();
        full.match_field_num = 1;
        full.matches = Some(vec![MatchX::default()]);
        full.instruction_num = 2;
        full.instructions = Some(vec![
            Instruction::ApplyActions {
                action_num: 1,
                actions: Some(vec![Action::Output {
                    port: crate::field::ValueOrField::Value(1),
                    metadata_offset: 0,
                    metadata_length: 0,
                    packet_offset: 0,
                }]),
            },
            Instruction::GotoTable {
                next_table_id: 1,
                match_field_num: 0,
                packet_offset: 0,
                match_fields: Some(vec![]),
            },
        ]);
        let bytes = Message::marshal(2, Message::FlowMod(full)).unwrap();
        assert_eq!(bytes.len(), 2192);
    }

    #[test]
    fn flow_mod_round_trips_with_nested_regions() {
        let mut fm = empty_flow_mod();
        fm.command = FlowModCommand::Modify;
        fm.counter_id = 12;
        fm.cookie = 0x1122334455667788;
        fm.table_type = TableType::Lpm;
        fm.priority = 7;
        fm.match_field_num = 1;
        fm.matches = Some(vec![MatchX {
            selector: crate::field::FieldSelector {
                field_id: 1,
                offset: 208,
                length: 16,
            },
            value: [1; 16],
            mask: [0xff; 16],
        }]);
        fm.instruction_num = 1;
        fm.instructions = Some(vec![Instruction::Meter { meter_id: 3 }]);
        assert_eq!(round_trip(Message::FlowMod(fm.clone())), Message::FlowMod(fm));
    }

    #[test]
    fn flow_mod_overdeclared_instruction_count_is_an_error() {
        let mut fm = empty_flow_mod();
        fm.instruction_num = 2;
        fm.instructions = Some(vec![Instruction::ClearActions]);
        assert_eq!(
            Message::marshal(0, Message::FlowMod(fm)).unwrap_err(),
            PofError::CountExceedsList {
                what: "instruction",
                declared: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn resource_report_round_trips_in_order() {
        let report = ResourceReport {
            resource_type: 0,
            slot_id: 1,
            counter_num: 1024,
            meter_num: 256,
            group_num: 128,
            tables: full_resource_tables(),
        };
        assert_eq!(
            round_trip(Message::ResourceReport(report.clone())),
            Message::ResourceReport(report)
        );
    }

    #[test]
    fn resource_report_rejects_permuted_table_order() {
        let mut tables = full_resource_tables();
        tables.swap(1, 2);
        let report = ResourceReport {
            resource_type: 0,
            slot_id: 0,
            counter_num: 0,
            meter_num: 0,
            group_num: 0,
            tables: tables,
        };
        assert_eq!(
            Message::marshal(0, Message::ResourceReport(report)).unwrap_err(),
            PofError::TableTypeMismatch { index: 1, found: 2 }
        );
    }

    #[test]
    fn counter_round_trips() {
        let counter = Counter {
            command: CounterCommand::Add,
            counter_id: 7,
            packet_count: 100,
            byte_count: 5000,
        };
        let bytes = Message::marshal(9, Message::CounterMod(counter)).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(
            round_trip(Message::CounterReply(counter)),
            Message::CounterReply(counter)
        );
    }

    #[test]
    fn counter_command_out_of_range_is_an_error() {
        let mut bytes = vec![];
        Counter::marshal(
            Counter {
                command: CounterCommand::Query,
                counter_id: 1,
                packet_count: 0,
                byte_count: 0,
            },
            &mut bytes,
        )
        .unwrap();
        bytes[0] = 9;
        assert_eq!(
            Counter::parse(&bytes).unwrap_err(),
            PofError::UnknownTypeTag {
                space: "counter command",
                tag: 9,
            }
        );
    }

    #[test]
    fn packet_in_always_carries_full_padding() {
        let pi = PacketIn {
            buffer_id: 0xffffffff,
            total_length: 3,
            reason: PacketInReason::NoMatch,
            table_id: 0,
            cookie: 0,
            device_id: 1,
            slot_port_id: 0x00010002,
            data: vec![0xde, 0xad, 0xbe],
        };
        let bytes = Message::marshal(3, Message::PacketIn(pi.clone())).unwrap();
        assert_eq!(bytes.len(), 32 + MAX_PACKET_IN_BYTES);
        assert_eq!(round_trip(Message::PacketIn(pi.clone())), Message::PacketIn(pi));
    }

    #[test]
    fn message_registry_is_complete_and_stable() {
        for &kind in MsgKind::ALL.iter() {
            assert_eq!(MsgKind::from_wire(kind.to_wire()).unwrap(), kind);
        }
        for tag in &[11u8, 17, 19, 20, 23, 24, 25, 26, 27, 28, 29, 34, 255] {
            assert!(MsgKind::from_wire(*tag).is_err());
        }
    }

    #[test]
    fn port_status_round_trips() {
        let port = PhysicalPort {
            slot_port_id: 0x00010003,
            device_id: 7,
            hw_addr: [0x02, 0, 0, 0, 0, 0x01],
            name: "eth3".to_string(),
            config: PortConfig {
                down: false,
                no_recv: false,
                no_fwd: true,
                no_packet_in: false,
            },
            state: PortState {
                link_down: false,
                blocked: false,
                live: true,
            },
            curr: 0x0840,
            advertised: 0,
            supported: 0x0840,
            peer: 0,
            current_speed: 10_000_000,
            max_speed: 10_000_000,
            openflow_enable: true,
        };
        let status = PortStatus {
            reason: PortReason::Add,
            desc: port,
        };
        assert_eq!(
            round_trip(Message::PortStatus(status.clone())),
            Message::PortStatus(status)
        );
    }
}
