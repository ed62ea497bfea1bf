//! End-to-end codec checks through the public `Message` surface.

use rust_pof::action::{Action, ActionKind};
use rust_pof::field::{FieldSelector, MatchX, ValueOrField};
use rust_pof::hex_dump::to_hex_string;
use rust_pof::instruction::{Instruction, InstructionKind};
use rust_pof::pof0x04::message::Message;
use rust_pof::error::PofError;
use rust_pof::pof0x04::{
    Capabilities, ErrorMsg, ExperimenterMsg, FlowMod, FlowModCommand, GroupMod, GroupModCommand,
    GroupType, MeterMod, MeterModCommand, MsgKind, PacketOut, ResourceReport, SwitchConfig,
    SwitchFeatures,
};
use rust_pof::pof_header::{PofHeader, XidAllocator};
use rust_pof::pof_message::PofMessage;
use rust_pof::table::{FlowTable, TableModCommand, TableResource, TableType};

fn round_trip(xid: u32, msg: Message) -> Message {
    let bytes = Message::marshal(xid, msg).unwrap();
    let mut raw = [0; 8];
    raw.copy_from_slice(&bytes[..8]);
    let header = PofHeader::parse(raw);
    assert_eq!(header.version(), 0x04);
    assert_eq!(header.length(), bytes.len());
    let (parsed_xid, parsed) = Message::parse(&header, &bytes[8..]).unwrap();
    assert_eq!(parsed_xid, xid);
    parsed
}

#[test]
fn empty_bodied_messages_are_bare_headers() {
    for msg in vec![
        Message::Hello,
        Message::FeaturesRequest,
        Message::GetConfigRequest,
        Message::BarrierRequest,
        Message::BarrierReply,
    ] {
        let bytes = Message::marshal(0, msg.clone()).unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(round_trip(5, msg.clone()), msg);
    }
}

#[test]
fn echo_payload_is_opaque() {
    let msg = Message::EchoRequest(vec![1, 2, 3, 4, 5]);
    assert_eq!(round_trip(77, msg.clone()), msg);
}

#[test]
fn marshal_preserves_the_callers_xid() {
    let alloc = XidAllocator::new();
    let first = alloc.next();
    let second = alloc.next();
    assert!(second > first);

    let bytes = Message::marshal(second, Message::Hello).unwrap();
    let mut raw = [0; 8];
    raw.copy_from_slice(&bytes[..8]);
    assert_eq!(PofHeader::parse(raw).xid(), second);
}

#[test]
fn output_action_wire_bytes_are_exact() {
    let act = Action::Output {
        port: ValueOrField::Value(5),
        metadata_offset: 0x0010,
        metadata_length: 0x0020,
        packet_offset: 0x000e,
    };
    let mut bytes = vec![];
    Action::marshal(act, &mut bytes);
    assert_eq!(
        to_hex_string(&bytes),
        "00000018 00000000 00000010 0020000e 00000005 00000000"
    );
}

#[test]
fn every_action_kind_survives_the_wire() {
    for &kind in ActionKind::ALL.iter() {
        let msg = Message::PacketOut(PacketOut {
            buffer_id: 0,
            in_port: 1,
            action_num: 1,
            actions: Some(vec![Action::default_for(kind)]),
            data: vec![],
        });
        match round_trip(1, msg) {
            Message::PacketOut(po) => {
                let acts = po.actions.unwrap();
                assert_eq!(acts.len(), 1);
                assert_eq!(Action::kind(&acts[0]), kind);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}

#[test]
fn every_instruction_kind_survives_the_wire() {
    for &kind in InstructionKind::ALL.iter() {
        let fm = FlowMod {
            command: FlowModCommand::Add,
            match_field_num: 0,
            instruction_num: 1,
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
            instructions: Some(vec![Instruction::default_for(kind)]),
        };
        match round_trip(1, Message::FlowMod(fm)) {
            Message::FlowMod(parsed) => {
                let ins = parsed.instructions.unwrap();
                assert_eq!(ins.len(), 1);
                assert_eq!(Instruction::kind(&ins[0]), kind);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}

#[test]
fn flow_mod_with_absent_lists_encodes_zero_regions() {
    let fm = FlowMod {
        command: FlowModCommand::Delete,
        match_field_num: 0,
        instruction_num: 0,
        counter_id: 0,
        cookie: 0,
        cookie_mask: 0,
        table_id: 2,
        table_type: TableType::Em,
        idle_timeout: 0,
        hard_timeout: 0,
        priority: 0,
        index: 9,
        matches: None,
        instructions: None,
    };
    let bytes = Message::marshal(0, Message::FlowMod(fm)).unwrap();
    assert_eq!(bytes.len(), 2192);
    // everything past the fixed head is capacity padding
    assert!(bytes[48..].iter().all(|&b| b == 0));
}

#[test]
fn full_flow_mod_round_trips() {
    let matches = vec![
        MatchX {
            selector: FieldSelector {
                field_id: 1,
                offset: 0,
                length: 48,
            },
            value: [0xaa; 16],
            mask: [0xff; 16],
        },
        MatchX {
            selector: FieldSelector {
                field_id: 2,
                offset: 96,
                length: 16,
            },
            value: [0x08; 16],
            mask: [0xff; 16],
        },
    ];
    let instructions = vec![
        Instruction::ApplyActions {
            action_num: 2,
            actions: Some(vec![
                Action::SetField(MatchX {
                    selector: FieldSelector {
                        field_id: 3,
                        offset: 208,
                        length: 16,
                    },
                    value: [0x11; 16],
                    mask: [0xff; 16],
                }),
                Action::Output {
                    port: ValueOrField::Value(4),
                    metadata_offset: 0,
                    metadata_length: 0,
                    packet_offset: 0,
                },
            ]),
        },
        Instruction::GotoTable {
            next_table_id: 1,
            match_field_num: 1,
            packet_offset: 14,
            match_fields: Some(vec![FieldSelector {
                field_id: 4,
                offset: 272,
                length: 32,
            }]),
        },
    ];
    let fm = FlowMod {
        command: FlowModCommand::Add,
        match_field_num: 2,
        instruction_num: 2,
        counter_id: 33,
        cookie: 0xdeadbeefcafef00d,
        cookie_mask: u64::max_value(),
        table_id: 0,
        table_type: TableType::Mm,
        idle_timeout: 30,
        hard_timeout: 300,
        priority: 1000,
        index: 17,
        matches: Some(matches),
        instructions: Some(instructions),
    };
    assert_eq!(
        round_trip(0x31337, Message::FlowMod(fm.clone())),
        Message::FlowMod(fm)
    );
}

#[test]
fn table_mod_round_trips() {
    let ft = FlowTable {
        command: TableModCommand::Add,
        table_id: 1,
        table_type: TableType::Lpm,
        match_field_num: 1,
        key_length: 32,
        table_size: 1024,
        name: "routing".to_string(),
        match_fields: Some(vec![FieldSelector {
            field_id: 6,
            offset: 240,
            length: 32,
        }]),
    };
    let bytes = Message::marshal(2, Message::TableMod(ft.clone())).unwrap();
    assert_eq!(bytes.len(), 8 + 144);
    assert_eq!(round_trip(2, Message::TableMod(ft.clone())), Message::TableMod(ft));
}

#[test]
fn config_and_features_round_trip() {
    let cfg = SwitchConfig {
        flags: 1,
        miss_send_len: 128,
    };
    assert_eq!(
        round_trip(6, Message::SetConfig(cfg)),
        Message::SetConfig(cfg)
    );

    let features = SwitchFeatures {
        device_id: 0x1001,
        slot_id: 0,
        port_num: 48,
        table_num: 16,
        capabilities: Capabilities {
            flow_stats: true,
            table_stats: true,
            port_stats: false,
            group_stats: true,
            ip_reasm: false,
            queue_stats: false,
            port_blocked: true,
        },
    };
    assert_eq!(
        round_trip(7, Message::FeaturesReply(features.clone())),
        Message::FeaturesReply(features)
    );
}

#[test]
fn resource_report_zero_fills_missing_trailing_types() {
    let report = ResourceReport {
        resource_type: 0,
        slot_id: 0,
        counter_num: 8,
        meter_num: 8,
        group_num: 8,
        tables: vec![TableResource {
            table_type: TableType::Mm,
            table_num: 1,
            key_length: 80,
            total_size: 256,
        }],
    };
    let bytes = Message::marshal(0, Message::ResourceReport(report)).unwrap();
    assert_eq!(bytes.len(), 8 + 16 + 4 * 16);
    assert!(bytes[8 + 16 + 16..].iter().all(|&b| b == 0));
}

#[test]
fn resource_report_decode_rejects_permuted_table_order() {
    let report = ResourceReport {
        resource_type: 0,
        slot_id: 1,
        counter_num: 64,
        meter_num: 64,
        group_num: 64,
        tables: TableType::ALL
            .iter()
            .map(|&t| TableResource {
                table_type: t,
                table_num: 1,
                key_length: 80,
                total_size: 512,
            })
            .collect(),
    };
    let mut bytes = Message::marshal(4, Message::ResourceReport(report)).unwrap();
    // records start after the 8-byte header and 16-byte fixed head; swap
    // the table-type bytes of the second and third 16-byte records
    bytes.swap(8 + 16 + 16, 8 + 16 + 32);
    let mut raw = [0; 8];
    raw.copy_from_slice(&bytes[..8]);
    let header = PofHeader::parse(raw);
    assert_eq!(
        Message::parse(&header, &bytes[8..]).unwrap_err(),
        PofError::TableTypeMismatch { index: 1, found: 2 }
    );
}

#[test]
fn error_and_experimenter_round_trip_with_opaque_data() {
    let err = Message::Error(ErrorMsg {
        err_type: 2,
        err_code: 5,
        device_id: 0x1001,
        data: vec![0x04, 0x0f, 0x08, 0x90],
    });
    assert_eq!(round_trip(11, err.clone()), err);

    let exp = Message::Experimenter(ExperimenterMsg {
        experimenter: 0x00002320,
        data: vec![1, 2, 3],
    });
    assert_eq!(round_trip(12, exp.clone()), exp);
}

#[test]
fn group_mod_round_trips_with_nested_actions() {
    let gm = Message::GroupMod(GroupMod {
        command: GroupModCommand::Add,
        group_type: GroupType::Select,
        action_num: 2,
        group_id: 5,
        counter_id: 40,
        actions: Some(vec![
            Action::Output {
                port: ValueOrField::Value(1),
                metadata_offset: 0,
                metadata_length: 0,
                packet_offset: 0,
            },
            Action::Output {
                port: ValueOrField::Value(2),
                metadata_offset: 0,
                metadata_length: 0,
                packet_offset: 0,
            },
        ]),
    });
    let bytes = Message::marshal(13, gm.clone()).unwrap();
    assert_eq!(bytes.len(), 8 + 16 + 6 * 48);
    assert_eq!(round_trip(13, gm.clone()), gm);
}

#[test]
fn meter_mod_round_trips() {
    let mm = Message::MeterMod(MeterMod {
        command: MeterModCommand::Modify,
        rate: 10_000,
        meter_id: 3,
    });
    let bytes = Message::marshal(14, mm.clone()).unwrap();
    assert_eq!(bytes.len(), 16);
    assert_eq!(round_trip(14, mm.clone()), mm);
}

#[test]
fn header_length_wraps_for_oversized_bodies() {
    let bytes = Message::marshal(0, Message::EchoRequest(vec![0; 70_000])).unwrap();
    assert_eq!(bytes.len(), 8 + 70_000);
    let mut raw = [0; 8];
    raw.copy_from_slice(&bytes[..8]);
    assert_eq!(PofHeader::parse(raw).length(), (8 + 70_000) & 0xffff);
}

#[test]
fn unknown_message_tag_is_rejected_before_the_body() {
    let header = PofHeader::new(0x04, 19, 8, 0);
    assert!(Message::parse(&header, &[]).is_err());
    assert!(MsgKind::from_wire(19).is_err());
}
