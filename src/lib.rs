#![crate_name = "rust_pof"]
#![crate_type = "lib"]

//! Message codec for the POF (Protocol-Oblivious Forwarding) southbound
//! protocol, wire version 0x04.
//!
//! Byte buffers in, typed messages out, and back again bit-exactly. Nested
//! match/action/instruction lists live in fixed-capacity, zero-padded
//! regions, so every flow mod encodes to the same number of bytes no matter
//! how full it is. Transport and controller logic live elsewhere.

mod bits;
pub mod action;
pub mod buffer;
pub mod classic_match;
pub mod error;
pub mod field;
pub mod global;
pub mod hex_dump;
pub mod instruction;
pub mod pof0x04;
pub mod pof_header;
pub mod pof_message;
pub mod table;
