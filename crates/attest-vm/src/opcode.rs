//! Opcodes understood by `SignatureEngine`.

/// Push an empty item (false).
pub const PUSH0: u8 = 0x00;
/// Push the next 1 byte.
pub const PUSHBYTES1: u8 = 0x01;
/// Push the next 75 bytes. Every opcode in `PUSHBYTES1..=PUSHBYTES75` pushes
/// that many bytes.
pub const PUSHBYTES75: u8 = 0x4B;
/// Next byte is a length, followed by that many bytes.
pub const PUSHDATA1: u8 = 0x4C;
/// Next two bytes (little-endian) are a length, followed by that many bytes.
pub const PUSHDATA2: u8 = 0x4D;
/// Push the number -1.
pub const PUSHM1: u8 = 0x4F;
/// Push the number 1. `PUSH1..=PUSH16` push 1 through 16.
pub const PUSH1: u8 = 0x51;
pub const PUSH16: u8 = 0x60;

pub const NOP: u8 = 0x61;
pub const DROP: u8 = 0x75;
pub const DUP: u8 = 0x76;

/// Pop pubkey, pop signature, push whether the signature is valid over the
/// signable data's canonical hash.
pub const CHECKSIG: u8 = 0xAC;
/// Pop n, n pubkeys, m, m signatures; push whether every signature matches
/// a distinct key, in key order.
pub const CHECKMULTISIG: u8 = 0xAE;

/// True for opcodes that only push data. Parameter segments may contain
/// nothing else.
pub fn is_push(op: u8) -> bool {
    matches!(op, PUSH0..=PUSHDATA2 | PUSHM1 | PUSH1..=PUSH16)
}
