//! C0 set of 7-bit control characters (ANSI X3.4-1977), adapted from the
//! reference terminal-emulation tables (credit: alacritty, via
//! `kngwyu/curses-game-wrapper`). Only the subset the CEPT encoder actually
//! reaches for is exercised elsewhere; the rest is kept for completeness
//! and documentation value.
#![allow(dead_code)]

/// Null filler, terminal should ignore this character
pub const NUL: u8 = 0x00;
/// Start of Header
pub const SOH: u8 = 0x01;
/// Start of Text, implied end of header
pub const STX: u8 = 0x02;
/// End of Text
pub const ETX: u8 = 0x03;
/// End of Transmission
pub const EOT: u8 = 0x04;
/// Enquiry
pub const ENQ: u8 = 0x05;
/// Acknowledge
pub const ACK: u8 = 0x06;
/// Bell
pub const BEL: u8 = 0x07;
/// Backspace
pub const BS: u8 = 0x08;
/// Horizontal Tabulation
pub const HT: u8 = 0x09;
/// Linefeed
pub const LF: u8 = 0x0A;
/// Vertical Tabulation
pub const VT: u8 = 0x0B;
/// Form Feed
pub const FF: u8 = 0x0C;
/// Carriage Return
pub const CR: u8 = 0x0D;
/// Shift Out
pub const SO: u8 = 0x0E;
/// Shift In
pub const SI: u8 = 0x0F;
/// Data Link Escape
pub const DLE: u8 = 0x10;
pub const XON: u8 = 0x11;
pub const DC2: u8 = 0x12;
pub const XOFF: u8 = 0x13;
pub const DC4: u8 = 0x14;
pub const NAK: u8 = 0x15;
pub const SYN: u8 = 0x16;
pub const ETB: u8 = 0x17;
pub const CAN: u8 = 0x18;
pub const EM: u8 = 0x19;
pub const SUB: u8 = 0x1A;
/// Prefix to an escape sequence
pub const ESC: u8 = 0x1B;
pub const FS: u8 = 0x1C;
pub const GS: u8 = 0x1D;
pub const RS: u8 = 0x1E;
pub const US: u8 = 0x1F;
pub const DEL: u8 = 0x7F;
