//! C1 set of 8-bit control characters (ANSI X3.64-1979), adapted from the
//! reference terminal-emulation tables (credit: alacritty, via
//! `kngwyu/curses-game-wrapper`). The CEPT builders in `cept::mod` reuse
//! several of these directly: `SPA`/`EPA` for protect/unprotect, `OSC` for
//! `code_9d`, `DCS`/`ST` for palette definitions, `SS2` for G2 diacritics.
#![allow(dead_code)]

pub const PAD: u8 = 0x80;
pub const HOP: u8 = 0x81;
pub const BPH: u8 = 0x82;
pub const NBH: u8 = 0x83;
/// Index
pub const IND: u8 = 0x84;
/// New line
pub const NEL: u8 = 0x85;
pub const SSA: u8 = 0x86;
pub const ESA: u8 = 0x87;
pub const HTS: u8 = 0x88;
pub const HTJ: u8 = 0x89;
pub const VTS: u8 = 0x8A;
pub const PLD: u8 = 0x8B;
pub const PLU: u8 = 0x8C;
/// Reverse Index
pub const RI: u8 = 0x8D;
/// Single Shift to G2 -- introduces a CEPT diacritic/special character.
pub const SS2: u8 = 0x8E;
/// Single Shift to G3
pub const SS3: u8 = 0x8F;
/// Device Control String, terminated by ST.
pub const DCS: u8 = 0x90;
pub const PU1: u8 = 0x91;
pub const PU2: u8 = 0x92;
pub const STS: u8 = 0x93;
pub const CCH: u8 = 0x94;
pub const MW: u8 = 0x95;
/// Start of Protected Area -- CEPT "protect line".
pub const SPA: u8 = 0x96;
/// End of Protected Area -- CEPT "unprotect line".
pub const EPA: u8 = 0x97;
pub const SOS: u8 = 0x98;
pub const SGCI: u8 = 0x99;
pub const DECID: u8 = 0x9A;
/// Control Sequence Introducer.
pub const CSI: u8 = 0x9B;
/// String Terminator.
pub const ST: u8 = 0x9C;
/// Operating System Command -- `Cept::code_9d`.
pub const OSC: u8 = 0x9D;
pub const PM: u8 = 0x9E;
pub const APC: u8 = 0x9F;
