//! CEPT byte-sequence encoder.
//!
//! Pure, stateless builders for the CEPT control sequences the page engine
//! needs: cursor positioning, color selection, palette management, the
//! serial/parallel attribute toggle, and end-of-page. Every function here
//! returns a self-contained `Vec<u8>`; concatenating any combination of
//! them is always a valid CEPT byte stream, there is no sequence that
//! depends on state held outside its own bytes.
//!
//! Byte assignments follow the German BTX/CEPT-1 profile: accented Latin
//! characters go through the G2 single-shift mechanism (`charset`), and a
//! handful of control bytes are reused directly from the comments left in
//! the reference implementation (`parallel_limited_mode` / `code_9d` /
//! `set_palette`).

pub mod c0;
pub mod c1;
mod charset;

use c1::{DCS, EPA, OSC, PU1, PU2, SPA, SS2, ST, STS};

/// Input-initiator control byte (INI). Repurposes the otherwise-unused
/// "Private Use 1" C1 slot.
pub const INI: u8 = PU1;
/// Input-terminator control byte (TER). Repurposes "Private Use 2".
pub const TER: u8 = PU2;
/// Skip-remaining-fields control byte (DCT). Repurposes "Set Transmit State".
pub const DCT: u8 = STS;

const ESC: u8 = c0::ESC;
const HOME: u8 = 0x1E;
const CURSOR_ADDR_INTRODUCER: u8 = 0x1F;
const CLEAR_LINE: u8 = 0x18;
const REPEAT_INTRODUCER: u8 = 0x12;
const FILL_BYTE: u8 = b' ';
const MIN_REPEAT_RUN: usize = 4;
const MAX_REPEAT_COUNT: usize = 63;

pub fn hide_cursor() -> Vec<u8> {
    vec![ESC, b'#', 0x01]
}

pub fn set_res_40_24() -> Vec<u8> {
    vec![ESC, b'#', b'@']
}

/// 1-based row/column direct cursor addressing. The resulting bytes always
/// start with the unit-separator byte (0x1F); callers that splice raw
/// include-file bytes in front of a page rely on that to avoid
/// double-positioning (see `preamble::build`).
pub fn set_cursor(row: u16, col: u16) -> Vec<u8> {
    vec![
        CURSOR_ADDR_INTRODUCER,
        0x40 + (row as u8),
        0x40 + (col as u8),
    ]
}

pub fn cursor_home() -> Vec<u8> {
    vec![HOME]
}

pub fn clear_screen() -> Vec<u8> {
    vec![c0::FF]
}

pub fn clear_line() -> Vec<u8> {
    vec![CLEAR_LINE]
}

pub fn protect_line() -> Vec<u8> {
    vec![SPA]
}

pub fn unprotect_line() -> Vec<u8> {
    vec![EPA]
}

pub fn parallel_limited_mode() -> Vec<u8> {
    vec![ESC, b'"', b'A']
}

pub fn serial_limited_mode() -> Vec<u8> {
    vec![ESC, b'"', b'@']
}

/// Palette-indexed foreground color, 0..=15.
pub fn set_fg_color(n: u8) -> Vec<u8> {
    debug_assert!(n < 16, "palette-indexed fg color out of range: {n}");
    let digit = if n < 10 { b'0' + n } else { b'A' + (n - 10) };
    vec![SS2, digit]
}

/// "Simple" foreground color, 0..=7, applied to subsequent text.
pub fn set_fg_color_simple(n: u8) -> Vec<u8> {
    debug_assert!(n < 8, "simple fg color out of range: {n}");
    vec![0x80 + n]
}

/// Same color set as [`set_fg_color_simple`] but applied to the whole line.
pub fn set_line_fg_color_simple(n: u8) -> Vec<u8> {
    debug_assert!(n < 8, "simple line fg color out of range: {n}");
    vec![ESC, 0x80 + n]
}

pub fn set_palette(n: u8) -> Vec<u8> {
    vec![c1::CSI, b'0' + n, b'@']
}

/// Wraps 32 RGB triples in a device-control-string, terminated by ST, for
/// the terminal to load as the active palette definition.
pub fn define_palette(entries: &[(u8, u8, u8)]) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + entries.len() * 3);
    out.push(DCS);
    for &(r, g, b) in entries {
        out.push(r);
        out.push(g);
        out.push(b);
    }
    out.push(ST);
    out
}

pub fn sequence_end_of_page() -> Vec<u8> {
    vec![c0::ETX]
}

pub fn ini() -> u8 {
    INI
}

pub fn code_9d() -> Vec<u8> {
    vec![OSC]
}

/// Transcodes a Unicode string to CEPT bytes, composing German diacritics
/// through the G2 single-shift mechanism.
pub fn from_str(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for c in s.chars() {
        charset::encode_char(c, &mut out);
    }
    out
}

/// Run-length compresses runs of the fill byte (space) of length >= 4
/// using the CEPT repeat introducer, mirroring the one compression pass
/// the reference implementation performs before transmission.
pub fn compress(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == FILL_BYTE {
            let mut run = 1;
            while i + run < bytes.len() && bytes[i + run] == FILL_BYTE {
                run += 1;
            }
            if run >= MIN_REPEAT_RUN {
                let mut remaining = run;
                while remaining > 0 {
                    let chunk = remaining.min(MAX_REPEAT_COUNT);
                    out.push(FILL_BYTE);
                    out.push(REPEAT_INTRODUCER);
                    out.push(chunk as u8);
                    remaining -= chunk;
                }
                i += run;
                continue;
            }
        }
        out.push(b);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_cursor_starts_with_unit_separator() {
        let bytes = set_cursor(1, 1);
        assert_eq!(bytes[0], CURSOR_ADDR_INTRODUCER);
        assert_eq!(bytes, vec![0x1F, 0x41, 0x41]);
    }

    #[test]
    fn cursor_home_is_a_single_byte() {
        assert_eq!(cursor_home(), vec![0x1E]);
    }

    #[test]
    fn palette_indexed_color_uses_hex_style_digits() {
        assert_eq!(set_fg_color(0), vec![SS2, b'0']);
        assert_eq!(set_fg_color(9), vec![SS2, b'9']);
        assert_eq!(set_fg_color(10), vec![SS2, b'A']);
        assert_eq!(set_fg_color(15), vec![SS2, b'F']);
    }

    #[test]
    fn simple_color_is_a_single_byte_in_the_alpha_color_range() {
        assert_eq!(set_fg_color_simple(0), vec![0x80]);
        assert_eq!(set_fg_color_simple(7), vec![0x87]);
    }

    #[test]
    fn select_palette_matches_reference_encoding() {
        // `\x9b\x30\x40` selects palette #0 in the reference implementation.
        assert_eq!(set_palette(0), vec![0x9B, 0x30, 0x40]);
    }

    #[test]
    fn parallel_and_serial_mode_match_reference_bytes() {
        assert_eq!(parallel_limited_mode(), vec![0x1B, 0x22, 0x41]);
        assert_eq!(serial_limited_mode(), vec![0x1B, 0x22, 0x40]);
    }

    #[test]
    fn compress_collapses_long_space_runs_only() {
        let input = b"ab    cd   ef";
        let out = compress(input);
        // "    " (4 spaces) compresses, "   " (3 spaces) does not.
        assert_eq!(out, b"ab \x12\x04cd   ef".to_vec());
    }

    #[test]
    fn compress_splits_runs_longer_than_max_count() {
        let input = vec![b' '; 70];
        let out = compress(&input);
        assert_eq!(out, vec![b' ', 0x12, 63, b' ', 0x12, 7]);
    }

    #[test]
    fn compress_leaves_short_runs_untouched() {
        assert_eq!(compress(b"a  b"), b"a  b".to_vec());
    }

    #[test]
    fn builder_outputs_concatenate_without_cross_sequence_state() {
        let mut all = Vec::new();
        all.extend(hide_cursor());
        all.extend(set_cursor(24, 1));
        all.extend(from_str("Grüße"));
        all.extend(sequence_end_of_page());
        assert!(all.ends_with(&sequence_end_of_page()));
    }
}
