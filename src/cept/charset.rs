//! Unicode -> CEPT byte transcoding.
//!
//! CEPT/Videotex terminals reach accented Latin characters through the G2
//! character set: `SS2` (single-shift-to-G2, C1 0x8E) selects one character
//! from G2, which here carries the diacritical marks. A diaeresis is
//! represented as `SS2 DIAERESIS <base letter>`; `ß`, which has no
//! decomposition, sits at its own fixed G2 position.

use ascii::AsciiChar;

use super::c1::SS2;

const DIAERESIS: u8 = 0x48;
const SHARP_S: u8 = 0x7B;

/// Encodes a single Unicode scalar value as CEPT bytes.
///
/// ASCII passes through unchanged. The German umlauts and `ß` are composed
/// via the G2 diacritic mechanism described above. Anything else outside
/// the repertoire this encoder understands is replaced by `?` rather than
/// silently dropped, so callers can see the loss in the transmitted bytes.
pub fn encode_char(c: char, out: &mut Vec<u8>) {
    match c {
        'ä' => out.extend_from_slice(&[SS2, DIAERESIS, b'a']),
        'ö' => out.extend_from_slice(&[SS2, DIAERESIS, b'o']),
        'ü' => out.extend_from_slice(&[SS2, DIAERESIS, b'u']),
        'Ä' => out.extend_from_slice(&[SS2, DIAERESIS, b'A']),
        'Ö' => out.extend_from_slice(&[SS2, DIAERESIS, b'O']),
        'Ü' => out.extend_from_slice(&[SS2, DIAERESIS, b'U']),
        'ß' => out.extend_from_slice(&[SS2, SHARP_S]),
        c => match AsciiChar::from_ascii(c) {
            Ok(ascii) => out.push(ascii.as_byte()),
            Err(_) => out.push(b'?'),
        },
    }
}

/// Reverses [`encode_char`] for exactly the repertoire it produces. Exists
/// only to let tests assert the round-trip property; this crate does not
/// ship a CEPT decoder.
#[cfg(test)]
pub fn decode_one(bytes: &[u8]) -> Option<(char, usize)> {
    match bytes {
        [SS2, DIAERESIS, b'a', ..] => Some(('ä', 3)),
        [SS2, DIAERESIS, b'o', ..] => Some(('ö', 3)),
        [SS2, DIAERESIS, b'u', ..] => Some(('ü', 3)),
        [SS2, DIAERESIS, b'A', ..] => Some(('Ä', 3)),
        [SS2, DIAERESIS, b'O', ..] => Some(('Ö', 3)),
        [SS2, DIAERESIS, b'U', ..] => Some(('Ü', 3)),
        [SS2, SHARP_S, ..] => Some(('ß', 2)),
        [b, ..] if b.is_ascii() => Some((*b as char, 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(s: &str) -> Vec<u8> {
        let mut out = Vec::new();
        for c in s.chars() {
            encode_char(c, &mut out);
        }
        out
    }

    #[test]
    fn round_trips_german_umlauts() {
        for s in ["Grüße", "MÜNCHEN", "straße", "Fußgängerübergänge"] {
            let encoded = encode(s);
            let mut decoded = String::new();
            let mut rest = &encoded[..];
            while !rest.is_empty() {
                let (c, n) = decode_one(rest).expect("decodable");
                decoded.push(c);
                rest = &rest[n..];
            }
            assert_eq!(decoded, s);
        }
    }

    #[test]
    fn ascii_passes_through() {
        assert_eq!(encode("Neu-Ulm 123"), b"Neu-Ulm 123".to_vec());
    }
}
