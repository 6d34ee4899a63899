//! Per-page preamble (palette/include caching) and the header/footer band
//! spliced around every page's payload.
//!
//! Both are ported byte-for-byte from the reference implementation's
//! `create_preamble` and `headerfooter`: the header/footer is the exact
//! same byte string emitted twice (once above the payload, once below),
//! and a palette or include file already active on the terminal is never
//! re-sent, tracked via [`crate::session::PreambleCache`].
//!
//! One value differs from the reference byte-for-byte: the line color in
//! [`header_footer`] is `set_line_fg_color_simple(4)`, where the original
//! passes `12` to the same call. `set_line_fg_color_simple` only encodes
//! the 0..=7 "simple" palette, so `12` cannot be carried over unchanged;
//! elsewhere in the same function a color `>= 8` is rebased onto the
//! simple palette as `color - 8`, and that's the substitution applied
//! here too (`12 - 8 = 4`).

use crate::cept;
use crate::error::{Error, Result};
use crate::model::{PaletteDocument, PageMetadata};
use crate::session::PreambleCache;
use crate::system_message::SystemMessage;

/// Bytes above which a preamble is assumed to take long enough over a
/// 1200 baud link that the terminal should be told to wait.
const LONG_PREAMBLE_THRESHOLD: usize = 600;

pub trait PageDataSource {
    fn read_palette(&self, basedir: &str, name: &str) -> Result<String>;
    fn read_include(&self, basedir: &str, name: &str) -> Result<Vec<u8>>;
}

pub fn build_preamble(
    source: &dyn PageDataSource,
    basedir: &str,
    meta: &PageMetadata,
    cache: &mut PreambleCache,
) -> Result<Vec<u8>> {
    let mut preamble = Vec::new();

    match &meta.palette {
        Some(name) => {
            let key = format!("{basedir}{name}.pal");
            if cache.last_palette.as_deref() != Some(key.as_str()) {
                let json = source.read_palette(basedir, name)?;
                let doc = PaletteDocument::parse(&json)?;
                preamble.extend(cept::define_palette(&doc.palette));
                cache.last_palette = Some(key);
            }
        }
        None => cache.last_palette = None,
    }

    match &meta.include {
        Some(name) => {
            let key = format!("{basedir}{name}.inc");
            if cache.last_include.as_deref() != Some(key.as_str()) {
                let data = source.read_include(basedir, name)?;
                if data.first() != Some(&0x1f) {
                    preamble.extend(cept::set_cursor(1, 1));
                }
                preamble.extend(data);
                cache.last_include = Some(key);
            }
        }
        None => cache.last_include = None,
    }

    if preamble.len() > LONG_PREAMBLE_THRESHOLD {
        let mut with_notice = SystemMessage::PleaseWait.to_cept_bytes();
        with_notice.extend(preamble);
        preamble = with_notice;
    }

    Ok(preamble)
}

/// Two-line header (row 23/24) and footer band, identical bytes emitted
/// once before the page payload and once after.
pub fn header_footer(pageid: &str, publisher_name: &str, publisher_color: u8) -> Vec<u8> {
    let hide_header_footer = publisher_name.is_empty();
    let mut hide_price = false;
    let publisher_name = if publisher_name == "!BTX" {
        hide_price = true;
        "Bildschirmtext".to_string()
    } else {
        publisher_name.chars().take(30).collect()
    };

    let mut hf = Vec::new();
    hf.extend(cept::set_res_40_24());
    hf.extend(cept::set_cursor(23, 1));
    hf.extend(cept::unprotect_line());
    hf.extend(cept::set_line_fg_color_simple(4));
    hf.extend(cept::parallel_limited_mode());
    hf.extend(cept::set_cursor(24, 1));
    hf.extend(cept::unprotect_line());
    hf.extend(b" \x08");
    hf.extend(cept::clear_line());
    hf.extend(cept::cursor_home());
    hf.extend(cept::unprotect_line());
    hf.extend(b" \x08");
    hf.extend(cept::clear_line());
    hf.extend(cept::serial_limited_mode());
    hf.extend(cept::set_cursor(24, 1));
    hf.extend(cept::set_fg_color(8));
    hf.extend(b"\x08");
    hf.extend(cept::code_9d());
    hf.extend(b"\x08");

    let color_bytes = if publisher_color < 8 {
        cept::set_fg_color(publisher_color)
    } else {
        cept::set_fg_color_simple(publisher_color - 8)
    };
    hf.extend(&color_bytes);

    hf.extend(cept::set_cursor(24, 19));
    if !hide_header_footer {
        hf.extend(cept::from_str(&right_justify(pageid, 22)));
    }

    hf.extend(cept::cursor_home());
    hf.extend(cept::set_palette(1));
    hf.extend(cept::set_fg_color(8));
    hf.extend(b"\x08");
    hf.extend(cept::code_9d());
    hf.extend(b"\x08");
    hf.extend(&color_bytes);
    hf.extend(b"\r");
    hf.extend(cept::from_str(&publisher_name));

    if !hide_header_footer && !hide_price {
        hf.extend(cept::set_cursor(1, 31));
        hf.extend(b"  ");
        hf.extend(cept::from_str(&format_currency(0)));
    }

    hf.extend(cept::cursor_home());
    hf.extend(cept::set_palette(0));
    hf.extend(cept::protect_line());
    hf.extend(b"\n");
    hf
}

fn right_justify(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.chars().count());
    format!("{}{}", " ".repeat(pad), s)
}

/// Formats a price in whole cents as a German decimal-comma currency
/// string, e.g. `250` -> `"2,50"`.
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{},{:02}", abs / 100, abs % 100)
}

struct RejectingSource;
impl PageDataSource for RejectingSource {
    fn read_palette(&self, _basedir: &str, name: &str) -> Result<String> {
        Err(Error::MissingArtifact(name.to_string()))
    }
    fn read_include(&self, _basedir: &str, name: &str) -> Result<Vec<u8>> {
        Err(Error::MissingArtifact(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeSource {
        palettes: HashMap<String, String>,
        includes: HashMap<String, Vec<u8>>,
    }

    impl PageDataSource for FakeSource {
        fn read_palette(&self, _basedir: &str, name: &str) -> Result<String> {
            self.palettes
                .get(name)
                .cloned()
                .ok_or_else(|| Error::MissingArtifact(name.to_string()))
        }
        fn read_include(&self, _basedir: &str, name: &str) -> Result<Vec<u8>> {
            self.includes
                .get(name)
                .cloned()
                .ok_or_else(|| Error::MissingArtifact(name.to_string()))
        }
    }

    fn meta_with_palette() -> PageMetadata {
        PageMetadata {
            publisher_name: "Test".to_string(),
            publisher_color: 1,
            palette: Some("default".to_string()),
            include: None,
            clear_screen: false,
            cls2: false,
            links: Default::default(),
            inputs: None,
        }
    }

    #[test]
    fn repeated_palette_is_sent_only_once() {
        let mut palettes = HashMap::new();
        palettes.insert(
            "default".to_string(),
            r#"{"palette": [[0,0,0]]}"#.to_string(),
        );
        let source = FakeSource {
            palettes,
            includes: HashMap::new(),
        };
        let mut cache = PreambleCache::default();
        let meta = meta_with_palette();

        let first = build_preamble(&source, "data/", &meta, &mut cache).unwrap();
        assert!(!first.is_empty());
        let second = build_preamble(&source, "data/", &meta, &mut cache).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn long_preamble_gets_a_wait_notice() {
        let mut includes = HashMap::new();
        includes.insert("big".to_string(), vec![b' '; 700]);
        let source = FakeSource {
            palettes: HashMap::new(),
            includes,
        };
        let mut cache = PreambleCache::default();
        let meta = PageMetadata {
            include: Some("big".to_string()),
            ..meta_with_palette()
        };
        let meta = PageMetadata { palette: None, ..meta };
        let preamble = build_preamble(&source, "data/", &meta, &mut cache).unwrap();
        assert!(preamble.starts_with(&SystemMessage::PleaseWait.to_cept_bytes()));
    }

    #[test]
    fn header_footer_is_identical_on_repeated_calls() {
        let a = header_footer("0a", "Test Publisher", 2);
        let b = header_footer("0a", "Test Publisher", 2);
        assert_eq!(a, b);
    }

    #[test]
    fn format_currency_uses_decimal_comma() {
        assert_eq!(format_currency(250), "2,50");
        assert_eq!(format_currency(5), "0,05");
    }

    #[test]
    fn missing_artifact_rejects_loudly() {
        let mut cache = PreambleCache::default();
        let meta = meta_with_palette();
        let err = build_preamble(&RejectingSource, "data/", &meta, &mut cache).unwrap_err();
        assert!(matches!(err, Error::MissingArtifact(_)));
    }
}
