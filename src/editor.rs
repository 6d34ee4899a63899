//! Single-field line editor.
//!
//! Owns one field's rectangular region and running string; reads one byte
//! at a time from a [`crate::io::Terminal`], echoing printable bytes and
//! honoring the CEPT input conventions (terminator, skip, initiator,
//! legal-value matching).

use bitflags::bitflags;

use crate::cept;
use crate::io::Terminal;
use crate::model::FieldSpec;

bitflags! {
    /// Bookkeeping flags the editor consults while reading, named after
    /// the conditions in the field spec they gate.
    struct EditorFlags: u8 {
        const END_ON_ILLEGAL  = 0b0000_0001;
        const END_ON_LEGAL    = 0b0000_0010;
        const ECHO_TER        = 0b0000_0100;
        const CLEAR_LINE      = 0b0000_1000;
        const CURSOR_HOME     = 0b0001_0000;
        const NO_NAVIGATION   = 0b0010_0000;
    }
}

/// Outcome of editing one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// The field was entered normally; carries the final string.
    Entered(String),
    /// The INI byte was seen; carries the gateway command that follows it.
    Command(String),
}

pub struct FieldEditor<'a> {
    spec: &'a FieldSpec,
    flags: EditorFlags,
    buffer: String,
}

impl<'a> FieldEditor<'a> {
    pub fn new(spec: &'a FieldSpec, no_navigation: bool) -> Self {
        let mut flags = EditorFlags::empty();
        flags.set(EditorFlags::END_ON_ILLEGAL, spec.end_on_illegal_character);
        flags.set(EditorFlags::END_ON_LEGAL, spec.end_on_legal_string);
        flags.set(EditorFlags::ECHO_TER, spec.echo_ter);
        flags.set(EditorFlags::CLEAR_LINE, spec.clear_line);
        flags.set(EditorFlags::CURSOR_HOME, spec.cursor_home);
        flags.set(EditorFlags::NO_NAVIGATION, no_navigation);
        FieldEditor {
            spec,
            flags,
            buffer: spec.default_value.clone().unwrap_or_default(),
        }
    }

    fn max_len(&self) -> usize {
        (self.spec.width as usize) * (self.spec.height as usize)
    }

    /// Draws the field's background: clear line / cursor home / hint /
    /// pre-filled default, per spec. Does not read any input.
    pub fn draw(&self, terminal: &mut dyn Terminal) -> std::io::Result<()> {
        let mut out = Vec::new();
        out.extend(cept::set_cursor(self.spec.line, self.spec.column));
        if self.flags.contains(EditorFlags::CURSOR_HOME) {
            out.extend(cept::cursor_home());
        }
        if self.flags.contains(EditorFlags::CLEAR_LINE) {
            out.extend(cept::clear_line());
        }
        if let Some(fg) = self.spec.fgcolor {
            out.extend(cept::set_fg_color(fg));
        }
        if let Some(hint) = &self.spec.hint {
            out.extend(cept::from_str(hint));
        }
        if !self.buffer.is_empty() {
            out.extend(cept::set_cursor(self.spec.line, self.spec.column));
            out.extend(cept::from_str(&self.buffer));
        }
        terminal.write_all(&out)?;
        terminal.flush()
    }

    /// A legal-value buffer is "illegal" (for `end_on_illegal_character`)
    /// once it is no longer a prefix of any legal value.
    fn is_prefix_of_any_legal_value(&self) -> bool {
        match &self.spec.legal_values {
            Some(values) => values.iter().any(|v| v.starts_with(self.buffer.as_str())),
            None => true,
        }
    }

    fn is_legal_value(&self) -> bool {
        match &self.spec.legal_values {
            Some(values) => values.iter().any(|v| v == &self.buffer),
            None => false,
        }
    }

    /// Reads keystrokes until the field ends. `skip` is the accumulated
    /// DCT flag from earlier fields in the same form; if set, the editor
    /// returns its default immediately without reading.
    pub fn edit(&mut self, terminal: &mut dyn Terminal, skip: bool) -> std::io::Result<(EditOutcome, bool)> {
        if skip {
            return Ok((EditOutcome::Entered(self.buffer.clone()), true));
        }

        loop {
            let byte = terminal.read_byte()?;

            if byte == cept::ini() {
                let mut command = String::new();
                loop {
                    let b = terminal.read_byte()?;
                    if b == crate::cept::TER {
                        break;
                    }
                    command.push(b as char);
                }
                return Ok((EditOutcome::Command(command), false));
            }

            if byte == crate::cept::DCT {
                return Ok((EditOutcome::Entered(self.buffer.clone()), true));
            }

            if byte == crate::cept::TER {
                if self.flags.contains(EditorFlags::ECHO_TER) {
                    terminal.write_all(&[byte])?;
                    terminal.flush()?;
                }
                return Ok((EditOutcome::Entered(self.buffer.clone()), false));
            }

            if byte == 0x08 {
                if self.buffer.pop().is_some() {
                    terminal.write_all(b"\x08 \x08")?;
                    terminal.flush()?;
                }
                continue;
            }

            if !byte.is_ascii_graphic() && byte != b' ' && !self.flags.contains(EditorFlags::NO_NAVIGATION) {
                // Not a printable character and not claimed as a literal;
                // no other control byte is defined here, so drop it.
                continue;
            }

            if self.buffer.len() >= self.max_len() {
                continue;
            }

            self.buffer.push(byte as char);
            terminal.write_all(&[byte])?;
            terminal.flush()?;

            if self.flags.contains(EditorFlags::END_ON_LEGAL) && self.is_legal_value() {
                return Ok((EditOutcome::Entered(self.buffer.clone()), false));
            }
            if self.flags.contains(EditorFlags::END_ON_ILLEGAL) && !self.is_prefix_of_any_legal_value() {
                return Ok((EditOutcome::Entered(self.buffer.clone()), false));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::InMemoryTerminal;
    use crate::model::FieldSpec;

    fn field(legal_values: Option<Vec<String>>) -> FieldSpec {
        FieldSpec {
            name: "f".to_string(),
            line: 24,
            column: 1,
            height: 1,
            width: 20,
            fgcolor: None,
            bgcolor: None,
            hint: None,
            field_type: None,
            cursor_home: false,
            legal_values,
            clear_line: true,
            end_on_illegal_character: true,
            end_on_legal_string: true,
            echo_ter: true,
            default_value: None,
            validator: None,
        }
    }

    #[test]
    fn ends_on_legal_string_match() {
        let spec = field(Some(vec!["1".to_string(), "2".to_string()]));
        let mut editor = FieldEditor::new(&spec, false);
        let mut term = InMemoryTerminal::with_input(b"1");
        let (outcome, skip) = editor.edit(&mut term, false).unwrap();
        assert_eq!(outcome, EditOutcome::Entered("1".to_string()));
        assert!(!skip);
    }

    #[test]
    fn ends_on_illegal_character_immediately() {
        let spec = field(Some(vec!["12".to_string()]));
        let mut editor = FieldEditor::new(&spec, false);
        let mut term = InMemoryTerminal::with_input(b"9");
        let (outcome, _) = editor.edit(&mut term, false).unwrap();
        assert_eq!(outcome, EditOutcome::Entered("9".to_string()));
    }

    #[test]
    fn backspace_removes_last_character() {
        let spec = field(None);
        let mut editor = FieldEditor::new(&spec, false);
        let mut term = InMemoryTerminal::with_input(&[b'a', b'b', 0x08, crate::cept::TER]);
        let (outcome, _) = editor.edit(&mut term, false).unwrap();
        assert_eq!(outcome, EditOutcome::Entered("a".to_string()));
    }

    #[test]
    fn dct_sets_skip_and_ends_field_immediately() {
        let spec = field(None);
        let mut editor = FieldEditor::new(&spec, false);
        let mut term = InMemoryTerminal::with_input(&[b'a', crate::cept::DCT]);
        let (outcome, skip) = editor.edit(&mut term, false).unwrap();
        assert_eq!(outcome, EditOutcome::Entered("a".to_string()));
        assert!(skip);
    }

    #[test]
    fn skip_flag_short_circuits_without_reading() {
        let spec = field(None);
        let mut editor = FieldEditor::new(&spec, false);
        let mut term = InMemoryTerminal::with_input(b"");
        let (outcome, skip) = editor.edit(&mut term, true).unwrap();
        assert_eq!(outcome, EditOutcome::Entered(String::new()));
        assert!(skip);
    }

    #[test]
    fn ini_byte_yields_a_gateway_command() {
        let spec = field(None);
        let mut editor = FieldEditor::new(&spec, false);
        let mut input = vec![crate::cept::ini()];
        input.extend(b"0a");
        input.push(crate::cept::TER);
        let mut term = InMemoryTerminal::with_input(&input);
        let (outcome, _) = editor.edit(&mut term, false).unwrap();
        assert_eq!(outcome, EditOutcome::Command("0a".to_string()));
    }
}
