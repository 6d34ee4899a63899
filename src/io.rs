//! Byte-stream abstraction over the connection's input/output.
//!
//! The navigation loop, form driver, and field editor talk to a
//! `Terminal` rather than directly to stdin/stdout, so tests can drive
//! them against canned input without a real pty.

use std::io::{self, Read, Write};

pub trait Terminal {
    fn read_byte(&mut self) -> io::Result<u8>;
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// Adapts any `Read + Write` pair (stdin/stdout in the real binary) to
/// [`Terminal`].
pub struct StdTerminal<R, W> {
    reader: R,
    writer: W,
}

impl<R: Read, W: Write> StdTerminal<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        StdTerminal { reader, writer }
    }
}

impl<R: Read, W: Write> Terminal for StdTerminal<R, W> {
    fn read_byte(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.reader.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// A fixed input queue paired with a captured output buffer, for tests.
pub struct InMemoryTerminal {
    input: std::collections::VecDeque<u8>,
    pub output: Vec<u8>,
}

impl InMemoryTerminal {
    pub fn with_input(bytes: &[u8]) -> Self {
        InMemoryTerminal {
            input: bytes.iter().copied().collect(),
            output: Vec::new(),
        }
    }
}

impl Terminal for InMemoryTerminal {
    fn read_byte(&mut self) -> io::Result<u8> {
        self.input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more input"))
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
