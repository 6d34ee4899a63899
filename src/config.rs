//! CLI surface and the modem dial-command wait.

use clap::Parser;
use regex::Regex;
use sloggers::types::Severity;

use crate::io::Terminal;

#[derive(Parser, Debug)]
#[command(name = "btx-server", about = "Interactive CEPT/BTX videotex page server")]
pub struct Cli {
    /// Root directory containing the page tree (.meta/.cept/a.glob/...).
    #[arg(long, default_value = "data/")]
    pub data_root: String,

    /// Consume AT dial commands from the input stream before serving.
    #[arg(long)]
    pub modem: bool,

    /// Auto-login this user id (extension "1") before the first page.
    #[arg(long)]
    pub user: Option<String>,

    /// Initial page id. Defaults to the login page.
    #[arg(long, default_value = "00000")]
    pub page: String,

    /// Enable CEPT run-length compression on output.
    #[arg(long)]
    pub compress: bool,

    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[arg(long)]
    pub log_file: Option<String>,
}

impl Cli {
    pub fn severity(&self) -> Severity {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Severity::Trace,
            "debug" => Severity::Debug,
            "warning" | "warn" => Severity::Warning,
            "error" => Severity::Error,
            "critical" => Severity::Critical,
            _ => Severity::Info,
        }
    }
}

/// Reads bytes one at a time, echoing them, until a line matches the
/// modem dial-command pattern (`AT`, optional `X<digit>`, `D`).
pub fn wait_for_dial_command(terminal: &mut dyn Terminal) -> std::io::Result<()> {
    let dial_pattern = Regex::new(r"^AT *(X\d)? *D").expect("static regex is valid");
    let mut line = String::new();
    loop {
        let byte = terminal.read_byte()?;
        terminal.write_all(&[byte])?;
        terminal.flush()?;
        if byte == b'\n' || byte == b'\r' {
            if dial_pattern.is_match(&line) {
                return Ok(());
            }
            line.clear();
        } else if byte >= 0x20 {
            line.push(byte as char);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::InMemoryTerminal;

    #[test]
    fn stops_on_a_matching_dial_line() {
        let mut term = InMemoryTerminal::with_input(b"garbage\nATX1D\n");
        wait_for_dial_command(&mut term).unwrap();
    }

    #[test]
    fn plain_at_d_matches_without_the_optional_x_digit() {
        let mut term = InMemoryTerminal::with_input(b"ATD\n");
        wait_for_dial_command(&mut term).unwrap();
    }
}
