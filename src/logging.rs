//! Logger construction, mirroring the teacher's file-or-null `sloggers`
//! setup: a file logger when a path is given, otherwise a terminal logger
//! at the requested severity.

use slog::Logger;
use sloggers::file::FileLoggerBuilder;
use sloggers::terminal::{Destination, TerminalLoggerBuilder};
use sloggers::types::Severity;
use sloggers::Build;

pub fn build_logger(log_file: Option<&str>, level: Severity) -> Logger {
    match log_file {
        Some(path) => {
            let mut builder = FileLoggerBuilder::new(path);
            builder.level(level);
            builder.truncate();
            builder.build().expect("failed to build file logger")
        }
        None => {
            let mut builder = TerminalLoggerBuilder::new();
            builder.level(level);
            builder.destination(Destination::Stderr);
            builder.build().expect("failed to build terminal logger")
        }
    }
}
