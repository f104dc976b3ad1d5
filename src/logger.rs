//! Logging and verbosity control for the CLI driver.
//!
//! Three verbosity levels, gating what gets printed:
//! - Quiet: only errors and final results
//! - Normal: progress and essential info (default)
//! - Verbose: everything, including per-cell/per-polygon debug detail

use std::sync::OnceLock;

/// Verbosity level for controlling output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    Quiet,
    Normal,
    Verbose,
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Global logger instance. Color is disabled when stdout isn't a tty or
/// when explicitly requested via `--no-color`.
#[derive(Debug)]
pub struct Logger {
    level: VerbosityLevel,
    color: bool,
}

impl Logger {
    /// Initialize the global logger. Safe to call more than once in tests;
    /// only the first call wins.
    pub fn init(level: VerbosityLevel, no_color: bool) {
        let color = !no_color && atty::is(atty::Stream::Stdout);
        let _ = LOGGER.set(Logger { level, color });
    }

    fn instance() -> &'static Logger {
        LOGGER.get_or_init(|| Logger {
            level: VerbosityLevel::Normal,
            color: false,
        })
    }

    fn is_at_least(&self, level: VerbosityLevel) -> bool {
        self.level >= level
    }

    pub fn is_verbose(&self) -> bool {
        self.level == VerbosityLevel::Verbose
    }

    pub fn is_quiet(&self) -> bool {
        self.level == VerbosityLevel::Quiet
    }

    fn warn_prefix(&self) -> &'static str {
        if self.color {
            "\x1b[33mWarning:\x1b[0m"
        } else {
            "Warning:"
        }
    }

    pub fn error(&self, msg: &str) {
        eprintln!("Error: {msg}");
    }

    pub fn warn(&self, msg: &str) {
        if self.is_at_least(VerbosityLevel::Normal) {
            eprintln!("{} {}", self.warn_prefix(), msg);
        }
    }

    pub fn info(&self, msg: &str) {
        if self.is_at_least(VerbosityLevel::Normal) {
            println!("{msg}");
        }
    }

    pub fn debug(&self, msg: &str) {
        if self.is_at_least(VerbosityLevel::Verbose) {
            eprintln!("[DEBUG] {msg}");
        }
    }

    /// Prints a line of the actual data product (a waypoint, an output
    /// path) unconditionally, regardless of verbosity. Distinct from
    /// `info`, which is progress narration that `--quiet` suppresses.
    pub fn output(&self, msg: &str) {
        println!("{msg}");
    }
}

pub fn error(msg: &str) {
    Logger::instance().error(msg);
}

pub fn warn(msg: &str) {
    Logger::instance().warn(msg);
}

pub fn info(msg: &str) {
    Logger::instance().info(msg);
}

pub fn debug(msg: &str) {
    Logger::instance().debug(msg);
}

pub fn output(msg: &str) {
    Logger::instance().output(msg);
}

pub fn is_verbose() -> bool {
    Logger::instance().is_verbose()
}

pub fn is_quiet() -> bool {
    Logger::instance().is_quiet()
}
