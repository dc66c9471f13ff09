//! Verbosity-aware console output.
//!
//! Three levels:
//! - Quiet: only written file paths
//! - Normal: progress messages without prefixes (default)
//! - Verbose: timestamped colored logs with details
//!
//! Library code logs through the free functions below. Until `Logger::init`
//! runs, a quiet logger answers, so library users and tests see no output.

use std::sync::OnceLock;
use std::time::Instant;

/// Verbosity level for controlling output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    Quiet,
    Normal,
    Verbose,
}

impl VerbosityLevel {
    /// Level selected by the `--quiet` / `--verbose` flags.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => VerbosityLevel::Quiet,
            (false, true) => VerbosityLevel::Verbose,
            (false, false) => VerbosityLevel::Normal,
        }
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

static START_TIME: OnceLock<Instant> = OnceLock::new();

#[derive(Debug)]
pub struct Logger {
    level: VerbosityLevel,
    colors_enabled: bool,
}

impl Logger {
    /// Installs the global logger.
    ///
    /// Returns `false` if a logger was already installed or one was already
    /// handed out by [`Logger::instance`].
    pub fn init(level: VerbosityLevel, no_color: bool) -> bool {
        let colors_enabled = !no_color
            && std::env::var("NO_COLOR").is_err()
            && atty::is(atty::Stream::Stdout);

        START_TIME.set(Instant::now()).ok();
        LOGGER
            .set(Logger {
                level,
                colors_enabled,
            })
            .is_ok()
    }

    /// The global logger, or a quiet one if none was installed.
    pub fn instance() -> &'static Logger {
        LOGGER.get_or_init(|| Logger {
            level: VerbosityLevel::Quiet,
            colors_enabled: false,
        })
    }

    fn elapsed(&self) -> f64 {
        START_TIME
            .get()
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    pub fn is_verbose(&self) -> bool {
        self.level == VerbosityLevel::Verbose
    }

    pub fn is_quiet(&self) -> bool {
        self.level == VerbosityLevel::Quiet
    }

    pub fn level(&self) -> VerbosityLevel {
        self.level
    }

    fn format_line(&self, level: &str, msg: &str) -> String {
        let elapsed = self.elapsed();
        if self.colors_enabled {
            let level_color = match level {
                "ERROR" => "\x1b[31m",
                "WARN" => "\x1b[33m",
                "INFO" => "\x1b[34m",
                "DEBUG" => "\x1b[90m",
                _ => "",
            };
            format!(
                "\x1b[90m[{:.2}s]\x1b[0m {}[{}]\x1b[0m {}",
                elapsed, level_color, level, msg
            )
        } else {
            format!("[{:.2}s] [{}] {}", elapsed, level, msg)
        }
    }

    /// Errors go to stderr at every level.
    pub fn error(&self, msg: &str) {
        if self.is_verbose() {
            eprintln!("{}", self.format_line("ERROR", msg));
        } else {
            eprintln!("Error: {}", msg);
        }
    }

    pub fn warn(&self, msg: &str) {
        match self.level {
            VerbosityLevel::Quiet => {}
            VerbosityLevel::Normal => eprintln!("Warning: {}", msg),
            VerbosityLevel::Verbose => eprintln!("{}", self.format_line("WARN", msg)),
        }
    }

    /// Reports a written file (quiet: bare path).
    pub fn output(&self, path: &str) {
        match self.level {
            VerbosityLevel::Quiet => println!("{}", path),
            VerbosityLevel::Normal => println!("Saved: {}", path),
            VerbosityLevel::Verbose => {
                println!("{}", self.format_line("INFO", &format!("Saved: {}", path)))
            }
        }
    }

    pub fn info(&self, msg: &str) {
        match self.level {
            VerbosityLevel::Quiet => {}
            VerbosityLevel::Normal => println!("{}", msg),
            VerbosityLevel::Verbose => println!("{}", self.format_line("INFO", msg)),
        }
    }

    pub fn debug(&self, msg: &str) {
        if self.is_verbose() {
            println!("{}", self.format_line("DEBUG", msg));
        }
    }
}

pub fn error(msg: &str) {
    Logger::instance().error(msg);
}

pub fn warn(msg: &str) {
    Logger::instance().warn(msg);
}

pub fn output(path: &str) {
    Logger::instance().output(path);
}

pub fn info(msg: &str) {
    Logger::instance().info(msg);
}

pub fn debug(msg: &str) {
    Logger::instance().debug(msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger(level: VerbosityLevel) -> Logger {
        Logger {
            level,
            colors_enabled: false,
        }
    }

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(VerbosityLevel::from_flags(true, false), VerbosityLevel::Quiet);
        assert_eq!(VerbosityLevel::from_flags(false, true), VerbosityLevel::Verbose);
        assert_eq!(VerbosityLevel::from_flags(false, false), VerbosityLevel::Normal);
    }

    #[test]
    fn test_logger_level_queries() {
        assert!(logger(VerbosityLevel::Quiet).is_quiet());
        assert!(!logger(VerbosityLevel::Normal).is_quiet());
        assert!(logger(VerbosityLevel::Verbose).is_verbose());
        assert!(!logger(VerbosityLevel::Normal).is_verbose());
        assert_eq!(logger(VerbosityLevel::Normal).level(), VerbosityLevel::Normal);
    }

    #[test]
    fn test_format_line_without_colors() {
        let line = logger(VerbosityLevel::Verbose).format_line("DEBUG", "built mesh");
        assert!(line.ends_with("[DEBUG] built mesh"));
        assert!(line.starts_with('['));
        assert!(!line.contains('\x1b'));
    }

    #[test]
    fn test_format_line_with_colors() {
        let colored = Logger {
            level: VerbosityLevel::Verbose,
            colors_enabled: true,
        };
        let line = colored.format_line("ERROR", "boom");
        assert!(line.contains("\x1b[31m[ERROR]"));
    }

    #[test]
    fn test_instance_defaults_to_quiet() {
        // Tests never call init, so the fallback answers.
        assert!(Logger::instance().is_quiet());
    }
}
