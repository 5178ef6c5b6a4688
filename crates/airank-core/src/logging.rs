//! Log output for batch runs.
//!
//! Every record becomes one `[LEVEL] message` line on stderr. `env_logger`
//! only decides which records pass (`RUST_LOG` or the verbosity flags); the
//! line itself is rendered here so terminal and redirected output match,
//! apart from color. On a terminal lines are printed through the spinner
//! display so they land above the active spinner.

use indicatif::MultiProgress;
use log::{Level, Log};

/// Label and ANSI color per level, most severe first
const LEVEL_TAGS: [(Level, &str, &str); 5] = [
    (Level::Error, "ERROR", "\x1b[31m"),
    (Level::Warn, "WARN ", "\x1b[33m"),
    (Level::Info, "INFO ", "\x1b[32m"),
    (Level::Debug, "DEBUG", "\x1b[36m"),
    (Level::Trace, "TRACE", "\x1b[35m"),
];

const RESET: &str = "\x1b[0m";

fn render(level: Level, args: &std::fmt::Arguments<'_>, color: bool) -> String {
    let (label, ansi) = LEVEL_TAGS
        .iter()
        .find(|(l, _, _)| *l == level)
        .map(|(_, label, ansi)| (*label, *ansi))
        .unwrap_or(("?????", ""));
    if color {
        format!("[{ansi}{label}{RESET}] {args}")
    } else {
        format!("[{label}] {args}")
    }
}

/// Filtered line logger, spinner-aware when given a `MultiProgress`.
pub struct LineLogger {
    filter: env_logger::Logger,
    spinners: Option<MultiProgress>,
}

impl Log for LineLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.filter.matches(record) {
            return;
        }
        match &self.spinners {
            Some(multi) => {
                let line = render(record.level(), record.args(), true);
                multi.suspend(|| eprintln!("{line}"));
            }
            None => eprintln!("{}", render(record.level(), record.args(), false)),
        }
    }

    fn flush(&self) {}
}

/// Default filter for the given verbosity flags
fn default_level(quiet: bool, debug: bool) -> &'static str {
    match (debug, quiet) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "info",
    }
}

/// Install the process logger. `RUST_LOG` overrides the flag-derived level.
///
/// Pass the spinner display on a terminal; `None` prints plain lines.
pub fn init_logging(
    quiet: bool,
    debug: bool,
    spinners: Option<&MultiProgress>,
) -> Result<(), log::SetLoggerError> {
    let env = env_logger::Env::default().default_filter_or(default_level(quiet, debug));
    let filter = env_logger::Builder::from_env(env).build();
    let max_level = filter.filter();

    log::set_boxed_logger(Box::new(LineLogger {
        filter,
        spinners: spinners.cloned(),
    }))?;
    log::set_max_level(max_level);
    Ok(())
}
