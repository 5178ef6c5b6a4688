//! Spinner lines for interactive runs.
//!
//! On a terminal every (ranking, language) combination gets one spinner that
//! shows the current page; elsewhere spinners are hidden and log lines carry
//! the progress instead.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

const SPINNER_TEMPLATE: &str = "{spinner:.green} {prefix:<22.cyan.bold} {wide_msg}";
const TICK: Duration = Duration::from_millis(80);

/// Where progress goes for this process
pub enum ProgressContext {
    /// stderr is a terminal: draw spinners
    Terminal(MultiProgress),
    /// Redirected or under test: draw nothing
    Plain,
}

impl ProgressContext {
    /// Pick the variant from whether stderr is a terminal.
    pub fn new() -> Self {
        if std::io::stderr().is_terminal() {
            Self::Terminal(MultiProgress::new())
        } else {
            Self::Plain
        }
    }

    pub fn hidden() -> Self {
        Self::Plain
    }

    /// Spinner for one combination, labelled e.g. `monthly_rank - en`.
    pub fn ranking_line(&self, label: &str) -> ProgressBar {
        let Self::Terminal(multi) = self else {
            return ProgressBar::hidden();
        };
        let style = ProgressStyle::with_template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let pb = multi.add(ProgressBar::new_spinner().with_style(style));
        pb.set_prefix(label.to_string());
        pb.enable_steady_tick(TICK);
        pb
    }

    /// Print a block (e.g. the summary table) without tearing a spinner.
    pub fn println(&self, msg: impl AsRef<str>) {
        match self {
            Self::Terminal(multi) => {
                if multi.println(msg.as_ref()).is_err() {
                    eprintln!("{}", msg.as_ref());
                }
            }
            Self::Plain => eprintln!("{}", msg.as_ref()),
        }
    }

    pub fn is_tty(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    /// Draw target for the log bridge, only on a terminal.
    pub fn multi(&self) -> Option<&MultiProgress> {
        match self {
            Self::Terminal(multi) => Some(multi),
            Self::Plain => None,
        }
    }
}

impl Default for ProgressContext {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedProgress = Arc<ProgressContext>;

/// Group digits by thousands: `1234567` → `1,234,567`.
pub fn fmt_num(n: usize) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;
    let mut groups: Vec<&str> = Vec::with_capacity(digits.len() / 3 + 1);
    if head > 0 {
        groups.push(&digits[..head]);
    }
    groups.extend(
        digits.as_bytes()[head..]
            .chunks(3)
            .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default()),
    );
    groups.join(",")
}
