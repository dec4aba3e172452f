use std::fmt::Display;

use console::{style, StyledObject, Term};

lazy_static::lazy_static! {
    static ref INFO_ICON: StyledObject<&'static str> = style("ℹ").color256(39);
    static ref GREEN_TICK: StyledObject<&'static str> = style("✓").color256(42);
    static ref WARN_ICON: StyledObject<&'static str> = style("⚠").color256(214);
    static ref RED_CROSS: StyledObject<&'static str> = style("✗").color256(196);
}

/// Writes the icon-prefixed status lines shown to the operator.
///
/// Info and success lines are dropped in quiet mode. Warnings and errors are
/// always written, errors always to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    quiet: bool,
    stderr: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            stderr: false,
        }
    }

    /// Sends status lines to stderr, leaving stdout for machine-readable output.
    pub fn to_stderr(mut self) -> Self {
        self.stderr = true;
        self
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_stderr(&self) -> bool {
        self.stderr
    }

    pub fn info(&self, msg: impl Display) {
        if !self.quiet {
            self.line(&INFO_ICON, msg);
        }
    }

    pub fn success(&self, msg: impl Display) {
        if !self.quiet {
            self.line(&GREEN_TICK, msg);
        }
    }

    pub fn warning(&self, msg: impl Display) {
        self.line(&WARN_ICON, msg);
    }

    pub fn error(&self, msg: impl Display) {
        let line = format_line(&RED_CROSS, msg);
        // Status output is best effort: a closed terminal is not an error.
        Term::stderr().write_line(&line).ok();
    }

    fn line(&self, icon: &StyledObject<&'static str>, msg: impl Display) {
        let term = if self.stderr {
            Term::stderr()
        } else {
            Term::stdout()
        };
        term.write_line(&format_line(icon, msg)).ok();
    }
}

fn format_line(icon: &StyledObject<&'static str>, msg: impl Display) -> String {
    format!("{} {}", icon, msg)
}
