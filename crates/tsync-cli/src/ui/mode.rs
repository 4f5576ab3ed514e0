//! Output mode routing.

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Machine-readable JSON only
    Json,
    /// Stable `key=value` lines for scripts and logs
    #[default]
    Plain,
    /// Tables and colour, TTY only
    Pretty,
}

impl OutputMode {
    /// Pick a mode from flags and the terminal.
    ///
    /// `--json` wins outright; `--format plain` and `TERM=dumb` force plain;
    /// otherwise pretty on a TTY and plain everywhere else.
    pub fn resolve(
        json_flag: bool,
        format_flag: Option<&str>,
        is_tty: bool,
        term_is_dumb: bool,
    ) -> Self {
        match (json_flag, format_flag) {
            (true, _) => Self::Json,
            (false, Some("plain")) => Self::Plain,
            _ if term_is_dumb || !is_tty => Self::Plain,
            _ => Self::Pretty,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_exclusive() {
        assert_eq!(OutputMode::resolve(true, Some("plain"), true, false), OutputMode::Json);
    }

    #[test]
    fn test_plain_forces() {
        assert_eq!(OutputMode::resolve(false, Some("plain"), true, false), OutputMode::Plain);
    }

    #[test]
    fn test_term_dumb_forces_plain() {
        assert_eq!(OutputMode::resolve(false, None, true, true), OutputMode::Plain);
    }

    #[test]
    fn test_tty_gets_pretty_and_pipe_gets_plain() {
        assert_eq!(OutputMode::resolve(false, Some("table"), true, false), OutputMode::Pretty);
        assert_eq!(OutputMode::resolve(false, None, false, false), OutputMode::Plain);
    }
}
