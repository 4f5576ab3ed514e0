//! Errors raised by command handlers, and the exit code for any error that
//! reaches `main`.
//!
//! Handlers return `anyhow::Result`. A [`CliError`] carries its own code and
//! an optional hint; core `SyncError`s are classified by [`exit_code_for`].

use std::fmt;

use tsync_core::SyncError;

use crate::constants::exit_codes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorKind {
    /// Config, store or template missing
    NotFound,
    /// Bad flag value or a refused action
    InvalidInput,
}

#[derive(Debug)]
pub struct CliError {
    kind: CliErrorKind,
    message: String,
    hint: Option<String>,
}

impl CliError {
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::NotFound,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn invalid_input_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::InvalidInput,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.kind {
            CliErrorKind::NotFound => exit_codes::NOT_FOUND,
            CliErrorKind::InvalidInput => exit_codes::INVALID_INPUT,
        }
    }
}

/// `message`, then `\nHint: ...` when there is one; `main` splits on that.
impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\nHint: {hint}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CliError {}

/// Exit code for an error returned by a command handler.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return cli.exit_code();
    }
    let Some(core) = err.downcast_ref::<SyncError>() else {
        return 1;
    };
    match core {
        SyncError::NotFound(_) => exit_codes::NOT_FOUND,
        SyncError::InvalidInput(_) | SyncError::ExampleCountMismatch { .. } => {
            exit_codes::INVALID_INPUT
        }
        SyncError::AlreadyRunning => exit_codes::ALREADY_RUNNING,
        SyncError::RemoteUnavailable(_)
        | SyncError::RemoteRejected(_)
        | SyncError::ComplianceRewriteFailed(_) => exit_codes::REMOTE,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_codes() {
        let err = anyhow::Error::new(CliError::not_found("No config", "tsync init"));
        assert_eq!(exit_code_for(&err), exit_codes::NOT_FOUND);
        let err = anyhow::Error::new(CliError::invalid_input_with_hint("bad group", "see --help"));
        assert_eq!(exit_code_for(&err), exit_codes::INVALID_INPUT);
    }

    #[test]
    fn test_core_error_codes() {
        let code = |e: SyncError| exit_code_for(&anyhow::Error::new(e));
        assert_eq!(code(SyncError::AlreadyRunning), exit_codes::ALREADY_RUNNING);
        assert_eq!(code(SyncError::RemoteRejected("no".into())), exit_codes::REMOTE);
        assert_eq!(code(SyncError::NotFound("x".into())), exit_codes::NOT_FOUND);
        assert_eq!(code(SyncError::Storage("disk".into())), 1);
        assert_eq!(exit_code_for(&anyhow::anyhow!("plain failure")), 1);
    }

    #[test]
    fn test_display_includes_hint() {
        let err = CliError::not_found("No template named 'x'", "Run `tsync list`");
        assert_eq!(err.kind, CliErrorKind::NotFound);
        assert_eq!(err.to_string(), "No template named 'x'\nHint: Run `tsync list`");
    }
}
