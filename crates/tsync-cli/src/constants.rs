//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config, store, template).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Another auto-heal pass holds the slot.
    pub const ALREADY_RUNNING: i32 = 5;

    /// The provider could not be reached or refused the request.
    pub const REMOTE: i32 = 6;
}

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "TSYNC_CONFIG";

/// Environment variable supplying the provider access token.
pub const ACCESS_TOKEN_ENV: &str = "TSYNC_ACCESS_TOKEN";

/// Directory name under the XDG config and data roots.
pub const APP_DIR: &str = "tsync";
