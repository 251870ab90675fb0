//! CLI Exit Code Registry
//!
//! Exit codes are part of the shell contract; schedulers and wrapper scripts
//! rely on them.
//!
//! | Code | Stage    | Description                                  |
//! |------|----------|----------------------------------------------|
//! | 0    | -        | Load, reconcile and write all succeeded      |
//! | 2    | usage    | Bad arguments                                |
//! | 3    | load     | Input missing or unreadable                  |
//! | 4    | write    | Report could not be written                  |
//! | 5    | config   | Config file or environment invalid           |
//!
//! Per-row lookup failures never change the exit code.

/// Success - the report was written.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, unknown flags.
pub const EXIT_USAGE: u8 = 2;

/// Input file not found, not a spreadsheet, or has no sheets.
pub const EXIT_LOAD: u8 = 3;

/// Output directory or file could not be created.
pub const EXIT_WRITE: u8 = 4;

/// Config file unreadable/invalid, bad environment value, or HTTP client setup failed.
pub const EXIT_CONFIG: u8 = 5;
