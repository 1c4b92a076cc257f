//! CLI Exit Code Registry
//!
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error                                        |
//! | 2    | Usage error (bad args, unknown function, bad config) |
//! | 3    | Function returned an in-band `Error: ...` cell       |
//! | 4    | Host capability never became available               |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unknown function name, unreadable config.
pub const EXIT_USAGE: u8 = 2;

/// The function ran and rendered an error cell.
pub const EXIT_FUNCTION_ERROR: u8 = 3;

/// The readiness poller gave up before registration.
pub const EXIT_NOT_READY: u8 = 4;
