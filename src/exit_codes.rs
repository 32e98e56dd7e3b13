//! Exit code constants for the scaffold CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config, missing API key)
//! - 2: Template failure (unknown project template, broken system prompt)
//! - 3: Model query failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, or engine misuse.
pub const USER_ERROR: i32 = 1;

/// Template failure: the requested project template does not exist or the
/// system prompt could not be rendered.
pub const TEMPLATE_FAILURE: i32 = 2;

/// The language model query failed.
pub const QUERY_FAILURE: i32 = 3;
