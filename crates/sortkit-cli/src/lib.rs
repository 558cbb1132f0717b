#![forbid(unsafe_code)]

//! The `sortkit` command-line tool.
//!
//! | command   | does                                                   |
//! |-----------|--------------------------------------------------------|
//! | `reorder` | applies one drop to a comma-separated list             |
//! | `replay`  | drives a sortable list with a JSON pointer script      |
//! | `policy`  | prints or validates a TOML/JSON list policy            |
//!
//! Exit codes: `0` success, `1` runtime failure, `2` bad input, `3` bad policy.

pub mod cli;
pub mod error;
pub mod logging;
pub mod policy;
pub mod reorder;
pub mod replay;

pub use cli::{Cli, Commands, run, run_from_env};
pub use error::{CliError, Result};
