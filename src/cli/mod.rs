//! Command-line handlers

pub mod commands;

pub use commands::{
    cmd_approve, cmd_init, cmd_keygen, cmd_list, cmd_query, cmd_submit, AppState, CliResult,
};
