pub mod args;
pub mod commands;
pub mod core;
pub mod forms;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
mod shell;
pub mod shell_context;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_support;

pub use shell::{run_cli, SCRIPT_ENV};
