//! CLI Module
//!
//! Provides command-line interface functionality including:
//! - Exit codes for automation
//! - Color check replies shared by the commands

pub mod check;
pub mod exit_codes;

pub use check::{check_color, CheckReport};
pub use exit_codes::{exit_code_description, print_exit_codes, CliResult, ExitCodes};
