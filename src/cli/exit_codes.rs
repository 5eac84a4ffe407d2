//! CLI Exit Codes
//!
//! Standard exit codes for CLI operations and automation.

use crate::core::ColorError;
use std::process::ExitCode;

/// Exit code constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCodes;

impl ExitCodes {
    /// Success
    pub const SUCCESS: u8 = 0;

    /// General error
    pub const ERROR: u8 = 1;

    /// Invalid arguments
    pub const INVALID_ARGS: u8 = 2;

    /// User identifier empty or too long
    pub const INVALID_IDENTIFIER: u8 = 3;

    /// User already has a custom color
    pub const ALREADY_ASSIGNED: u8 = 4;

    /// User has no custom color
    pub const NO_ASSIGNMENT: u8 = 5;

    /// Color text not recognized
    pub const INVALID_COLOR: u8 = 6;

    /// Writing data or stylesheet failed
    pub const STORAGE_ERROR: u8 = 7;

    /// Template missing or without marker
    pub const TEMPLATE_ERROR: u8 = 8;

    /// Configuration error
    pub const CONFIG_ERROR: u8 = 9;

    /// Color failed the contrast check
    pub const LOW_CONTRAST: u8 = 10;

    /// Internal error
    pub const INTERNAL_ERROR: u8 = 127;
}

/// CLI operation result
#[derive(Debug)]
pub enum CliResult {
    /// Success with optional message
    Success(Option<String>),

    /// Error with code and message
    Error(u8, String),
}

impl CliResult {
    pub fn success() -> Self {
        Self::Success(None)
    }

    pub fn success_with_message(msg: impl Into<String>) -> Self {
        Self::Success(Some(msg.into()))
    }

    pub fn error(code: u8, msg: impl Into<String>) -> Self {
        Self::Error(code, msg.into())
    }

    /// Get exit code
    pub fn code(&self) -> u8 {
        match self {
            Self::Success(_) => ExitCodes::SUCCESS,
            Self::Error(code, _) => *code,
        }
    }

    /// Get message
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(Some(msg)) => Some(msg),
            Self::Error(_, msg) => Some(msg),
            _ => None,
        }
    }

    /// Convert to ExitCode
    pub fn to_exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    /// Is success?
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl ExitCodes {
    /// Exit code for a core error
    pub fn for_error(err: &ColorError) -> u8 {
        match err {
            ColorError::InvalidIdentifier(_) => Self::INVALID_IDENTIFIER,
            ColorError::AlreadyAssigned(_) => Self::ALREADY_ASSIGNED,
            ColorError::NoAssignment(_) => Self::NO_ASSIGNMENT,
            ColorError::InvalidColor(_) => Self::INVALID_COLOR,
            ColorError::StorageWrite { .. } | ColorError::Serialize(_) => Self::STORAGE_ERROR,
            ColorError::TemplateMarkerMissing(_) | ColorError::TemplateMissing { .. } => {
                Self::TEMPLATE_ERROR
            }
            ColorError::Config(_) => Self::CONFIG_ERROR,
        }
    }
}

impl From<ColorError> for CliResult {
    fn from(err: ColorError) -> Self {
        Self::Error(ExitCodes::for_error(&err), err.to_string())
    }
}

/// Exit code description
pub fn exit_code_description(code: u8) -> &'static str {
    match code {
        0 => "Success",
        1 => "General error",
        2 => "Invalid arguments",
        3 => "Invalid user identifier",
        4 => "User already has a custom color",
        5 => "User has no custom color",
        6 => "Invalid color",
        7 => "Storage write failed",
        8 => "Stylesheet template error",
        9 => "Configuration error",
        10 => "Color failed the contrast check",
        127 => "Internal error",
        _ => "Unknown error",
    }
}

/// Print exit code table
pub fn print_exit_codes() {
    println!("Exit Codes:");
    for code in [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 127] {
        println!("  {:>3}  {}", code, exit_code_description(code));
    }
}
