//! # Chatcolor Core Library
//!
//! Custom username colors for a chat server:
//! - Registry of color overrides layered over a built-in default palette
//! - Deterministic stylesheet generation for every public chat room
//! - Atomic persistence of overrides and the generated stylesheet
//! - Fire-and-forget cache invalidation after each change
//! - Color parsing (hex, rgb, hsl, English and Spanish names) and contrast checks
//!
//! ## Example
//!
//! ```rust,no_run
//! use chatcolor_core::{
//!     ColorAssignment, DefaultPalette, Mutation, NoopNotifier, StaticRooms, Store, UpdatePipeline,
//! };
//! use std::sync::Arc;
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = Store::new("data/customcolors.json", "config/custom.template.css", "data/custom.css");
//!     let pipeline = UpdatePipeline::open(
//!         Arc::new(DefaultPalette::builtin()),
//!         store,
//!         Arc::new(StaticRooms::default()),
//!         Arc::new(NoopNotifier),
//!     )?;
//!
//!     pipeline.apply(Mutation::assign("Some User", ColorAssignment::direct("#3366CC")?))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// Initialize i18n - load translations from i18n folder (TOML)
rust_i18n::i18n!("i18n", fallback = "en");

pub mod cli;
pub mod config;
pub mod core;
pub mod i18n;

// Re-exports for convenience
pub use crate::cli::{CliResult, ExitCodes};
pub use crate::config::AppConfig;
pub use crate::core::{
    Color, ColorAssignment, ColorBook, ColorError, ColorFormat, ColorLookup, ColorRegistry,
    DefaultPalette, HexColor, HttpNotifier, InvalidationNotifier, LoadOutcome, LuminosityChecker,
    Mutation, NoopNotifier, Overlay, RoomDescriptor, RoomSource, RoomsFile, StaticRooms, Store,
    StylesheetGenerator, UpdatePipeline, UserId, TEMPLATE_MARKER,
};
pub use crate::i18n::{set_locale, t, Locale};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
