//! Core module containing the custom color machinery
//!
//! This module provides:
//! - Color parsing, naming and contrast checks
//! - Built-in default palette
//! - Custom color registry with override/diff semantics
//! - Room snapshots for per-room selectors
//! - Stylesheet generation
//! - Persistence of overrides and the generated stylesheet
//! - Remote cache invalidation
//! - The update pipeline tying it together

pub mod color;
pub mod error;
pub mod notify;
pub mod palette;
pub mod pipeline;
pub mod registry;
pub mod rooms;
pub mod store;
pub mod stylesheet;

pub use color::{Color, ColorBook, ColorFormat, ColorLookup, HexColor, LuminosityChecker};
pub use error::{ColorError, Result};
pub use notify::{HttpNotifier, InvalidationNotifier, NoopNotifier};
pub use palette::DefaultPalette;
pub use pipeline::{Mutation, UpdatePipeline};
pub use registry::{ColorAssignment, ColorRegistry, Overlay, UserId};
pub use rooms::{RoomDescriptor, RoomSource, RoomsFile, StaticRooms};
pub use store::{LoadOutcome, Store};
pub use stylesheet::{StylesheetGenerator, TEMPLATE_MARKER};
