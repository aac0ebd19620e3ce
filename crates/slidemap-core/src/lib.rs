//! # slidemap Core
//!
//! Core types and utilities for slidemap.
//! Provides the error taxonomy shared by every crate and the document
//! length units (EMU) used by the geometry pipeline.

pub mod error;
pub mod units;

pub use error::{DocumentError, Error, GeometryError, OutputError, Result};

pub use units::{
    emu_to, format_length, svg_coords, svg_units, to_emu, LengthUnit, DOTS_PER_IN, EMU_PER_CM,
    EMU_PER_DOT, EMU_PER_IN,
};
