//! Document length units
//!
//! Presentation documents store every position and size as an integer count
//! of English Metric Units (EMU). This module converts EMU to the device
//! units used by SVG output and to the physical units used in reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// EMU in one inch
pub const EMU_PER_IN: f64 = 914_400.0;

/// EMU in one centimetre
pub const EMU_PER_CM: f64 = 360_000.0;

/// Device dots in one inch
pub const DOTS_PER_IN: f64 = 96.0;

/// EMU in one device dot
pub const EMU_PER_DOT: f64 = EMU_PER_IN / DOTS_PER_IN;

/// Length unit selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// English Metric Units, the document's native unit
    Emu,
    /// SVG device dots (96 per inch)
    Dot,
    /// Centimetres
    Cm,
    /// Inches
    Inch,
}

impl Default for LengthUnit {
    fn default() -> Self {
        Self::Emu
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Emu => write!(f, "emu"),
            Self::Dot => write!(f, "px"),
            Self::Cm => write!(f, "cm"),
            Self::Inch => write!(f, "in"),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "emu" => Ok(Self::Emu),
            "dot" | "px" => Ok(Self::Dot),
            "cm" => Ok(Self::Cm),
            "in" | "inch" => Ok(Self::Inch),
            _ => Err(format!("Unknown length unit: {}", s)),
        }
    }
}

impl LengthUnit {
    /// Number of EMU in one of this unit
    pub fn emu_per_unit(self) -> f64 {
        match self {
            Self::Emu => 1.0,
            Self::Dot => EMU_PER_DOT,
            Self::Cm => EMU_PER_CM,
            Self::Inch => EMU_PER_IN,
        }
    }
}

/// Convert an EMU length to `unit`
pub fn emu_to(value: f64, unit: LengthUnit) -> f64 {
    value / unit.emu_per_unit()
}

/// Convert a length in `unit` to EMU
pub fn to_emu(value: f64, unit: LengthUnit) -> f64 {
    value * unit.emu_per_unit()
}

/// EMU to SVG device units
pub fn svg_units(emu: f64) -> f64 {
    emu / EMU_PER_DOT
}

/// EMU coordinate pair to SVG device units
pub fn svg_coords(x: f64, y: f64) -> (f64, f64) {
    (svg_units(x), svg_units(y))
}

/// Format an EMU length for display in `unit`
pub fn format_length(value_emu: f64, unit: LengthUnit) -> String {
    match unit {
        LengthUnit::Emu => format!("{:.0} {}", value_emu, unit),
        _ => format!("{:.2} {}", emu_to(value_emu, unit), unit),
    }
}
