//! Conversion options shared by both output targets.

use crate::projection::DEFAULT_METRES_PER_EMU;
use crate::sampler::DEFAULT_CURVE_SAMPLES;

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryOptions {
    /// Samples per Bézier or arc segment when flattening.
    pub curve_samples: usize,
    /// World metres per EMU for geographic output.
    pub metres_per_emu: f64,
    /// Decimal places kept in geographic coordinates; `None` keeps all.
    pub coordinate_precision: Option<u32>,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            curve_samples: DEFAULT_CURVE_SAMPLES,
            metres_per_emu: DEFAULT_METRES_PER_EMU,
            coordinate_precision: None,
        }
    }
}
