//! # slidemap
//!
//! Converts the vector drawings of presentation slides into map layers.
//!
//! ## Architecture
//!
//! slidemap is organized as a workspace with multiple crates:
//!
//! 1. **slidemap-core** - Error taxonomy and document units
//! 2. **slidemap-geometry** - Document model, transform resolution, path
//!    flattening, projection and the GeoJSON/SVG emitters
//! 3. **slidemap-settings** - Configuration files and validation
//! 4. **slidemap** - Per-slide fan-out, output writing and the CLI binary
//!
//! Every selected slide is converted on its own thread; a slide that fails
//! leaves its siblings untouched.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::thread;

use tracing::{debug, error, info, warn};

pub use slidemap_core::{DocumentError, Error, GeometryError, OutputError, Result};
pub use slidemap_geometry::{
    slide_features, slide_svg, GeometryOptions, Presentation, SlideFeatures, SlideSvg,
};
pub use slidemap_settings::{Config, OutputFormat};

use slidemap_core::units::format_length;
use slidemap_geometry::svg_file_name;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Logs go to stderr so they never mix with anything written to stdout.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Geometry options derived from a validated config
pub fn geometry_options(config: &Config) -> GeometryOptions {
    GeometryOptions {
        curve_samples: config.geometry.curve_samples,
        metres_per_emu: config.geometry.metres_per_emu,
        coordinate_precision: config.output.coordinate_precision,
    }
}

/// Converted output of one slide
#[derive(Debug, Clone, PartialEq)]
pub enum SlideOutput {
    Features(SlideFeatures),
    Svg(SlideSvg),
}

impl SlideOutput {
    pub fn diagnostics(&self) -> &[GeometryError] {
        match self {
            SlideOutput::Features(features) => &features.diagnostics,
            SlideOutput::Svg(svg) => &svg.diagnostics,
        }
    }
}

/// Outcome of converting one slide
#[derive(Debug)]
pub struct SlideResult {
    /// 1-based slide number
    pub slide: usize,
    pub outcome: Result<SlideOutput>,
}

/// Convert a single slide in the format selected by `config`.
pub fn convert_slide(presentation: &Presentation, number: usize, config: &Config) -> Result<SlideOutput> {
    let slide = presentation.slide(number)?;
    let size = presentation.slide_size();
    let output = match config.output.format {
        OutputFormat::GeoJson => {
            SlideOutput::Features(slide_features(slide, number, size, &geometry_options(config))?)
        }
        OutputFormat::Svg => SlideOutput::Svg(slide_svg(slide, number, size)?),
    };
    Ok(output)
}

/// Convert `slides` (1-based numbers; empty means all), one thread per
/// slide.
///
/// Results come back in ascending slide order, each slide once. A
/// panicking worker is reported as an error for its slide only.
pub fn convert_presentation(
    presentation: &Presentation,
    slides: &[usize],
    config: &Config,
) -> Vec<SlideResult> {
    let numbers: Vec<usize> = if slides.is_empty() {
        (1..=presentation.len()).collect()
    } else {
        let mut numbers = slides.to_vec();
        numbers.sort_unstable();
        numbers.dedup();
        numbers
    };

    let unit = config.output.report_unit;
    info!(
        "Converting {} of {} slides ({} x {}) to {}",
        numbers.len(),
        presentation.len(),
        format_length(presentation.slide_width, unit),
        format_length(presentation.slide_height, unit),
        config.output.format
    );

    thread::scope(|scope| {
        let handles: Vec<_> = numbers
            .iter()
            .map(|&number| {
                let handle = thread::Builder::new()
                    .name(format!("slide{:02}", number))
                    .spawn_scoped(scope, move || convert_slide(presentation, number, config));
                (number, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(slide, handle)| {
                let outcome = match handle {
                    Ok(handle) => handle.join().unwrap_or_else(|_| {
                        Err(Error::other(format!("Worker for slide {} panicked", slide)))
                    }),
                    Err(e) => Err(Error::Io(e)),
                };
                match &outcome {
                    Ok(output) => debug!(
                        "Slide {} converted with {} diagnostics",
                        slide,
                        output.diagnostics().len()
                    ),
                    Err(e) => error!("Slide {} failed: {}", slide, e),
                }
                SlideResult { slide, outcome }
            })
            .collect()
    })
}

/// Files written and per-slide failures met while writing
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub errors: Vec<(usize, Error)>,
}

impl WriteReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// File name for a layer id, with path separators neutralised.
pub fn layer_file_name(layer: &str) -> String {
    let stem: String = layer
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect();
    format!("{}.json", stem)
}

/// Write every successful result into `dir`.
///
/// GeoJSON layers go to `<layer>.json`, SVG slides to `slideNN.svg`. A
/// layer id already written by an earlier slide is rejected for the later
/// slide; its other layers are still written. A file that cannot be
/// written is reported against its slide and the remaining files are still
/// written. Failed slides are skipped, since their errors are already in
/// the results. Only failing to create `dir` itself is returned as `Err`.
pub fn write_outputs(results: &[SlideResult], dir: &Path, config: &Config) -> Result<WriteReport> {
    std::fs::create_dir_all(dir)?;
    let mut report = WriteReport::default();
    let mut layer_owner: HashMap<&str, usize> = HashMap::new();

    for result in results {
        let Ok(output) = &result.outcome else {
            continue;
        };
        match output {
            SlideOutput::Features(features) => {
                for layer in &features.layers {
                    if let Some(owner) = layer_owner.get(layer.id.as_str()) {
                        warn!(
                            "Layer '{}' of slide {} already written by slide {}",
                            layer.id, result.slide, owner
                        );
                        report.errors.push((
                            result.slide,
                            OutputError::LayerCollision {
                                layer: layer.id.clone(),
                                slide: result.slide,
                            }
                            .into(),
                        ));
                        continue;
                    }
                    layer_owner.insert(layer.id.as_str(), result.slide);
                    let path = dir.join(layer_file_name(&layer.id));
                    let written = layer
                        .to_json(config.output.pretty)
                        .and_then(|json| std::fs::write(&path, json).map_err(Error::from));
                    match written {
                        Ok(()) => {
                            info!("Wrote {} features to {}", layer.features.len(), path.display());
                            report.written.push(path);
                        }
                        Err(e) => {
                            error!("Failed to write {}: {}", path.display(), e);
                            report.errors.push((result.slide, e));
                        }
                    }
                }
            }
            SlideOutput::Svg(svg) => {
                let path = dir.join(svg_file_name(svg.slide));
                match std::fs::write(&path, svg.document.to_svg_string()) {
                    Ok(()) => {
                        info!("Wrote {}", path.display());
                        report.written.push(path);
                    }
                    Err(e) => {
                        error!("Failed to write {}: {}", path.display(), e);
                        report.errors.push((result.slide, e.into()));
                    }
                }
            }
        }
    }

    Ok(report)
}
