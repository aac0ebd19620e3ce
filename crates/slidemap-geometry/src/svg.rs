//! Planar SVG output.
//!
//! Groups become nested `<g>` elements carrying their own matrix, and each
//! path definition becomes one `<path>` whose data stays in the shape's
//! local coordinates. Curves and arcs are written as native SVG segments,
//! never flattened. All lengths are device dots (96 per inch).

use std::fmt::Write as _;

use slidemap_core::units::{svg_coords, svg_units};
use slidemap_core::GeometryError;
use tracing::info;

use crate::composer::{DrawablePath, ShapeSink, TransformComposer};
use crate::interpreter::{PathInterpreter, SegmentSink};
use crate::model::{GroupShape, Point, ShapeProperties, Size, Slide};
use crate::sampler::ArcSegment;
use crate::transform::AffineTransform;

const NON_SCALING_STROKE: &str = ".non-scaling-stroke { vector-effect: non-scaling-stroke; }";

const SIGNIFICANT_DIGITS: usize = 12;

/// Format a number kept to twelve significant digits.
///
/// Magnitudes below 1e-12 print as `0`.
fn num(value: f64) -> String {
    if !value.is_finite() || value.abs() < 1e-12 {
        return "0".to_string();
    }
    let rounded: f64 = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value)
        .parse()
        .unwrap_or(value);
    format!("{}", rounded)
}

fn coords(p: Point) -> String {
    let (x, y) = svg_coords(p.x, p.y);
    format!("{} {}", num(x), num(y))
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `matrix(a b c d e f)` with the translation converted to device dots.
pub fn svg_transform(transform: &AffineTransform) -> String {
    let [a, b, c, d, e, f] = transform.svg_matrix();
    format!(
        "matrix({} {} {} {} {} {})",
        num(a),
        num(b),
        num(c),
        num(d),
        num(svg_units(e)),
        num(svg_units(f))
    )
}

/// [`SegmentSink`] writing SVG path data.
#[derive(Debug, Default)]
pub struct SvgPathData {
    commands: Vec<String>,
    closed: bool,
}

impl SvgPathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether any sub-path was closed.
    pub fn has_closed(&self) -> bool {
        self.closed
    }

    pub fn to_path_data(&self) -> String {
        self.commands.join(" ")
    }
}

impl SegmentSink for SvgPathData {
    fn begin(&mut self, at: Point) {
        self.commands.push(format!("M {}", coords(at)));
    }

    fn line_to(&mut self, to: Point) {
        self.commands.push(format!("L {}", coords(to)));
    }

    fn quadratic_to(&mut self, _from: Point, ctrl: Point, to: Point) {
        self.commands
            .push(format!("Q {} {}", coords(ctrl), coords(to)));
    }

    fn cubic_to(&mut self, _from: Point, ctrl1: Point, ctrl2: Point, to: Point) {
        self.commands.push(format!(
            "C {} {} {}",
            coords(ctrl1),
            coords(ctrl2),
            coords(to)
        ));
    }

    fn arc_to(&mut self, arc: &ArcSegment) {
        self.commands.push(format!(
            "A {} {} 0 {} {} {}",
            num(svg_units(arc.wr)),
            num(svg_units(arc.hr)),
            u8::from(arc.large_arc()),
            u8::from(arc.sweeps_positive()),
            coords(arc.to)
        ));
    }

    fn end(&mut self, closed: bool) {
        if closed {
            self.commands.push("Z".to_string());
            self.closed = true;
        }
    }
}

/// [`ShapeSink`] building the body of one slide's SVG document.
#[derive(Debug, Default)]
pub struct SvgEmitter {
    body: String,
    depth: usize,
    paths: usize,
}

impl SvgEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path_count(&self) -> usize {
        self.paths
    }

    pub fn into_body(self) -> String {
        self.body
    }

    fn line(&mut self, text: &str) {
        for _ in 0..=self.depth {
            self.body.push_str("  ");
        }
        self.body.push_str(text);
        self.body.push('\n');
    }
}

impl ShapeSink for SvgEmitter {
    fn enter_group(&mut self, group: &GroupShape, transform: &AffineTransform) {
        let mut tag = String::from("<g");
        if let Some(props) = ShapeProperties::parse(&group.name) {
            let _ = write!(tag, r#" id="{}""#, escape_xml(&props.id));
        }
        let _ = write!(tag, r#" transform="{}">"#, svg_transform(transform));
        self.line(&tag);
        self.depth += 1;
    }

    fn leave_group(&mut self, _group: &GroupShape) {
        self.depth = self.depth.saturating_sub(1);
        self.line("</g>");
    }

    fn drawable_path(&mut self, path: &DrawablePath<'_>) -> Vec<GeometryError> {
        let mut data = SvgPathData::new();
        let diagnostics = PathInterpreter::new(&path.shape.name).run(path.path, &mut data);
        if data.is_empty() {
            return diagnostics;
        }

        let mut tag = String::from("<path");
        if let Some(props) = &path.properties {
            let id = if path.index == 0 {
                props.id.clone()
            } else {
                format!("{}-{}", props.id, path.index)
            };
            let _ = write!(tag, r#" id="{}""#, escape_xml(&id));
        }
        let _ = write!(tag, r#" transform="{}""#, svg_transform(&path.local));
        let _ = write!(tag, r#" d="{}""#, data.to_path_data());
        if data.has_closed() {
            tag.push_str(r##" fill="#808080" opacity="0.3" stroke="red""##);
        } else {
            tag.push_str(r#" fill="none" stroke="blue""#);
        }
        tag.push_str(r#" stroke-width="3" class="non-scaling-stroke"/>"#);
        self.line(&tag);
        self.paths += 1;
        diagnostics
    }
}

/// A complete single-slide SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    /// Device dots.
    pub width: f64,
    /// Device dots.
    pub height: f64,
    pub body: String,
}

impl SvgDocument {
    pub fn to_svg_string(&self) -> String {
        let width = num(self.width);
        let height = num(self.height);
        let mut svg = String::new();
        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        );
        let _ = writeln!(svg, "  <defs><style>{}</style></defs>", NON_SCALING_STROKE);
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlideSvg {
    pub slide: usize,
    pub document: SvgDocument,
    pub diagnostics: Vec<GeometryError>,
}

/// File name used for a slide's SVG output.
pub fn svg_file_name(slide: usize) -> String {
    format!("slide{:02}.svg", slide)
}

/// Convert one slide to an SVG document.
pub fn slide_svg(
    slide: &Slide,
    number: usize,
    slide_size: Size,
) -> Result<SlideSvg, GeometryError> {
    let mut emitter = SvgEmitter::new();
    let report = TransformComposer::walk(&slide.shapes, AffineTransform::identity(), &mut emitter)?;
    info!("Slide {}: {} SVG paths", number, emitter.path_count());
    let (width, height) = svg_coords(slide_size.width, slide_size.height);
    Ok(SlideSvg {
        slide: number,
        document: SvgDocument {
            width,
            height,
            body: emitter.into_body(),
        },
        diagnostics: report.diagnostics,
    })
}
