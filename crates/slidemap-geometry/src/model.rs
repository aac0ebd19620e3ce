//! Document model consumed by the geometry pipeline.
//!
//! A presentation reader hands the pipeline a tree of [`Shape`]s per slide.
//! Positions and sizes are in EMU, angles in degrees. The tree is also
//! serde-deserializable so a document exported to JSON can be converted
//! without a presentation reader in the loop.

use serde::{Deserialize, Serialize};
use slidemap_core::{DocumentError, Result};

/// A point in document units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Both coordinates within `tolerance` of `other`.
    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

/// A width/height pair in document units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Stored shape transform: placement, rotation, flips and, for groups,
/// the child coordinate space.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Xfrm {
    #[serde(default)]
    pub offset: Point,
    #[serde(default)]
    pub extent: Size,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_offset: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_extent: Option<Size>,
}

impl Xfrm {
    pub fn new(offset: Point, extent: Size) -> Self {
        Self {
            offset,
            extent,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_flip(mut self, flip_h: bool, flip_v: bool) -> Self {
        self.flip_h = flip_h;
        self.flip_v = flip_v;
        self
    }

    pub fn with_child_space(mut self, child_offset: Point, child_extent: Size) -> Self {
        self.child_offset = Some(child_offset);
        self.child_extent = Some(child_extent);
        self
    }
}

/// One command of a path definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicBezierTo {
        points: [Point; 3],
    },
    QuadraticBezierTo {
        points: [Point; 2],
    },
    /// Elliptical arc continuing from the current point. Angles in degrees.
    ArcTo {
        wr: f64,
        hr: f64,
        start_angle: f64,
        sweep_angle: f64,
    },
    Close,
    /// Any tag this crate does not understand.
    #[serde(other)]
    Unknown,
}

impl PathCommand {
    pub fn move_to(x: f64, y: f64) -> Self {
        Self::MoveTo(Point::new(x, y))
    }

    pub fn line_to(x: f64, y: f64) -> Self {
        Self::LineTo(Point::new(x, y))
    }

    pub fn cubic_to(ctrl1: Point, ctrl2: Point, to: Point) -> Self {
        Self::CubicBezierTo {
            points: [ctrl1, ctrl2, to],
        }
    }

    pub fn quadratic_to(ctrl: Point, to: Point) -> Self {
        Self::QuadraticBezierTo { points: [ctrl, to] }
    }

    pub fn arc_to(wr: f64, hr: f64, start_angle: f64, sweep_angle: f64) -> Self {
        Self::ArcTo {
            wr,
            hr,
            start_angle,
            sweep_angle,
        }
    }

    /// Tag name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveTo(_) => "move_to",
            Self::LineTo(_) => "line_to",
            Self::CubicBezierTo { .. } => "cubic_bezier_to",
            Self::QuadraticBezierTo { .. } => "quadratic_bezier_to",
            Self::ArcTo { .. } => "arc_to",
            Self::Close => "close",
            Self::Unknown => "unknown",
        }
    }
}

/// An ordered command list with an optional local coordinate box.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub commands: Vec<PathCommand>,
}

impl PathDefinition {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self {
            width: None,
            height: None,
            commands,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Local box the commands are expressed in, when the path declares one.
    pub fn bbox(&self) -> Option<Size> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Some(Size::new(width, height)),
            _ => None,
        }
    }
}

/// Identifier and attribute parsed from a `#id attribute` shape name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeProperties {
    pub id: String,
    pub attribute: String,
}

impl ShapeProperties {
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.trim().strip_prefix('#')?;
        let (id, attribute) = match rest.split_once(char::is_whitespace) {
            Some((id, attribute)) => (id, attribute.trim()),
            None => (rest, ""),
        };
        if id.is_empty() {
            return None;
        }
        Some(Self {
            id: id.to_string(),
            attribute: attribute.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupShape {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub xfrm: Xfrm,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl GroupShape {
    pub fn new(name: impl Into<String>, xfrm: Xfrm, shapes: Vec<Shape>) -> Self {
        Self {
            name: name.into(),
            xfrm,
            shapes,
        }
    }
}

/// Autoshape, freeform or connector: anything with path geometry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrawableShape {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub xfrm: Xfrm,
    #[serde(default)]
    pub paths: Vec<PathDefinition>,
}

impl DrawableShape {
    pub fn new(name: impl Into<String>, xfrm: Xfrm, paths: Vec<PathDefinition>) -> Self {
        Self {
            name: name.into(),
            xfrm,
            paths,
        }
    }
}

/// Text box; only its name and text are of interest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelShape {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
}

impl LabelShape {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// A node of a slide's shape tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Group(GroupShape),
    AutoShape(DrawableShape),
    Freeform(DrawableShape),
    Connector(DrawableShape),
    TextBox(LabelShape),
    /// Pictures, tables, charts and anything else without path geometry.
    #[serde(other)]
    Unsupported,
}

impl Shape {
    pub fn name(&self) -> &str {
        match self {
            Self::Group(g) => &g.name,
            Self::AutoShape(d) | Self::Freeform(d) | Self::Connector(d) => &d.name,
            Self::TextBox(l) => &l.name,
            Self::Unsupported => "",
        }
    }

    pub fn properties(&self) -> Option<ShapeProperties> {
        ShapeProperties::parse(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

/// A whole document: slide size plus slides in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub slide_width: f64,
    pub slide_height: f64,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

impl Presentation {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            DocumentError::Parse {
                reason: e.to_string(),
            }
            .into()
        })
    }

    pub fn slide_size(&self) -> Size {
        Size::new(self.slide_width, self.slide_height)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Slide by 1-based number.
    pub fn slide(&self, number: usize) -> Result<&Slide> {
        number
            .checked_sub(1)
            .and_then(|index| self.slides.get(index))
            .ok_or_else(|| {
                DocumentError::SlideOutOfRange {
                    number,
                    count: self.slides.len(),
                }
                .into()
            })
    }
}
