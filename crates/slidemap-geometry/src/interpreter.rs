//! Path command interpretation.
//!
//! [`PathInterpreter`] walks a [`PathDefinition`] keeping the cursor state
//! and drives a [`SegmentSink`] with resolved segments. What a sink does
//! with a curve is its own business: [`Flattener`] samples it into
//! transformed vertices, the SVG emitter writes it as a native primitive.
//!
//! A `move_to` only positions the cursor; the sub-path begins at the first
//! drawing command after it. A sub-path ended by `close` is closed, any
//! other sub-path is open regardless of where its last vertex lies.

use slidemap_core::GeometryError;
use tracing::warn;

use crate::model::{PathCommand, PathDefinition, Point};
use crate::sampler::{sample_arc, sample_cubic, sample_quadratic, ArcSegment};
use crate::transform::AffineTransform;

/// Receiver of resolved path segments, in local coordinates.
pub trait SegmentSink {
    fn begin(&mut self, at: Point);
    fn line_to(&mut self, to: Point);
    fn quadratic_to(&mut self, from: Point, ctrl: Point, to: Point);
    fn cubic_to(&mut self, from: Point, ctrl1: Point, ctrl2: Point, to: Point);
    fn arc_to(&mut self, arc: &ArcSegment);
    fn end(&mut self, closed: bool);
}

#[derive(Debug, Default)]
struct PathState {
    current: Option<Point>,
    first: Option<Point>,
    drawing: bool,
}

pub struct PathInterpreter<'a> {
    shape: &'a str,
}

impl<'a> PathInterpreter<'a> {
    /// `shape` names the owning shape in diagnostics.
    pub fn new(shape: &'a str) -> Self {
        Self { shape }
    }

    /// Drive `sink` with every segment of `path`, returning the non-fatal
    /// problems met on the way.
    pub fn run<S: SegmentSink>(&self, path: &PathDefinition, sink: &mut S) -> Vec<GeometryError> {
        let mut state = PathState::default();
        let mut diagnostics = Vec::new();

        for (index, command) in path.commands.iter().enumerate() {
            match command {
                PathCommand::MoveTo(p) => {
                    if state.drawing {
                        sink.end(false);
                        state.drawing = false;
                        state.first = None;
                    }
                    state.current = Some(*p);
                }
                PathCommand::LineTo(p) => {
                    if self.start_segment(&mut state, sink, index, command, &mut diagnostics).is_some() {
                        sink.line_to(*p);
                        state.current = Some(*p);
                    }
                }
                PathCommand::CubicBezierTo { points: [c1, c2, to] } => {
                    if let Some(from) = self.start_segment(&mut state, sink, index, command, &mut diagnostics) {
                        sink.cubic_to(from, *c1, *c2, *to);
                        state.current = Some(*to);
                    }
                }
                PathCommand::QuadraticBezierTo { points: [ctrl, to] } => {
                    if let Some(from) = self.start_segment(&mut state, sink, index, command, &mut diagnostics) {
                        sink.quadratic_to(from, *ctrl, *to);
                        state.current = Some(*to);
                    }
                }
                PathCommand::ArcTo {
                    wr,
                    hr,
                    start_angle,
                    sweep_angle,
                } => {
                    if let Some(from) = self.start_segment(&mut state, sink, index, command, &mut diagnostics) {
                        let arc = ArcSegment::new(
                            from,
                            *wr,
                            *hr,
                            start_angle.to_radians(),
                            sweep_angle.to_radians(),
                        );
                        sink.arc_to(&arc);
                        state.current = Some(arc.to);
                    }
                }
                PathCommand::Close => {
                    if state.drawing {
                        sink.end(true);
                        state.drawing = false;
                        state.current = state.first;
                    } else {
                        let err = GeometryError::EmptyClose {
                            shape: self.shape.to_string(),
                            index,
                        };
                        warn!("{}", err);
                        diagnostics.push(err);
                    }
                    state.first = None;
                }
                PathCommand::Unknown => {
                    let err = GeometryError::UnknownPathCommand {
                        shape: self.shape.to_string(),
                        index,
                    };
                    warn!("{}", err);
                    diagnostics.push(err);
                }
            }
        }

        if state.drawing {
            sink.end(false);
        }
        diagnostics
    }

    /// Current point for a drawing command, beginning the sub-path there if
    /// the command is the first one after a move.
    fn start_segment<S: SegmentSink>(
        &self,
        state: &mut PathState,
        sink: &mut S,
        index: usize,
        command: &PathCommand,
        diagnostics: &mut Vec<GeometryError>,
    ) -> Option<Point> {
        let Some(current) = state.current else {
            let err = GeometryError::MissingCurrentPoint {
                shape: self.shape.to_string(),
                command: command.name().to_string(),
                index,
            };
            warn!("{}", err);
            diagnostics.push(err);
            return None;
        };
        if !state.drawing {
            sink.begin(current);
            state.drawing = true;
            state.first = Some(current);
        }
        Some(current)
    }
}

/// Output geometry kind of a sub-path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Polygon,
    Line,
}

/// A finished sub-path in transformed coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPath {
    pub vertices: Vec<Point>,
    pub closed: bool,
}

impl SubPath {
    pub fn kind(&self) -> GeometryKind {
        if self.closed {
            GeometryKind::Polygon
        } else {
            GeometryKind::Line
        }
    }
}

/// Sink that samples curves and collects transformed vertices.
///
/// Consecutive identical vertices are collapsed, and a closed ring always
/// ends on its first vertex.
pub struct Flattener {
    transform: AffineTransform,
    samples: usize,
    vertices: Vec<Point>,
    sub_paths: Vec<SubPath>,
}

impl Flattener {
    pub fn new(transform: AffineTransform, samples: usize) -> Self {
        Self {
            transform,
            samples,
            vertices: Vec::new(),
            sub_paths: Vec::new(),
        }
    }

    pub fn into_sub_paths(self) -> Vec<SubPath> {
        self.sub_paths
    }

    fn push(&mut self, local: Point) {
        let p = self.transform.apply(local);
        if self.vertices.last() != Some(&p) {
            self.vertices.push(p);
        }
    }
}

impl SegmentSink for Flattener {
    fn begin(&mut self, at: Point) {
        self.vertices.clear();
        self.push(at);
    }

    fn line_to(&mut self, to: Point) {
        self.push(to);
    }

    fn quadratic_to(&mut self, from: Point, ctrl: Point, to: Point) {
        for p in sample_quadratic(from, ctrl, to, self.samples) {
            self.push(p);
        }
    }

    fn cubic_to(&mut self, from: Point, ctrl1: Point, ctrl2: Point, to: Point) {
        for p in sample_cubic(from, ctrl1, ctrl2, to, self.samples) {
            self.push(p);
        }
    }

    fn arc_to(&mut self, arc: &ArcSegment) {
        for p in sample_arc(arc, self.samples) {
            self.push(p);
        }
    }

    fn end(&mut self, closed: bool) {
        let mut vertices = std::mem::take(&mut self.vertices);
        if closed {
            if let Some(&first) = vertices.first() {
                if vertices.last() != Some(&first) {
                    vertices.push(first);
                }
            }
        }
        self.sub_paths.push(SubPath { vertices, closed });
    }
}

/// Flatten `path` through `transform`, sampling each curve `samples` times.
pub fn flatten_path(
    shape: &str,
    path: &PathDefinition,
    transform: AffineTransform,
    samples: usize,
) -> (Vec<SubPath>, Vec<GeometryError>) {
    let mut flattener = Flattener::new(transform, samples);
    let diagnostics = PathInterpreter::new(shape).run(path, &mut flattener);
    (flattener.into_sub_paths(), diagnostics)
}
