//! Shape tree walk and transform composition.
//!
//! [`TransformComposer`] walks a slide depth-first. Each group's transform
//! is composed onto the running transform for its children only, and a
//! layer marker applies to the following shapes of its own group and their
//! descendants. Both live in a [`Scope`] value handed down the recursion,
//! so nothing leaks between siblings.

use std::collections::HashSet;

use serde::Serialize;
use slidemap_core::GeometryError;
use tracing::{debug, warn};

use crate::model::{
    DrawableShape, GroupShape, LabelShape, PathDefinition, Shape, ShapeProperties,
};
use crate::transform::AffineTransform;

/// Name a text box must carry (`#layer-id ...`) to act as a layer marker.
pub const LAYER_MARKER_ID: &str = "layer-id";

/// Logical output layer assigned by a marker text box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Layer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
        }
    }

    /// Layer described by a marker, if `label` is one.
    ///
    /// The id comes from the marker name's attribute, falling back to the
    /// text; the text is kept as the description.
    pub fn from_marker(label: &LabelShape) -> Option<Result<Layer, GeometryError>> {
        let properties = ShapeProperties::parse(&label.name)?;
        if properties.id != LAYER_MARKER_ID {
            return None;
        }
        let text = label.text.trim();
        let id = if properties.attribute.is_empty() {
            text
        } else {
            properties.attribute.as_str()
        };
        if id.is_empty() {
            return Some(Err(GeometryError::MissingLayerName {
                name: label.name.clone(),
            }));
        }
        Some(Ok(Layer {
            id: id.to_string(),
            description: (!text.is_empty()).then(|| text.to_string()),
        }))
    }
}

/// Per-level state of the walk.
#[derive(Debug, Clone)]
pub struct Scope {
    pub transform: AffineTransform,
    pub layer: Option<Layer>,
}

impl Scope {
    pub fn new(base: AffineTransform) -> Self {
        Self {
            transform: base,
            layer: None,
        }
    }

    /// Scope for the children of a group with transform `local`.
    fn nested(&self, local: &AffineTransform) -> Scope {
        Scope {
            transform: self.transform * *local,
            layer: self.layer.clone(),
        }
    }
}

/// One path definition of a drawable shape, with its resolved transforms.
#[derive(Debug)]
pub struct DrawablePath<'a> {
    pub shape: &'a DrawableShape,
    pub properties: Option<ShapeProperties>,
    pub index: usize,
    pub path: &'a PathDefinition,
    /// Path space to the enclosing group's space.
    pub local: AffineTransform,
    /// Path space to world space.
    pub world: AffineTransform,
    pub layer: Option<&'a Layer>,
}

/// Consumer of the walk.
pub trait ShapeSink {
    fn enter_group(&mut self, _group: &GroupShape, _transform: &AffineTransform) {}

    fn leave_group(&mut self, _group: &GroupShape) {}

    /// Handle one path; returns non-fatal problems met while doing so.
    fn drawable_path(&mut self, path: &DrawablePath<'_>) -> Vec<GeometryError>;
}

/// Outcome of a completed walk.
#[derive(Debug, Default)]
pub struct WalkReport {
    pub diagnostics: Vec<GeometryError>,
    pub drawn_paths: usize,
}

/// Depth-first walker for one slide.
#[derive(Debug, Default)]
pub struct TransformComposer {
    seen_ids: HashSet<String>,
    report: WalkReport,
}

impl TransformComposer {
    /// Walk `shapes` starting from `base`, feeding `sink`.
    ///
    /// Fails only on a duplicate shape id; every other problem is reported
    /// in the returned diagnostics.
    pub fn walk<S: ShapeSink>(
        shapes: &[Shape],
        base: AffineTransform,
        sink: &mut S,
    ) -> Result<WalkReport, GeometryError> {
        let mut composer = TransformComposer::default();
        composer.walk_shapes(shapes, Scope::new(base), sink)?;
        Ok(composer.report)
    }

    fn walk_shapes<S: ShapeSink>(
        &mut self,
        shapes: &[Shape],
        mut scope: Scope,
        sink: &mut S,
    ) -> Result<(), GeometryError> {
        for shape in shapes {
            match shape {
                Shape::Group(group) => {
                    self.register(shape)?;
                    let local = AffineTransform::from_xfrm(&group.xfrm, None);
                    sink.enter_group(group, &local);
                    self.walk_shapes(&group.shapes, scope.nested(&local), sink)?;
                    sink.leave_group(group);
                }
                Shape::AutoShape(drawable) | Shape::Freeform(drawable) | Shape::Connector(drawable) => {
                    let properties = self.register(shape)?;
                    self.draw(drawable, properties, &scope, sink);
                }
                Shape::TextBox(label) => match Layer::from_marker(label) {
                    Some(Ok(layer)) => {
                        debug!("Layer '{}' starts at '{}'", layer.id, label.name);
                        scope.layer = Some(layer);
                    }
                    Some(Err(err)) => {
                        warn!("{}", err);
                        self.report.diagnostics.push(err);
                    }
                    None => {}
                },
                Shape::Unsupported => {
                    let err = GeometryError::UnsupportedShape {
                        name: shape.name().to_string(),
                    };
                    warn!("{}", err);
                    self.report.diagnostics.push(err);
                }
            }
        }
        Ok(())
    }

    fn draw<S: ShapeSink>(
        &mut self,
        shape: &DrawableShape,
        properties: Option<ShapeProperties>,
        scope: &Scope,
        sink: &mut S,
    ) {
        for (index, path) in shape.paths.iter().enumerate() {
            let local = AffineTransform::from_xfrm(&shape.xfrm, path.bbox());
            let drawable = DrawablePath {
                shape,
                properties: properties.clone(),
                index,
                path,
                local,
                world: scope.transform * local,
                layer: scope.layer.as_ref(),
            };
            let diagnostics = sink.drawable_path(&drawable);
            self.report.diagnostics.extend(diagnostics);
            self.report.drawn_paths += 1;
        }
    }

    fn register(&mut self, shape: &Shape) -> Result<Option<ShapeProperties>, GeometryError> {
        let properties = shape.properties();
        if let Some(props) = &properties {
            if !self.seen_ids.insert(props.id.clone()) {
                return Err(GeometryError::DuplicateShapeId {
                    id: props.id.clone(),
                });
            }
        }
        Ok(properties)
    }
}
