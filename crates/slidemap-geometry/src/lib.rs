//! # slidemap Geometry
//!
//! Turns the vector drawings of a presentation slide into map-ready
//! geometry.
//!
//! ## Pipeline
//!
//! ```text
//! Presentation (document model)
//!   └── TransformComposer (depth-first shape walk, layer scope)
//!         ├── AffineTransform::from_xfrm (per-shape transform)
//!         └── ShapeSink
//!               ├── FeatureAssembler (GeoJSON)
//!               │     └── PathInterpreter → Flattener → projection
//!               └── SvgEmitter (SVG)
//!                     └── PathInterpreter → SvgPathData
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use slidemap_geometry::{slide_features, GeometryOptions, Presentation};
//!
//! let presentation = Presentation::from_json(&content)?;
//! let slide = presentation.slide(1)?;
//! let features = slide_features(slide, 1, presentation.slide_size(), &GeometryOptions::default())?;
//! ```

pub mod composer;
pub mod geojson;
pub mod interpreter;
pub mod model;
pub mod options;
pub mod projection;
pub mod sampler;
pub mod svg;
pub mod transform;

pub use composer::{DrawablePath, Layer, Scope, ShapeSink, TransformComposer, WalkReport};
pub use geojson::{
    default_layer_id, slide_features, Feature, FeatureAssembler, FeatureCollection,
    FeatureProperties, Geometry, SlideFeatures,
};
pub use interpreter::{flatten_path, Flattener, GeometryKind, PathInterpreter, SegmentSink, SubPath};
pub use model::{
    DrawableShape, GroupShape, LabelShape, PathCommand, PathDefinition, Point, Presentation,
    Shape, ShapeProperties, Size, Slide, Xfrm,
};
pub use options::GeometryOptions;
pub use projection::{from_lon_lat, to_lon_lat, world_transform};
pub use sampler::{sample_arc, sample_cubic, sample_quadratic, ArcSegment, DEFAULT_CURVE_SAMPLES};
pub use svg::{slide_svg, svg_file_name, SlideSvg, SvgDocument, SvgEmitter, SvgPathData};
pub use transform::AffineTransform;
