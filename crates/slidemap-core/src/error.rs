//! Error handling for slidemap
//!
//! Provides error types for all layers of the conversion pipeline:
//! - Geometry errors (shape tree walk and path interpretation)
//! - Document errors (loading and addressing slides)
//! - Output errors (assembling and writing layers)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised while walking a slide's shape tree and interpreting path
/// commands. Only structural errors abort a slide; everything else is
/// reported as a diagnostic and the offending element is skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Two shapes in one slide carry the same `#id`
    #[error("Shape id '{id}' is used by more than one shape")]
    DuplicateShapeId {
        /// The colliding identifier.
        id: String,
    },

    /// Shape kind the pipeline does not draw
    #[error("Shape '{name}' is not a supported kind and was skipped")]
    UnsupportedShape {
        /// The shape name, possibly empty.
        name: String,
    },

    /// Path command with an unrecognised tag
    #[error("Unknown path command in '{shape}' at index {index}")]
    UnknownPathCommand {
        /// Name of the shape owning the path.
        shape: String,
        /// Position of the command in its path definition.
        index: usize,
    },

    /// Drawing command issued before any `moveTo`
    #[error("'{command}' in '{shape}' at index {index} has no current point")]
    MissingCurrentPoint {
        /// Name of the shape owning the path.
        shape: String,
        /// The drawing command that was dropped.
        command: String,
        /// Position of the command in its path definition.
        index: usize,
    },

    /// `close` with nothing drawn since the sub-path started
    #[error("'close' in '{shape}' at index {index} closes an empty sub-path")]
    EmptyClose {
        /// Name of the shape owning the path.
        shape: String,
        /// Position of the command in its path definition.
        index: usize,
    },

    /// Closed sub-path with too few distinct vertices to form a ring
    #[error("Closed sub-path {sub_path} of '{shape}' has only {vertices} ring vertices and was dropped")]
    DegenerateRing {
        /// Name of the shape owning the path.
        shape: String,
        /// Position of the sub-path within its path definition.
        sub_path: usize,
        /// Ring vertices left after flattening, closing vertex included.
        vertices: usize,
    },

    /// Layer marker with neither an attribute nor any text
    #[error("Layer marker '{name}' does not name a layer")]
    MissingLayerName {
        /// The marker shape's name.
        name: String,
    },
}

impl GeometryError {
    /// Whether this error aborts processing of the whole slide
    pub fn is_fatal(&self) -> bool {
        matches!(self, GeometryError::DuplicateShapeId { .. })
    }
}

/// Document error type
///
/// Represents problems addressing or decoding the document model.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Requested slide does not exist
    #[error("Slide {number} out of range (document has {count} slides)")]
    SlideOutOfRange {
        /// The requested 1-based slide number.
        number: usize,
        /// Number of slides in the document.
        count: usize,
    },

    /// Document could not be decoded
    #[error("Failed to parse document: {reason}")]
    Parse {
        /// The reason decoding failed.
        reason: String,
    },
}

/// Output error type
#[derive(Error, Debug)]
pub enum OutputError {
    /// Two slides produced a layer with the same id
    #[error("Layer '{layer}' from slide {slide} collides with an earlier slide")]
    LayerCollision {
        /// The colliding layer id.
        layer: String,
        /// The 1-based slide that was rejected.
        slide: usize,
    },

    /// Emitter could not serialize its output
    #[error("Failed to serialize output: {reason}")]
    Serialize {
        /// The reason serialization failed.
        reason: String,
    },
}

/// Main error type for slidemap
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Document error
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Output error
    #[error(transparent)]
    Output(#[from] OutputError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is an output error
    pub fn is_output_error(&self) -> bool {
        matches!(self, Error::Output(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
