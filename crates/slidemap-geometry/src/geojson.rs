//! GeoJSON feature assembly.
//!
//! Every sub-path of every drawable shape becomes one feature in the
//! collection of the layer its shape was scoped into. Closed sub-paths
//! become single-ring polygons, open ones line strings.

use serde::Serialize;
use slidemap_core::{GeometryError, OutputError, Result};
use tracing::{debug, info, warn};

use crate::composer::{DrawablePath, Layer, ShapeSink, TransformComposer};
use crate::interpreter::{flatten_path, GeometryKind, SubPath};
use crate::model::{Point, Size, Slide};
use crate::options::GeometryOptions;
use crate::projection::{to_lon_lat, world_transform};

pub type Position = [f64; 2];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    LineString { coordinates: Vec<Position> },
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Polygon { .. } => GeometryKind::Polygon,
            Geometry::LineString { .. } => GeometryKind::Line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureProperties {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub layer: String,
    pub sub_path: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Feature {
    pub id: usize,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(layer: &Layer) -> Self {
        Self {
            id: layer.id.clone(),
            description: layer.description.clone(),
            features: Vec::new(),
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| {
            OutputError::Serialize {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Features of one slide, grouped by layer in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideFeatures {
    pub slide: usize,
    pub layers: Vec<FeatureCollection>,
    pub diagnostics: Vec<GeometryError>,
}

impl SlideFeatures {
    pub fn feature_count(&self) -> usize {
        self.layers.iter().map(|l| l.features.len()).sum()
    }

    pub fn layer(&self, id: &str) -> Option<&FeatureCollection> {
        self.layers.iter().find(|l| l.id == id)
    }
}

/// Default layer id for a slide with no layer marker.
pub fn default_layer_id(slide: usize) -> String {
    format!("slide{:02}", slide)
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// [`ShapeSink`] that flattens paths, projects them and files the
/// resulting features by layer.
pub struct FeatureAssembler {
    options: GeometryOptions,
    default_layer: Layer,
    layers: Vec<FeatureCollection>,
    next_id: usize,
}

impl FeatureAssembler {
    pub fn new(options: GeometryOptions, default_layer: Layer) -> Self {
        Self {
            options,
            default_layer,
            layers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn into_layers(self) -> Vec<FeatureCollection> {
        self.layers
    }

    fn position(&self, world: &Point) -> Position {
        let (lon, lat) = to_lon_lat(*world);
        match self.options.coordinate_precision {
            Some(decimals) => [round_to(lon, decimals), round_to(lat, decimals)],
            None => [lon, lat],
        }
    }

    fn geometry(&self, sub_path: &SubPath) -> Option<Geometry> {
        let coordinates: Vec<Position> = sub_path.vertices.iter().map(|p| self.position(p)).collect();
        match sub_path.kind() {
            GeometryKind::Polygon if coordinates.len() >= 4 => Some(Geometry::Polygon {
                coordinates: vec![coordinates],
            }),
            GeometryKind::Line if coordinates.len() >= 2 => {
                Some(Geometry::LineString { coordinates })
            }
            _ => None,
        }
    }

    fn collection(&mut self, layer: &Layer) -> &mut FeatureCollection {
        let index = match self.layers.iter().position(|l| l.id == layer.id) {
            Some(index) => index,
            None => {
                self.layers.push(FeatureCollection::new(layer));
                self.layers.len() - 1
            }
        };
        &mut self.layers[index]
    }
}

impl ShapeSink for FeatureAssembler {
    fn drawable_path(&mut self, path: &DrawablePath<'_>) -> Vec<GeometryError> {
        let (sub_paths, mut diagnostics) = flatten_path(
            &path.shape.name,
            path.path,
            path.world,
            self.options.curve_samples,
        );
        let layer = path.layer.cloned().unwrap_or_else(|| self.default_layer.clone());

        for (sub_path_index, sub_path) in sub_paths.iter().enumerate() {
            let Some(geometry) = self.geometry(sub_path) else {
                if sub_path.closed {
                    let err = GeometryError::DegenerateRing {
                        shape: path.shape.name.clone(),
                        sub_path: sub_path_index,
                        vertices: sub_path.vertices.len(),
                    };
                    warn!("{}", err);
                    diagnostics.push(err);
                } else {
                    debug!(
                        "Skipping degenerate line {} of '{}' ({} vertices)",
                        sub_path_index,
                        path.shape.name,
                        sub_path.vertices.len()
                    );
                }
                continue;
            };
            let feature = Feature {
                id: self.next_id,
                geometry,
                properties: FeatureProperties {
                    name: path.shape.name.clone(),
                    shape_id: path.properties.as_ref().map(|p| p.id.clone()),
                    attribute: path
                        .properties
                        .as_ref()
                        .filter(|p| !p.attribute.is_empty())
                        .map(|p| p.attribute.clone()),
                    layer: layer.id.clone(),
                    sub_path: sub_path_index,
                },
            };
            self.next_id += 1;
            self.collection(&layer).features.push(feature);
        }
        diagnostics
    }
}

/// Convert one slide to GeoJSON feature collections.
pub fn slide_features(
    slide: &Slide,
    number: usize,
    slide_size: Size,
    options: &GeometryOptions,
) -> std::result::Result<SlideFeatures, GeometryError> {
    let base = world_transform(slide_size, options.metres_per_emu);
    let mut assembler = FeatureAssembler::new(options.clone(), Layer::new(default_layer_id(number)));
    let report = TransformComposer::walk(&slide.shapes, base, &mut assembler)?;
    let layers = assembler.into_layers();
    info!(
        "Slide {}: {} paths into {} features over {} layers",
        number,
        report.drawn_paths,
        layers.iter().map(|l| l.features.len()).sum::<usize>(),
        layers.len()
    );
    Ok(SlideFeatures {
        slide: number,
        layers,
        diagnostics: report.diagnostics,
    })
}
