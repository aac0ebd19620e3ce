use slidemap_core::GeometryError;
use slidemap_geometry::{
    default_layer_id, slide_features, DrawableShape, Geometry, GeometryKind, GeometryOptions,
    GroupShape, LabelShape, PathCommand, PathDefinition, Point, Shape, Size, Slide, Xfrm,
};

const SLIDE: Size = Size {
    width: 1000.0,
    height: 1000.0,
};

fn square(name: &str) -> Shape {
    Shape::AutoShape(DrawableShape::new(
        name,
        Xfrm::new(Point::new(0.0, 0.0), Size::new(100.0, 100.0)),
        vec![PathDefinition::new(vec![
            PathCommand::move_to(0.0, 0.0),
            PathCommand::line_to(100.0, 0.0),
            PathCommand::line_to(100.0, 100.0),
            PathCommand::line_to(0.0, 100.0),
            PathCommand::Close,
        ])],
    ))
}

fn polyline(name: &str) -> Shape {
    Shape::Connector(DrawableShape::new(
        name,
        Xfrm::new(Point::new(500.0, 500.0), Size::new(100.0, 0.0)),
        vec![PathDefinition::new(vec![
            PathCommand::move_to(0.0, 0.0),
            PathCommand::line_to(100.0, 0.0),
        ])],
    ))
}

fn options() -> GeometryOptions {
    GeometryOptions {
        metres_per_emu: 1000.0,
        ..GeometryOptions::default()
    }
}

#[test]
fn test_square_yields_one_polygon() {
    let slide = Slide {
        shapes: vec![square("#block")],
    };
    let result = slide_features(&slide, 1, SLIDE, &options()).unwrap();
    assert_eq!(result.feature_count(), 1);
    assert!(result.diagnostics.is_empty());

    let layer = result.layer("slide01").unwrap();
    let feature = &layer.features[0];
    assert_eq!(feature.geometry.kind(), GeometryKind::Polygon);
    let Geometry::Polygon { coordinates } = &feature.geometry else {
        panic!("expected a polygon, got {:?}", feature.geometry);
    };
    assert_eq!(coordinates.len(), 1);
    assert_eq!(coordinates[0].len(), 5);
    assert_eq!(coordinates[0][0], coordinates[0][4]);
    assert_eq!(feature.properties.shape_id.as_deref(), Some("block"));
    assert_eq!(feature.properties.attribute, None);
}

#[test]
fn test_slide_center_projects_to_origin() {
    let slide = Slide {
        shapes: vec![Shape::Freeform(DrawableShape::new(
            "centre",
            Xfrm::new(Point::new(500.0, 500.0), Size::new(0.0, 0.0)),
            vec![PathDefinition::new(vec![
                PathCommand::move_to(0.0, 0.0),
                PathCommand::line_to(0.0, -100.0),
            ])],
        ))],
    };
    let result = slide_features(&slide, 1, SLIDE, &options()).unwrap();
    let Geometry::LineString { coordinates } = &result.layers[0].features[0].geometry else {
        panic!("expected a line");
    };
    assert!(coordinates[0][0].abs() < 1e-9);
    assert!(coordinates[0][1].abs() < 1e-9);
    // Up on the slide is north on the map.
    assert!(coordinates[1][1] > 0.0);
}

#[test]
fn test_layers_group_features() {
    let slide = Slide {
        shapes: vec![
            polyline("road"),
            Shape::TextBox(LabelShape::new("#layer-id water", "Lakes and rivers")),
            square("#lake"),
            polyline("#river main"),
        ],
    };
    let result = slide_features(&slide, 3, SLIDE, &options()).unwrap();
    assert_eq!(result.layers.len(), 2);

    let default = &result.layers[0];
    assert_eq!(default.id, default_layer_id(3));
    assert_eq!(default.id, "slide03");
    assert_eq!(default.features.len(), 1);

    let water = result.layer("water").unwrap();
    assert_eq!(water.description.as_deref(), Some("Lakes and rivers"));
    assert_eq!(water.features.len(), 2);
    assert_eq!(water.features[1].properties.attribute.as_deref(), Some("main"));

    let ids: Vec<usize> = result
        .layers
        .iter()
        .flat_map(|l| l.features.iter().map(|f| f.id))
        .collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn test_duplicate_id_fails_slide() {
    let slide = Slide {
        shapes: vec![
            square("#lake"),
            Shape::Group(GroupShape::new(
                "g",
                Xfrm::default(),
                vec![square("#lake")],
            )),
        ],
    };
    let err = slide_features(&slide, 1, SLIDE, &options()).unwrap_err();
    assert!(matches!(err, GeometryError::DuplicateShapeId { .. }));
}

#[test]
fn test_coordinate_precision_rounds() {
    let slide = Slide {
        shapes: vec![square("a")],
    };
    let rounded = GeometryOptions {
        coordinate_precision: Some(2),
        ..options()
    };
    let result = slide_features(&slide, 1, SLIDE, &rounded).unwrap();
    let Geometry::Polygon { coordinates } = &result.layers[0].features[0].geometry else {
        panic!("expected a polygon");
    };
    for [lon, lat] in &coordinates[0] {
        assert_eq!((lon * 100.0).round() / 100.0, *lon);
        assert_eq!((lat * 100.0).round() / 100.0, *lat);
    }
}

#[test]
fn test_degenerate_sub_paths_are_dropped() {
    let slide = Slide {
        shapes: vec![Shape::Freeform(DrawableShape::new(
            "dot",
            Xfrm::new(Point::new(0.0, 0.0), Size::new(10.0, 10.0)),
            vec![PathDefinition::new(vec![
                PathCommand::move_to(1.0, 1.0),
                PathCommand::line_to(1.0, 1.0),
                PathCommand::move_to(0.0, 0.0),
                PathCommand::line_to(5.0, 0.0),
                PathCommand::Close,
            ])],
        ))],
    };
    let result = slide_features(&slide, 1, SLIDE, &options()).unwrap();
    assert_eq!(result.feature_count(), 0);
}

#[test]
fn test_feature_collection_json() {
    let slide = Slide {
        shapes: vec![polyline("#road A1")],
    };
    let result = slide_features(&slide, 1, SLIDE, &options()).unwrap();
    let json = result.layers[0].to_json(false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(value["id"], "slide01");
    assert_eq!(value["features"][0]["type"], "Feature");
    assert_eq!(value["features"][0]["geometry"]["type"], "LineString");
    assert_eq!(value["features"][0]["properties"]["shape_id"], "road");
    assert_eq!(value["features"][0]["properties"]["attribute"], "A1");
    assert_eq!(value["features"][0]["properties"]["layer"], "slide01");
}

#[test]
fn test_closed_sliver_is_reported() {
    let slide = Slide {
        shapes: vec![
            Shape::Freeform(DrawableShape::new(
                "sliver",
                Xfrm::new(Point::new(0.0, 0.0), Size::new(100.0, 100.0)),
                vec![PathDefinition::new(vec![
                    PathCommand::move_to(0.0, 0.0),
                    PathCommand::line_to(100.0, 0.0),
                    PathCommand::Close,
                ])],
            )),
            polyline("road"),
        ],
    };
    let result = slide_features(&slide, 1, SLIDE, &options()).unwrap();
    assert_eq!(result.feature_count(), 1);
    assert_eq!(result.layers[0].features[0].geometry.kind(), GeometryKind::Line);
    assert!(matches!(
        result.diagnostics.as_slice(),
        [GeometryError::DegenerateRing { shape, sub_path: 0, vertices: 3 }] if shape == "sliver"
    ));
    assert!(!result.diagnostics[0].is_fatal());
}
