use slidemap_core::GeometryError;
use slidemap_geometry::{
    AffineTransform, DrawablePath, DrawableShape, GroupShape, LabelShape, PathCommand,
    PathDefinition, Point, Shape, ShapeSink, Size, TransformComposer, Xfrm,
};
use std::f64::consts::FRAC_PI_2;

/// Records what the walk hands to its sink.
#[derive(Default)]
struct Recorder {
    paths: Vec<(String, AffineTransform, Option<String>)>,
    events: Vec<String>,
}

impl ShapeSink for Recorder {
    fn enter_group(&mut self, group: &GroupShape, _transform: &AffineTransform) {
        self.events.push(format!("enter {}", group.name));
    }

    fn leave_group(&mut self, group: &GroupShape) {
        self.events.push(format!("leave {}", group.name));
    }

    fn drawable_path(&mut self, path: &DrawablePath<'_>) -> Vec<GeometryError> {
        self.events.push(format!("draw {}", path.shape.name));
        self.paths.push((
            path.shape.name.clone(),
            path.world,
            path.layer.map(|l| l.id.clone()),
        ));
        Vec::new()
    }
}

fn square_path() -> PathDefinition {
    PathDefinition::new(vec![
        PathCommand::move_to(0.0, 0.0),
        PathCommand::line_to(100.0, 0.0),
        PathCommand::line_to(100.0, 100.0),
        PathCommand::Close,
    ])
}

fn drawable(name: &str, offset: Point) -> Shape {
    Shape::AutoShape(DrawableShape::new(
        name,
        Xfrm::new(offset, Size::new(100.0, 100.0)),
        vec![square_path()],
    ))
}

fn group(name: &str, xfrm: Xfrm, shapes: Vec<Shape>) -> Shape {
    Shape::Group(GroupShape::new(name, xfrm, shapes))
}

fn identity_group_xfrm() -> Xfrm {
    Xfrm::new(Point::new(0.0, 0.0), Size::new(1000.0, 1000.0))
        .with_child_space(Point::new(0.0, 0.0), Size::new(1000.0, 1000.0))
}

#[test]
fn test_group_rotation_applies_after_shape_transform() {
    let shape_xfrm = Xfrm::new(Point::new(10.0, 20.0), Size::new(30.0, 40.0));
    let shape = Shape::Freeform(DrawableShape::new(
        "leaf",
        shape_xfrm.clone(),
        vec![square_path()],
    ));
    let group_xfrm = Xfrm::new(Point::new(0.0, 0.0), Size::new(200.0, 200.0))
        .with_child_space(Point::new(0.0, 0.0), Size::new(200.0, 200.0))
        .with_rotation(90.0);
    let shapes = vec![group("g", group_xfrm, vec![shape])];

    let mut recorder = Recorder::default();
    TransformComposer::walk(&shapes, AffineTransform::identity(), &mut recorder).unwrap();

    let expected = AffineTransform::rotation_about(Point::new(100.0, 100.0), FRAC_PI_2)
        * AffineTransform::from_xfrm(&shape_xfrm, None);
    assert_eq!(recorder.paths.len(), 1);
    assert!(recorder.paths[0].1.approx_eq(&expected, 1e-9));
}

#[test]
fn test_group_transform_does_not_leak_to_siblings() {
    let moved = Xfrm::new(Point::new(500.0, 0.0), Size::new(1000.0, 1000.0))
        .with_child_space(Point::new(0.0, 0.0), Size::new(1000.0, 1000.0));
    let shapes = vec![
        group("g", moved, vec![drawable("inner", Point::new(0.0, 0.0))]),
        drawable("outer", Point::new(0.0, 0.0)),
    ];

    let mut recorder = Recorder::default();
    TransformComposer::walk(&shapes, AffineTransform::identity(), &mut recorder).unwrap();

    let origin = Point::new(0.0, 0.0);
    assert!(recorder.paths[0].1.apply(origin).approx_eq(&Point::new(500.0, 0.0), 1e-9));
    assert!(recorder.paths[1].1.apply(origin).approx_eq(&origin, 1e-9));
    assert_eq!(
        recorder.events,
        vec!["enter g", "draw inner", "leave g", "draw outer"]
    );
}

#[test]
fn test_base_transform_is_outermost() {
    let base = AffineTransform::scale(2.0, 2.0);
    let shapes = vec![drawable("a", Point::new(5.0, 5.0))];
    let mut recorder = Recorder::default();
    TransformComposer::walk(&shapes, base, &mut recorder).unwrap();
    assert!(recorder.paths[0]
        .1
        .apply(Point::new(0.0, 0.0))
        .approx_eq(&Point::new(10.0, 10.0), 1e-9));
}

#[test]
fn test_layer_marker_scopes_following_siblings_and_descendants() {
    let shapes = vec![
        drawable("before", Point::new(0.0, 0.0)),
        group(
            "g",
            identity_group_xfrm(),
            vec![
                drawable("inside-before", Point::new(0.0, 0.0)),
                Shape::TextBox(LabelShape::new("#layer-id", "Roads")),
                drawable("inside-after", Point::new(0.0, 0.0)),
                group(
                    "nested",
                    identity_group_xfrm(),
                    vec![drawable("deep", Point::new(0.0, 0.0))],
                ),
            ],
        ),
        drawable("after", Point::new(0.0, 0.0)),
    ];

    let mut recorder = Recorder::default();
    TransformComposer::walk(&shapes, AffineTransform::identity(), &mut recorder).unwrap();

    let layers: Vec<(&str, Option<&str>)> = recorder
        .paths
        .iter()
        .map(|(name, _, layer)| (name.as_str(), layer.as_deref()))
        .collect();
    assert_eq!(
        layers,
        vec![
            ("before", None),
            ("inside-before", None),
            ("inside-after", Some("Roads")),
            ("deep", Some("Roads")),
            ("after", None),
        ]
    );
}

#[test]
fn test_layer_marker_attribute_wins_over_text() {
    let shapes = vec![
        Shape::TextBox(LabelShape::new("#layer-id rivers", "All rivers")),
        drawable("a", Point::new(0.0, 0.0)),
    ];
    let mut recorder = Recorder::default();
    TransformComposer::walk(&shapes, AffineTransform::identity(), &mut recorder).unwrap();
    assert_eq!(recorder.paths[0].2.as_deref(), Some("rivers"));
}

#[test]
fn test_empty_layer_marker_is_diagnosed() {
    let shapes = vec![
        Shape::TextBox(LabelShape::new("#layer-id", "   ")),
        drawable("a", Point::new(0.0, 0.0)),
    ];
    let mut recorder = Recorder::default();
    let report =
        TransformComposer::walk(&shapes, AffineTransform::identity(), &mut recorder).unwrap();
    assert!(matches!(
        report.diagnostics.as_slice(),
        [GeometryError::MissingLayerName { .. }]
    ));
    assert_eq!(recorder.paths[0].2, None);
}

#[test]
fn test_duplicate_id_aborts_walk() {
    let shapes = vec![
        drawable("#coast first", Point::new(0.0, 0.0)),
        group(
            "g",
            identity_group_xfrm(),
            vec![drawable("#coast second", Point::new(0.0, 0.0))],
        ),
    ];
    let mut recorder = Recorder::default();
    let err = TransformComposer::walk(&shapes, AffineTransform::identity(), &mut recorder)
        .unwrap_err();
    assert_eq!(
        err,
        GeometryError::DuplicateShapeId {
            id: "coast".to_string()
        }
    );
    assert!(err.is_fatal());
}

#[test]
fn test_group_ids_share_namespace_with_shapes() {
    let shapes = vec![
        group("#area", identity_group_xfrm(), vec![]),
        drawable("#area", Point::new(0.0, 0.0)),
    ];
    let mut recorder = Recorder::default();
    assert!(TransformComposer::walk(&shapes, AffineTransform::identity(), &mut recorder).is_err());
}

#[test]
fn test_unsupported_shape_is_skipped() {
    let shapes = vec![Shape::Unsupported, drawable("a", Point::new(0.0, 0.0))];
    let mut recorder = Recorder::default();
    let report =
        TransformComposer::walk(&shapes, AffineTransform::identity(), &mut recorder).unwrap();
    assert_eq!(report.drawn_paths, 1);
    assert!(matches!(
        report.diagnostics.as_slice(),
        [GeometryError::UnsupportedShape { .. }]
    ));
}

#[test]
fn test_each_path_definition_is_drawn() {
    let shape = Shape::Freeform(DrawableShape::new(
        "multi",
        Xfrm::new(Point::new(0.0, 0.0), Size::new(100.0, 100.0)),
        vec![square_path(), square_path().with_size(10.0, 10.0)],
    ));
    let mut recorder = Recorder::default();
    let report =
        TransformComposer::walk(&[shape], AffineTransform::identity(), &mut recorder).unwrap();
    assert_eq!(report.drawn_paths, 2);
    // The second path declares a 10x10 box scaled onto the 100x100 extent.
    assert!(recorder.paths[1]
        .1
        .apply(Point::new(10.0, 10.0))
        .approx_eq(&Point::new(100.0, 100.0), 1e-9));
}
