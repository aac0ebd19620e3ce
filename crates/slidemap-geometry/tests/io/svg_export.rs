use slidemap_geometry::{
    slide_svg, svg_file_name, DrawableShape, GroupShape, PathCommand, PathDefinition,
    PathInterpreter, Point, Shape, Size, Slide, SvgPathData, Xfrm,
};

const DOT: f64 = 9525.0;

fn path_data(commands: Vec<PathCommand>) -> String {
    let mut data = SvgPathData::new();
    PathInterpreter::new("test").run(&PathDefinition::new(commands), &mut data);
    data.to_path_data()
}

#[test]
fn test_path_data_opcodes_in_device_units() {
    let d = path_data(vec![
        PathCommand::move_to(0.0, 0.0),
        PathCommand::line_to(10.0 * DOT, 0.0),
        PathCommand::quadratic_to(Point::new(15.0 * DOT, 5.0 * DOT), Point::new(10.0 * DOT, 10.0 * DOT)),
        PathCommand::cubic_to(
            Point::new(8.0 * DOT, 12.0 * DOT),
            Point::new(2.0 * DOT, 12.0 * DOT),
            Point::new(0.0, 10.0 * DOT),
        ),
        PathCommand::Close,
    ]);
    assert_eq!(d, "M 0 0 L 10 0 Q 15 5 10 10 C 8 12 2 12 0 10 Z");
}

#[test]
fn test_close_always_emits_z() {
    let d = path_data(vec![
        PathCommand::move_to(0.0, 0.0),
        PathCommand::line_to(DOT, 0.0),
        PathCommand::line_to(0.0, 0.0),
        PathCommand::Close,
    ]);
    assert!(d.ends_with('Z'));
}

#[test]
fn test_arc_opcode_flags() {
    let d = path_data(vec![
        PathCommand::move_to(20.0 * DOT, 10.0 * DOT),
        PathCommand::arc_to(10.0 * DOT, 10.0 * DOT, 0.0, 270.0),
    ]);
    assert_eq!(d, "M 20 10 A 10 10 0 1 1 10 0");

    let d = path_data(vec![
        PathCommand::move_to(20.0 * DOT, 10.0 * DOT),
        PathCommand::arc_to(10.0 * DOT, 10.0 * DOT, 0.0, -90.0),
    ]);
    assert_eq!(d, "M 20 10 A 10 10 0 0 0 10 0");
}

#[test]
fn test_open_path_has_no_z() {
    let d = path_data(vec![
        PathCommand::move_to(0.0, 0.0),
        PathCommand::line_to(DOT, DOT),
        PathCommand::move_to(2.0 * DOT, 0.0),
        PathCommand::line_to(3.0 * DOT, 0.0),
    ]);
    assert_eq!(d, "M 0 0 L 1 1 M 2 0 L 3 0");
}

#[test]
fn test_slide_document_structure() {
    let closed = DrawableShape::new(
        "#lake <big>",
        Xfrm::new(Point::new(DOT, 2.0 * DOT), Size::new(10.0 * DOT, 10.0 * DOT)),
        vec![PathDefinition::new(vec![
            PathCommand::move_to(0.0, 0.0),
            PathCommand::line_to(10.0 * DOT, 0.0),
            PathCommand::line_to(10.0 * DOT, 10.0 * DOT),
            PathCommand::Close,
        ])],
    );
    let open = DrawableShape::new(
        "road",
        Xfrm::new(Point::new(0.0, 0.0), Size::new(DOT, DOT)),
        vec![PathDefinition::new(vec![
            PathCommand::move_to(0.0, 0.0),
            PathCommand::line_to(DOT, DOT),
        ])],
    );
    let group_xfrm = Xfrm::new(Point::new(5.0 * DOT, 0.0), Size::new(100.0 * DOT, 100.0 * DOT))
        .with_child_space(Point::new(0.0, 0.0), Size::new(100.0 * DOT, 100.0 * DOT));
    let slide = Slide {
        shapes: vec![
            Shape::Group(GroupShape::new(
                "#area",
                group_xfrm,
                vec![Shape::AutoShape(closed)],
            )),
            Shape::Connector(open),
        ],
    };

    let result = slide_svg(&slide, 2, Size::new(960.0 * DOT, 540.0 * DOT)).unwrap();
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.document.width, 960.0);
    let svg = result.document.to_svg_string();

    assert!(svg.contains(r#"width="960" height="540" viewBox="0 0 960 540""#));
    assert!(svg.contains("vector-effect: non-scaling-stroke"));
    assert!(svg.contains(r#"<g id="area" transform="matrix(1 0 0 1 5 0)">"#));
    assert!(svg.contains(r#"id="lake" transform="matrix(1 0 0 1 1 2)""#));
    assert!(svg.contains(r##"fill="#808080" opacity="0.3" stroke="red""##));
    assert!(svg.contains(r#"fill="none" stroke="blue""#));
    assert!(svg.find("</g>").unwrap() < svg.find("stroke=\"blue\"").unwrap());
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg_file_name(result.slide), "slide02.svg");
}

fn attribute<'a>(tag: &'a str, name: &str) -> &'a str {
    let start = tag.find(&format!(r#" {}=""#, name)).unwrap() + name.len() + 3;
    let len = tag[start..].find('"').unwrap();
    &tag[start..start + len]
}

fn numbers(text: &str) -> Vec<f64> {
    text.split(|c: char| c == ' ' || c == '(' || c == ')')
        .filter_map(|token| token.parse().ok())
        .collect()
}

#[test]
fn test_small_path_box_keeps_vertex_positions() {
    let parcel = DrawableShape::new(
        "#parcel",
        Xfrm::new(Point::new(0.0, 0.0), Size::new(9_144_000.0, 9_144_000.0)),
        vec![PathDefinition::new(vec![
            PathCommand::move_to(0.0, 0.0),
            PathCommand::line_to(37.5, 0.0),
            PathCommand::line_to(1.0, 50.0),
            PathCommand::Close,
        ])
        .with_size(100.0, 100.0)],
    );
    let slide = Slide {
        shapes: vec![Shape::Freeform(parcel)],
    };
    let svg = slide_svg(&slide, 1, Size::new(9_144_000.0, 9_144_000.0))
        .unwrap()
        .document
        .to_svg_string();

    let tag = svg.lines().find(|l| l.trim_start().starts_with("<path")).unwrap();
    let matrix = numbers(attribute(tag, "transform"));
    let [a, b, c, d, e, f] = matrix[..] else {
        panic!("expected six matrix coefficients in {}", tag);
    };
    let local = numbers(attribute(tag, "d"));
    let placed: Vec<(f64, f64)> = local
        .chunks(2)
        .map(|p| (a * p[0] + c * p[1] + e, b * p[0] + d * p[1] + f))
        .collect();

    let expected = [(0.0, 0.0), (360.0, 0.0), (9.6, 480.0)];
    assert_eq!(placed.len(), expected.len());
    for ((x, y), (ex, ey)) in placed.iter().zip(expected) {
        assert!((x - ex).abs() < 1e-6, "x {} vs {}", x, ex);
        assert!((y - ey).abs() < 1e-6, "y {} vs {}", y, ey);
    }
}
