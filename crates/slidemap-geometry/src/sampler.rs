//! Fixed-resolution curve sampling.
//!
//! Curves are flattened by evaluating them at `samples` evenly spaced
//! parameter values `t = i / samples` for `i = 1..=samples`. The anchor
//! (`t = 0`) is never repeated and the last sample is the exact end point.

use lyon::geom::{point, CubicBezierSegment, QuadraticBezierSegment};

use crate::model::Point;

/// Samples per curve segment unless configured otherwise.
pub const DEFAULT_CURVE_SAMPLES: usize = 200;

fn to_lyon(p: Point) -> lyon::geom::Point<f64> {
    point(p.x, p.y)
}

fn parameters(samples: usize) -> impl Iterator<Item = f64> {
    let n = samples.max(1);
    (1..=n).map(move |i| i as f64 / n as f64)
}

pub fn sample_cubic(from: Point, ctrl1: Point, ctrl2: Point, to: Point, samples: usize) -> Vec<Point> {
    let segment = CubicBezierSegment {
        from: to_lyon(from),
        ctrl1: to_lyon(ctrl1),
        ctrl2: to_lyon(ctrl2),
        to: to_lyon(to),
    };
    let mut points: Vec<Point> = parameters(samples)
        .map(|t| {
            let p = segment.sample(t);
            Point::new(p.x, p.y)
        })
        .collect();
    if let Some(last) = points.last_mut() {
        *last = to;
    }
    points
}

pub fn sample_quadratic(from: Point, ctrl: Point, to: Point, samples: usize) -> Vec<Point> {
    let segment = QuadraticBezierSegment {
        from: to_lyon(from),
        ctrl: to_lyon(ctrl),
        to: to_lyon(to),
    };
    let mut points: Vec<Point> = parameters(samples)
        .map(|t| {
            let p = segment.sample(t);
            Point::new(p.x, p.y)
        })
        .collect();
    if let Some(last) = points.last_mut() {
        *last = to;
    }
    points
}

/// Point of the axis-aligned ellipse with radii `(wr, hr)` lying in
/// direction `theta` from its center.
///
/// DrawingML arc angles are visual angles, not the ellipse's parametric
/// angle, so this intersects the ray with the ellipse.
pub fn ellipse_point(wr: f64, hr: f64, theta: f64) -> Point {
    let (sin, cos) = theta.sin_cos();
    let wr_sin = wr * sin;
    let hr_cos = hr * cos;
    let radius = wr_sin.hypot(hr_cos);
    if radius == 0.0 {
        return Point::new(0.0, 0.0);
    }
    Point::new(wr * hr_cos / radius, hr * wr_sin / radius)
}

/// An elliptical arc resolved against its starting point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub from: Point,
    pub to: Point,
    /// Center implied by `from` lying on the ellipse at `start_angle`.
    pub center: Point,
    pub wr: f64,
    pub hr: f64,
    /// Radians.
    pub start_angle: f64,
    /// Radians, negative for counter-clockwise sweeps.
    pub sweep_angle: f64,
}

impl ArcSegment {
    pub fn new(from: Point, wr: f64, hr: f64, start_angle: f64, sweep_angle: f64) -> Self {
        let start = ellipse_point(wr, hr, start_angle);
        let end = ellipse_point(wr, hr, start_angle + sweep_angle);
        let center = Point::new(from.x - start.x, from.y - start.y);
        Self {
            from,
            to: Point::new(center.x + end.x, center.y + end.y),
            center,
            wr,
            hr,
            start_angle,
            sweep_angle,
        }
    }

    pub fn large_arc(&self) -> bool {
        self.sweep_angle.abs() >= std::f64::consts::PI
    }

    pub fn sweeps_positive(&self) -> bool {
        self.sweep_angle > 0.0
    }
}

pub fn sample_arc(arc: &ArcSegment, samples: usize) -> Vec<Point> {
    let mut points: Vec<Point> = parameters(samples)
        .map(|t| {
            let p = ellipse_point(arc.wr, arc.hr, arc.start_angle + t * arc.sweep_angle);
            Point::new(arc.center.x + p.x, arc.center.y + p.y)
        })
        .collect();
    if let Some(last) = points.last_mut() {
        *last = arc.to;
    }
    points
}
