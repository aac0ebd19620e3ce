//! Spherical Web-Mercator (EPSG:3857) projection.
//!
//! Slides are laid out as planar "world" coordinates in metres, centered on
//! the slide center with Y pointing north, then unprojected to degrees.

use std::f64::consts::PI;

use crate::model::{Point, Size};
use crate::transform::AffineTransform;

/// Half the equatorial circumference of the Web-Mercator sphere, in metres.
pub const HALF_WORLD_CIRCUMFERENCE: f64 = 20_037_508.342_789_244;

/// World metres per EMU unless configured otherwise.
pub const DEFAULT_METRES_PER_EMU: f64 = 0.01;

/// Base transform from slide EMU to world metres.
///
/// The slide center maps to the origin and Y is inverted, since document
/// coordinates grow downwards.
pub fn world_transform(slide_size: Size, metres_per_emu: f64) -> AffineTransform {
    AffineTransform::scale(metres_per_emu, -metres_per_emu)
        * AffineTransform::translation(-slide_size.width / 2.0, -slide_size.height / 2.0)
}

/// World metres to `(longitude, latitude)` in degrees.
pub fn to_lon_lat(world: Point) -> (f64, f64) {
    let lon = world.x * 180.0 / HALF_WORLD_CIRCUMFERENCE;
    let lat = (world.y * PI / HALF_WORLD_CIRCUMFERENCE).exp().atan() * 360.0 / PI - 90.0;
    (lon, lat)
}

/// `(longitude, latitude)` in degrees to world metres.
pub fn from_lon_lat(lon: f64, lat: f64) -> Point {
    let x = lon * HALF_WORLD_CIRCUMFERENCE / 180.0;
    let y = ((90.0 + lat) * PI / 360.0).tan().ln() * HALF_WORLD_CIRCUMFERENCE / PI;
    Point::new(x, y)
}
