//! Polar view of `Vec2` in screen degrees
//!
//! Angles are in degrees, 0° along +x and increasing clockwise on screen
//! (y points down). Every setter is a pure function returning a new vector so
//! the polar/cartesian round trip is visible at the call site.

use glam::Vec2;

/// Heading of `v` in degrees, in (-180, 180]. The zero vector has angle 0.
#[inline]
pub fn angle_deg(v: Vec2) -> f32 {
    if v == Vec2::ZERO {
        return 0.0;
    }
    v.y.atan2(v.x).to_degrees()
}

/// `v` pointed along `deg`, keeping its length. Any real angle is accepted.
#[inline]
pub fn set_angle(v: Vec2, deg: f32) -> Vec2 {
    from_polar(v.length(), deg)
}

/// `v` scaled to `len`, keeping its heading. A zero vector stays zero.
#[inline]
pub fn set_length(v: Vec2, len: f32) -> Vec2 {
    v.normalize_or_zero() * len
}

/// `v` rotated by `delta_deg`, keeping its length
#[inline]
pub fn rotate(v: Vec2, delta_deg: f32) -> Vec2 {
    let (sin, cos) = delta_deg.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Vector of length `len` pointing along `deg`
#[inline]
pub fn from_polar(len: f32, deg: f32) -> Vec2 {
    let (sin, cos) = deg.to_radians().sin_cos();
    Vec2::new(len * cos, len * sin)
}

/// Unit vector along `v`, or zero when `v` is degenerate
#[inline]
pub fn normalized(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Normalize an angle into (-180, 180]
#[inline]
pub fn wrap_deg(deg: f32) -> f32 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Smallest absolute difference between two headings, in [0, 180]
#[inline]
pub fn angle_between(a: f32, b: f32) -> f32 {
    wrap_deg(a - b).abs()
}
