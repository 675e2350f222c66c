//! World camera: a fixed-size viewport window into world space
//!
//! One camera exists per independently scrolling layer. The primary camera
//! follows the player; background layers follow it at a fraction of its
//! displacement to fake depth.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned world rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Square of side `2 * radius` centred on `center`
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self {
            pos: center - Vec2::splat(radius),
            size: Vec2::splat(radius * 2.0),
        }
    }

    pub fn corners(&self) -> [Vec2; 4] {
        let Vec2 { x: l, y: t } = self.pos;
        let Vec2 { x: r, y: b } = self.pos + self.size;
        [Vec2::new(l, t), Vec2::new(l, b), Vec2::new(r, t), Vec2::new(r, b)]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera {
    /// Top-left of the viewport in world space
    pub position: Vec2,
    width: f32,
    height: f32,
}

impl Camera {
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            position,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.position.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.position.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.position.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y + self.height
    }

    pub fn set_left(&mut self, value: f32) {
        self.position.x = value;
    }

    pub fn set_right(&mut self, value: f32) {
        self.position.x = value - self.width;
    }

    pub fn set_top(&mut self, value: f32) {
        self.position.y = value;
    }

    pub fn set_bottom(&mut self, value: f32) {
        self.position.y = value - self.height;
    }

    pub fn center(&self) -> Vec2 {
        self.position + Vec2::new(self.width, self.height) / 2.0
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    #[inline]
    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        p - self.position
    }

    #[inline]
    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        p + self.position
    }

    /// Inclusive containment test against the viewport
    pub fn point_visible(&self, p: Vec2) -> bool {
        self.left() <= p.x && p.x <= self.right() && self.top() <= p.y && p.y <= self.bottom()
    }

    /// True when any corner of `rect` is on screen.
    ///
    /// Corner sampling only: a rectangle larger than the viewport that
    /// straddles it without a corner inside reports not visible.
    pub fn rect_visible(&self, rect: &Rect) -> bool {
        rect.corners().iter().any(|&c| self.point_visible(c))
    }

    /// Ease horizontally so `target_x` drifts toward the viewport centre
    pub fn track_x(&mut self, target_x: f32, gain: f32) {
        self.position.x += (target_x - self.width / 2.0 - self.position.x) * gain;
    }

    /// Parallax layer: sit at `primary.position / divisor`
    pub fn follow_parallax(&mut self, primary: &Camera, divisor: f32) {
        self.position = primary.position / divisor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Vec2::new(100.0, 50.0), 800.0, 600.0)
    }

    #[test]
    fn test_edges_keep_size() {
        let mut cam = camera();
        assert_eq!(cam.right(), 900.0);
        assert_eq!(cam.bottom(), 650.0);

        cam.set_right(1000.0);
        assert_eq!(cam.left(), 200.0);
        assert_eq!(cam.width(), 800.0);

        cam.set_bottom(600.0);
        assert_eq!(cam.top(), 0.0);
        assert_eq!(cam.height(), 600.0);
    }

    #[test]
    fn test_screen_world_roundtrip() {
        let cam = camera();
        let p = Vec2::new(345.0, 210.0);
        assert_eq!(cam.world_to_screen(p), Vec2::new(245.0, 160.0));
        assert_eq!(cam.screen_to_world(cam.world_to_screen(p)), p);
    }

    #[test]
    fn test_point_visible_inclusive() {
        let cam = camera();
        assert!(cam.point_visible(Vec2::new(100.0, 50.0)));
        assert!(cam.point_visible(Vec2::new(900.0, 650.0)));
        assert!(!cam.point_visible(Vec2::new(900.1, 300.0)));
        assert!(!cam.point_visible(Vec2::new(500.0, 49.0)));
    }

    #[test]
    fn test_rect_visible_by_corner() {
        let cam = camera();
        let partly = Rect::new(Vec2::new(880.0, 300.0), Vec2::new(50.0, 50.0));
        assert!(cam.rect_visible(&partly));
        let off = Rect::new(Vec2::new(950.0, 300.0), Vec2::new(50.0, 50.0));
        assert!(!cam.rect_visible(&off));
    }

    #[test]
    fn test_rect_straddling_without_corner_is_not_visible() {
        // Documented approximation: a rect wider and taller than the view
        let cam = camera();
        let huge = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(2000.0, 2000.0));
        assert!(!cam.rect_visible(&huge));
    }

    #[test]
    fn test_parallax_layers() {
        let mut primary = camera();
        primary.translate(Vec2::new(300.0, 0.0));
        let mut mid = camera();
        let mut far = camera();
        mid.follow_parallax(&primary, 2.0);
        far.follow_parallax(&primary, 4.0);
        assert_eq!(mid.position, Vec2::new(200.0, 25.0));
        assert_eq!(far.position, Vec2::new(100.0, 12.5));
    }

    #[test]
    fn test_track_x_eases() {
        let mut cam = Camera::new(Vec2::ZERO, 800.0, 600.0);
        cam.track_x(1400.0, 0.05);
        // target left edge is 1000, closes 5% of the gap
        assert!((cam.left() - 50.0).abs() < 1e-4);
    }
}
