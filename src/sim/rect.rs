//! Axis-aligned bounding boxes
//!
//! World space is screen-like: x grows right, y grows down, so `top` is the
//! smaller y and `bottom` the larger.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (position is the top-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Strict AABB overlap; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Horizontal ranges overlap (used for landing and lane checks)
    #[inline]
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x
    }

    /// True when `other` lies entirely inside this rect
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.right() <= self.right()
            && other.y >= self.y
            && other.bottom() <= self.bottom()
    }

    /// Grow on every side by `margin`
    pub fn expanded(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Non-negative, finite dimensions and a finite origin
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 0.0, 5.0, 5.0);

        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);

        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_edges() {
        let r = Rect::new(100.0, 500.0, 30.0, 40.0);
        assert_eq!(r.left(), 100.0);
        assert_eq!(r.right(), 130.0);
        assert_eq!(r.top(), 500.0);
        assert_eq!(r.bottom(), 540.0);
        assert_eq!(r.center(), Vec2::new(115.0, 520.0));
    }

    #[test]
    fn test_contains_and_expand() {
        let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
        assert!(bounds.contains_rect(&Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert!(!bounds.contains_rect(&Rect::new(790.0, 10.0, 20.0, 20.0)));
        assert!(bounds.expanded(50.0).contains_rect(&Rect::new(790.0, 10.0, 20.0, 20.0)));
    }

    #[test]
    fn test_validity() {
        assert!(Rect::new(0.0, 0.0, 0.0, 0.0).is_valid());
        assert!(!Rect::new(0.0, 0.0, -1.0, 5.0).is_valid());
        assert!(!Rect::new(f32::NAN, 0.0, 1.0, 1.0).is_valid());
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..200.0, 0.0f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in arb_rect(), b in arb_rect()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn overlap_implies_horizontal_overlap(a in arb_rect(), b in arb_rect()) {
            if a.overlaps(&b) {
                prop_assert!(a.overlaps_horizontally(&b));
            }
        }
    }
}
