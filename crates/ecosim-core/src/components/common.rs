//! Geometry and motion components shared by every agent kind.

use serde::{Deserialize, Serialize};

/// 2D vector (y axis points up)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `degrees` counter-clockwise from +x
    pub fn from_angle_degrees(degrees: f32) -> Self {
        let rad = degrees.to_radians();
        Self::new(rad.cos(), rad.sin())
    }

    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        (*self - *other).length_squared()
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Scale down so the length never exceeds `max_len`.
    /// A zero limit collapses the vector to zero.
    pub fn clamp_length(&self, max_len: f32) -> Self {
        if max_len <= 0.0 {
            return Self::ZERO;
        }
        let factor = self.length_squared() / (max_len * max_len);
        if factor > 1.0 {
            *self * (1.0 / factor.sqrt())
        } else {
            *self
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// Axis-aligned rectangle, `min` is the bottom-left corner
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.max.x
    }

    pub fn bottom(&self) -> f32 {
        self.min.y
    }

    pub fn top(&self) -> f32 {
        self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn contains(&self, point: &Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Strict overlap; rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Square footprint plus motion state of an agent.
///
/// `velocity` is in arena units per tick. `base_force` is the low-pass
/// filtered drift that smooths idle wandering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub center: Vec2,
    pub size: f32,
    pub velocity: Vec2,
    pub base_force: Vec2,
    pub max_speed: f32,
}

impl Body {
    /// Place a body by its left and top edges
    pub fn from_left_top(left: f32, top: f32, size: f32) -> Self {
        Self {
            center: Vec2::new(left + size / 2.0, top - size / 2.0),
            size,
            velocity: Vec2::ZERO,
            base_force: Vec2::ZERO,
            max_speed: crate::constants::DEFAULT_MAX_SPEED,
        }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.size / 2.0
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.size / 2.0
    }

    pub fn top(&self) -> f32 {
        self.center.y + self.size / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.center.y - self.size / 2.0
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::new(
            Vec2::new(self.left(), self.bottom()),
            Vec2::new(self.right(), self.top()),
        )
    }

    pub fn collides_with(&self, other: &Body) -> bool {
        self.bounding_box().overlaps(&other.bounding_box())
    }

    pub fn covers(&self, point: &Vec2) -> bool {
        self.bounding_box().contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_operations() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);

        let sum = a + b;
        assert_eq!(sum, Vec2::new(5.0, 8.0));
        assert_eq!(b - a, Vec2::new(3.0, 4.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn test_clamp_length() {
        let v = Vec2::new(3.0, 4.0);
        let clamped = v.clamp_length(1.0);
        assert!((clamped.length() - 1.0).abs() < 1e-5);

        // Short vectors are untouched
        assert_eq!(v.clamp_length(10.0), v);

        assert_eq!(v.clamp_length(0.0), Vec2::ZERO);
    }

    #[test]
    fn test_body_edges() {
        let body = Body::from_left_top(10.0, 100.0, 50.0);
        assert_eq!(body.left(), 10.0);
        assert_eq!(body.top(), 100.0);
        assert_eq!(body.right(), 60.0);
        assert_eq!(body.bottom(), 50.0);
        assert_eq!(body.center, Vec2::new(35.0, 75.0));
    }

    #[test]
    fn test_collision_is_strict() {
        let a = Body::from_left_top(0.0, 50.0, 50.0);
        let touching = Body::from_left_top(50.0, 50.0, 50.0);
        let overlapping = Body::from_left_top(49.0, 50.0, 50.0);

        assert!(!a.collides_with(&touching));
        assert!(a.collides_with(&overlapping));
    }

    #[test]
    fn test_covers_point() {
        let body = Body::from_left_top(0.0, 50.0, 50.0);
        assert!(body.covers(&Vec2::new(25.0, 25.0)));
        assert!(!body.covers(&Vec2::new(75.0, 25.0)));
    }
}
