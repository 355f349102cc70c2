use glam::Vec2;
use rand::Rng;

/// An accepted sample position.
///
/// Points are plain `glam` vectors in domain coordinates, with the origin
/// at the domain's lower-left corner.
pub type Point = Vec2;

/// Linear index of a cell in an [`crate::grid::AccelerationGrid`].
///
/// Only meaningful for the grid that produced it.
pub type CellIndex = usize;

/// Axis-aligned sampling rectangle `[0, width) × [0, height)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    pub width: f32,
    pub height: f32,
}

impl Domain {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Domain extents as a vector `(width, height)`.
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Returns `true` if `p` lies in the half-open rectangle.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.x < self.width && p.y >= 0.0 && p.y < self.height
    }

    /// Draws a point uniformly from the domain.
    pub fn random_point(&self, rng: &mut impl Rng) -> Point {
        let x = rng.random_range(0.0..self.width);
        let y = rng.random_range(0.0..self.height);
        Vec2::new(x, y)
    }
}
