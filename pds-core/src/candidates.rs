//! Candidate generation around an active point.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::types::Point;

/// Lazily drawn candidates in the annulus `[inner_radius, 2 * inner_radius)`
/// around an origin.
///
/// Yields exactly `attempts` points, each consuming two draws (angle, then
/// distance) from the random source. Candidates are not clipped to the
/// domain; the caller filters them.
#[derive(Debug)]
pub struct Candidates<'a, R: Rng> {
    origin: Point,
    inner_radius: f32,
    remaining: u32,
    rng: &'a mut R,
}

/// Starts a batch of `attempts` candidates around `origin`.
///
/// ### Parameters
/// - `origin` - Active point the candidates surround.
/// - `inner_radius` - Inner radius of the annulus; the outer radius is
///   twice this.
/// - `attempts` - Number of candidates to draw.
/// - `rng` - Random source, borrowed until the iterator is dropped.
pub fn generate_candidates<R: Rng>(
    origin: Point,
    inner_radius: f32,
    attempts: u32,
    rng: &mut R,
) -> Candidates<'_, R> {
    Candidates {
        origin,
        inner_radius,
        remaining: attempts,
        rng,
    }
}

impl<R: Rng> Iterator for Candidates<'_, R> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let angle = self.rng.random_range(0.0..TAU);
        let distance = self
            .rng
            .random_range(self.inner_radius..2.0 * self.inner_radius);
        Some(self.origin + Vec2::from_angle(angle) * distance)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl<R: Rng> ExactSizeIterator for Candidates<'_, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn yields_exactly_attempts_points() {
        let mut rng = StdRng::seed_from_u64(1);
        let it = generate_candidates(Vec2::ZERO, 1.0, 30, &mut rng);

        assert_eq!(it.len(), 30);
        assert_eq!(it.count(), 30);
    }

    #[test]
    fn zero_attempts_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(generate_candidates(Vec2::ZERO, 1.0, 0, &mut rng).count(), 0);
    }

    #[test]
    fn candidates_lie_in_annulus() {
        let mut rng = StdRng::seed_from_u64(2);
        let origin = Vec2::new(50.0, -20.0);
        let inner = 7.0;

        for c in generate_candidates(origin, inner, 2000, &mut rng) {
            let d = c.distance(origin);
            assert!(d >= inner - 1e-3, "too close: {d}");
            assert!(d < 2.0 * inner + 1e-3, "too far: {d}");
        }
    }

    #[test]
    fn candidates_cover_all_directions() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut quadrants = [0usize; 4];

        for c in generate_candidates(Vec2::ZERO, 1.0, 400, &mut rng) {
            let q = match (c.x >= 0.0, c.y >= 0.0) {
                (true, true) => 0,
                (false, true) => 1,
                (false, false) => 2,
                (true, false) => 3,
            };
            quadrants[q] += 1;
        }

        assert!(quadrants.iter().all(|&n| n > 50), "{quadrants:?}");
    }

    #[test]
    fn same_seed_same_candidates() {
        let a: Vec<_> =
            generate_candidates(Vec2::ONE, 2.0, 10, &mut StdRng::seed_from_u64(11)).collect();
        let b: Vec<_> =
            generate_candidates(Vec2::ONE, 2.0, 10, &mut StdRng::seed_from_u64(11)).collect();
        assert_eq!(a, b);
    }
}
