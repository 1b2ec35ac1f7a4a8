//! Trajectories: one particle's live position and bounded path history.

use std::collections::VecDeque;

use glam::Vec3;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::color::SPAWN_COLOR;
use crate::guard::{is_valid, sanitize};

/// Distance a spawned trajectory is nudged away from its seed.
pub const SPAWN_JITTER: f32 = 0.1;

/// One recorded step of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub position: Vec3,
    pub color: Vec3,
}

/// A simulated particle and the most recent part of its path.
///
/// History is a fixed-capacity FIFO, oldest first. When full, pushing a new
/// point evicts the oldest one.
#[derive(Debug, Clone)]
pub struct Trajectory {
    history: VecDeque<HistoryPoint>,
    max_points: usize,
    current_position: Vec3,
}

impl Trajectory {
    /// Start a trajectory exactly at `start` with a single white history
    /// entry. `max_points` is raised to at least one.
    pub fn new(start: Vec3, max_points: usize) -> Self {
        let max_points = max_points.max(1);
        let mut history = VecDeque::with_capacity(max_points);
        history.push_back(HistoryPoint {
            position: start,
            color: SPAWN_COLOR,
        });
        Self {
            history,
            max_points,
            current_position: start,
        }
    }

    /// Spawn a trajectory near `seed`.
    ///
    /// An unusable seed is replaced by the default seed. The start point is
    /// then offset by [`SPAWN_JITTER`] in a uniformly random direction; if
    /// the offset point fails the guard the unperturbed seed is used.
    pub fn spawn<R: Rng + ?Sized>(seed: Vec3, max_radius: f32, max_points: usize, rng: &mut R) -> Self {
        let seed = sanitize(seed, max_radius);
        let start = seed + random_direction(rng) * SPAWN_JITTER;
        let start = if is_valid(start, max_radius) { start } else { seed };
        Self::new(start, max_points)
    }

    /// The position integration advances from.
    #[inline]
    pub fn current_position(&self) -> Vec3 {
        self.current_position
    }

    /// Maximum number of history entries kept.
    #[inline]
    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Number of history entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// History entries, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &HistoryPoint> + '_ {
        self.history.iter()
    }

    /// First (oldest) history entry.
    pub fn first(&self) -> Option<&HistoryPoint> {
        self.history.front()
    }

    /// Newest history entry.
    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.history.back()
    }

    /// The two newest positions as `(previous, latest)`.
    pub fn last_two(&self) -> Option<(Vec3, Vec3)> {
        let n = self.history.len();
        if n < 2 {
            return None;
        }
        Some((self.history[n - 2].position, self.history[n - 1].position))
    }

    /// Append an accepted step and make it the current position.
    pub(crate) fn push(&mut self, position: Vec3, color: Vec3) {
        if self.history.len() == self.max_points {
            self.history.pop_front();
        }
        self.history.push_back(HistoryPoint { position, color });
        self.current_position = position;
    }

    /// Consecutive pairs of renderable history points.
    ///
    /// Points failing the guard are skipped, so their neighbours are joined
    /// directly.
    pub fn segments(&self, max_radius: f32) -> impl Iterator<Item = (HistoryPoint, HistoryPoint)> + '_ {
        let mut valid = self
            .history
            .iter()
            .copied()
            .filter(move |p| is_valid(p.position, max_radius));
        let mut prev = valid.next();
        valid.map_while(move |next| {
            let start = prev.replace(next)?;
            Some((start, next))
        })
    }
}

/// Uniformly distributed unit vector: normalized standard-normal samples.
fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let v = Vec3::new(
        rng.sample(StandardNormal),
        rng.sample(StandardNormal),
        rng.sample(StandardNormal),
    );
    v.normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::DEFAULT_SEED;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_starts_with_single_white_point() {
        let t = Trajectory::new(Vec3::ONE, 10);
        assert_eq!(t.len(), 1);
        assert_eq!(t.first().unwrap().color, SPAWN_COLOR);
        assert_eq!(t.current_position(), Vec3::ONE);
        assert!(t.last_two().is_none());
    }

    #[test]
    fn test_history_is_fifo_bounded() {
        let mut t = Trajectory::new(Vec3::ZERO, 3);
        for i in 1..=5 {
            t.push(Vec3::splat(i as f32), Vec3::ZERO);
            assert!(t.len() <= 3);
        }
        let xs: Vec<f32> = t.history().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![3.0, 4.0, 5.0]);
        assert_eq!(t.current_position(), Vec3::splat(5.0));
        assert_eq!(t.last_two(), Some((Vec3::splat(4.0), Vec3::splat(5.0))));
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut t = Trajectory::new(Vec3::ZERO, 0);
        t.push(Vec3::X, Vec3::ONE);
        assert_eq!(t.len(), 1);
        assert_eq!(t.latest().unwrap().position, Vec3::X);
    }

    #[test]
    fn test_spawn_jitters_by_fixed_distance() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let t = Trajectory::spawn(DEFAULT_SEED, 1000.0, 10, &mut rng);
            let offset = (t.current_position() - DEFAULT_SEED).length();
            assert!((offset - SPAWN_JITTER).abs() < 1e-4);
            assert_eq!(t.first().unwrap().color, SPAWN_COLOR);
        }
    }

    #[test]
    fn test_spawn_from_invalid_seed_uses_default() {
        let mut rng = SmallRng::seed_from_u64(1);
        let t = Trajectory::spawn(Vec3::splat(f32::NAN), 1000.0, 10, &mut rng);
        assert!((t.current_position() - DEFAULT_SEED).length() <= SPAWN_JITTER + 1e-4);
    }

    #[test]
    fn test_spawn_falls_back_to_seed_at_boundary() {
        // A seed on the boundary of a tiny radius: any outward jitter fails the
        // guard, so the spawn lands on the seed or inside the ball.
        let mut rng = SmallRng::seed_from_u64(3);
        let seed = Vec3::new(0.5, 0.0, 0.0);
        for _ in 0..50 {
            let t = Trajectory::spawn(seed, 0.5, 4, &mut rng);
            assert!(is_valid(t.current_position(), 0.5));
        }
    }

    #[test]
    fn test_segments_skip_invalid_points() {
        let mut t = Trajectory::new(Vec3::ZERO, 8);
        t.push(Vec3::X, Vec3::ONE);
        t.push(Vec3::splat(f32::NAN), Vec3::ONE);
        t.push(Vec3::Y, Vec3::ONE);

        let segs: Vec<(Vec3, Vec3)> = t
            .segments(10.0)
            .map(|(a, b)| (a.position, b.position))
            .collect();
        assert_eq!(segs, vec![(Vec3::ZERO, Vec3::X), (Vec3::X, Vec3::Y)]);
    }

    #[test]
    fn test_single_point_has_no_segments() {
        let t = Trajectory::new(Vec3::ZERO, 8);
        assert_eq!(t.segments(10.0).count(), 0);
    }
}
