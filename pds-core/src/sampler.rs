//! Active-set controller: drives dart throwing to completion.
//!
//! A run goes through three states:
//! 1. [`SamplerState::Idle`] — nothing placed yet. The first
//!    [`Sampler::step`] drops a uniformly random seed point.
//! 2. [`SamplerState::Active`] — each step pops the most recently accepted
//!    point, throws `K` candidates around it, and keeps every candidate that
//!    lands inside the domain, in a free cell, and far enough from its
//!    neighbours. Kept candidates join the active set; the popped point is
//!    retired for good.
//! 3. [`SamplerState::Done`] — the active set ran dry.
//!
//! Every accepted point is popped exactly once, and no cell holds more than
//! one point, so a run takes at most `rows * cols + 1` steps.

use std::ops::Range;

use log::{debug, info, trace};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    acceptance::accepts,
    candidates::generate_candidates,
    config::SamplerConfig,
    error::SampleError,
    grid::AccelerationGrid,
    types::{CellIndex, Point},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplerState {
    Idle,
    Active,
    Done,
}

/// Counters collected over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SamplerStats {
    /// Active points popped and expanded.
    pub steps: usize,
    /// Candidates drawn.
    pub candidates: usize,
    pub rejected_outside_domain: usize,
    pub rejected_outside_grid: usize,
    pub rejected_occupied: usize,
    pub rejected_too_close: usize,
    /// Accepted points, seed included.
    pub accepted: usize,
}

impl SamplerStats {
    pub fn rejected(&self) -> usize {
        self.rejected_outside_domain
            + self.rejected_outside_grid
            + self.rejected_occupied
            + self.rejected_too_close
    }
}

/// One Poisson-disk sampling run.
///
/// Owns the acceleration grid, the active set, the accepted points, and
/// the random source. Nothing is shared between instances, so separate
/// runs are independent.
#[derive(Debug)]
pub struct Sampler<R: Rng = StdRng> {
    cfg: SamplerConfig,
    seed: Option<u64>,
    rng: R,
    grid: AccelerationGrid,
    active: Vec<Point>,
    points: Vec<Point>,
    state: SamplerState,
    stats: SamplerStats,
}

impl Sampler<StdRng> {
    /// Creates a sampler seeded from `cfg.seed`.
    ///
    /// Without a seed, a fresh one is drawn from the thread-local generator
    /// and logged, so the run can be replayed by passing it back in.
    ///
    /// ### Errors
    /// [`SampleError::InvalidConfiguration`] if `cfg` fails validation.
    pub fn new(cfg: SamplerConfig) -> Result<Self, SampleError> {
        let seed = match cfg.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::rng().random();
                info!("no seed given, sampling with seed {seed}");
                seed
            }
        };

        let mut sampler = Self::with_rng(cfg, StdRng::seed_from_u64(seed))?;
        sampler.seed = Some(seed);
        Ok(sampler)
    }
}

impl<R: Rng> Sampler<R> {
    /// Creates a sampler drawing from an injected random source.
    ///
    /// `cfg.seed` is ignored and [`Sampler::seed`] reports `None`.
    ///
    /// ### Errors
    /// [`SampleError::InvalidConfiguration`] if `cfg` fails validation. No
    /// grid is allocated in that case.
    pub fn with_rng(cfg: SamplerConfig, rng: R) -> Result<Self, SampleError> {
        cfg.validate()?;

        let grid = AccelerationGrid::new(cfg.domain(), cfg.cell_width());
        debug!(
            "sampler grid: {} x {} cells of width {:.4} over {} x {} ({:?} rule)",
            grid.cols(),
            grid.rows(),
            grid.cell_width(),
            cfg.width,
            cfg.height,
            cfg.rule
        );

        Ok(Self {
            cfg,
            seed: None,
            rng,
            grid,
            active: Vec::new(),
            points: Vec::new(),
            state: SamplerState::Idle,
            stats: SamplerStats::default(),
        })
    }

    #[inline]
    pub fn config(&self) -> &SamplerConfig {
        &self.cfg
    }

    /// Seed actually used, if the random source was built from one.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    #[inline]
    pub fn state(&self) -> SamplerState {
        self.state
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.state == SamplerState::Done
    }

    /// Accepted points in acceptance order.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Points still waiting to be expanded; the last one is popped next.
    #[inline]
    pub fn active_points(&self) -> &[Point] {
        &self.active
    }

    #[inline]
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn grid(&self) -> &AccelerationGrid {
        &self.grid
    }

    #[inline]
    pub fn stats(&self) -> &SamplerStats {
        &self.stats
    }

    /// Advances the run by one transition.
    ///
    /// ### Returns
    /// The range of [`Sampler::points`] accepted during this step. Empty
    /// once the run is done.
    pub fn step(&mut self) -> Range<usize> {
        let start = self.points.len();

        match self.state {
            SamplerState::Idle => self.place_seed(),
            SamplerState::Active => self.expand_next(),
            SamplerState::Done => {}
        }

        start..self.points.len()
    }

    /// Steps until the active set is exhausted.
    pub fn run(&mut self) -> &[Point] {
        while self.state != SamplerState::Done {
            self.step();
        }
        &self.points
    }

    /// Consumes the sampler, returning the accepted points.
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    fn place_seed(&mut self) {
        let p = self.cfg.domain().random_point(&mut self.rng);
        let index = self.grid.cell_index(p);

        // A domain point always maps into the grid.
        if self.grid.in_bounds(index) {
            let index = index as CellIndex;
            self.grid.occupy(index, p);
            self.active.push(p);
            self.points.push(p);
            self.stats.accepted += 1;
            trace!("seed point {p} in cell {index}");
        }

        self.finish_step();
    }

    fn expand_next(&mut self) {
        let Some(origin) = self.active.pop() else {
            self.finish_step();
            return;
        };

        let rule = self.cfg.rule;
        let min_distance = self.cfg.min_distance;
        let inner_radius = self.cfg.threshold();
        let attempts = self.cfg.attempts;
        let domain = self.cfg.domain();

        let Self {
            rng,
            grid,
            active,
            points,
            stats,
            ..
        } = self;
        stats.steps += 1;
        let before = points.len();

        for c in generate_candidates(origin, inner_radius, attempts, rng) {
            stats.candidates += 1;

            if !domain.contains(c) {
                stats.rejected_outside_domain += 1;
                continue;
            }

            let index = grid.cell_index(c);
            if !grid.in_bounds(index) {
                stats.rejected_outside_grid += 1;
                continue;
            }
            let index = index as CellIndex;

            if grid.is_occupied(index) {
                stats.rejected_occupied += 1;
                continue;
            }

            if !accepts(c, grid, rule, min_distance) {
                stats.rejected_too_close += 1;
                continue;
            }

            grid.occupy(index, c);
            active.push(c);
            points.push(c);
            stats.accepted += 1;
        }

        trace!(
            "expanded {origin}: {} accepted, {} active",
            points.len() - before,
            active.len()
        );

        self.finish_step();
    }

    fn finish_step(&mut self) {
        self.state = if self.active.is_empty() {
            SamplerState::Done
        } else {
            SamplerState::Active
        };

        if self.state == SamplerState::Done {
            let s = &self.stats;
            debug!(
                "sampling done: {} points in {} steps, {} candidates \
                 ({} outside domain, {} outside grid, {} occupied, {} too close)",
                s.accepted,
                s.steps,
                s.candidates,
                s.rejected_outside_domain,
                s.rejected_outside_grid,
                s.rejected_occupied,
                s.rejected_too_close
            );
        }
    }
}

/// Generates a Poisson-disk point set over `[0, width) × [0, height)`.
///
/// Uses [`crate::config::AcceptanceRule::Canonical`]. With `seed` set the
/// output is reproducible bit for bit; without it a fresh seed is drawn and
/// logged at `info` level.
///
/// ### Parameters
/// - `width`, `height` - Domain extents, both positive.
/// - `min_distance` - Minimum spacing `R`, positive.
/// - `attempts` - Candidates per active point `K`, at least 1.
/// - `seed` - Optional random seed.
///
/// ### Returns
/// Accepted points in acceptance order, the seed point first.
///
/// ### Errors
/// [`SampleError::InvalidConfiguration`] if any argument is out of range.
pub fn sample(
    width: f32,
    height: f32,
    min_distance: f32,
    attempts: u32,
    seed: Option<u64>,
) -> Result<Vec<Point>, SampleError> {
    let cfg = SamplerConfig {
        seed,
        ..SamplerConfig::new(width, height, min_distance, attempts)
    };
    sample_with(&cfg)
}

/// Like [`sample`], taking a full configuration.
pub fn sample_with(cfg: &SamplerConfig) -> Result<Vec<Point>, SampleError> {
    let mut sampler = Sampler::new(cfg.clone())?;
    sampler.run();
    Ok(sampler.into_points())
}
