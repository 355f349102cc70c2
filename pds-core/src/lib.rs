//! 2-D Poisson-disk (blue noise) sampling with Bridson's algorithm.
//!
//! Main components:
//! - [`grid`] — background grid holding at most one accepted point per cell.
//! - [`candidates`] — random candidates in an annulus around an active point.
//! - [`acceptance`] — neighbourhood distance test for a candidate.
//! - [`sampler`] — the active-set controller that drives a run to completion.
//! - [`config`] — run parameters and the acceptance rule.
//! - [`types`] — point and domain types.
//! - [`error`] — configuration errors.
//!
//! ```no_run
//! let points = pds_core::sample(100.0, 100.0, 10.0, 30, Some(42)).unwrap();
//! assert!(points.iter().all(|p| p.x < 100.0 && p.y < 100.0));
//! ```

pub mod acceptance;
pub mod candidates;
pub mod config;
pub mod error;
pub mod grid;
pub mod sampler;
pub mod types;

pub use config::{AcceptanceRule, SamplerConfig};
pub use error::SampleError;
pub use sampler::{Sampler, SamplerState, SamplerStats, sample, sample_with};
pub use types::{Domain, Point};
