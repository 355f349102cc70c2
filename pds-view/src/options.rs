//! Command-line options for the viewer.

use clap::{Parser, ValueEnum};
use pds_core::{AcceptanceRule, SamplerConfig};

/// Acceptance rule names accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RuleArg {
    /// 5×5 neighbourhood, spacing at least `R`.
    Canonical,
    /// 3×3 neighbourhood, spacing at least `R/√2`.
    Reference,
}

impl From<RuleArg> for AcceptanceRule {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::Canonical => AcceptanceRule::Canonical,
            RuleArg::Reference => AcceptanceRule::Reference,
        }
    }
}

/// Start-up configuration of the viewer.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Interactive Poisson-disk sampling viewer", long_about = None)]
pub struct Options {
    /// Domain width.
    #[arg(long, value_name = "FLOAT", default_value_t = 1000.0)]
    pub width: f32,

    /// Domain height.
    #[arg(long, value_name = "FLOAT", default_value_t = 1000.0)]
    pub height: f32,

    /// Minimum distance between samples (R).
    #[arg(long, short = 'r', value_name = "FLOAT", default_value_t = 10.0)]
    pub min_distance: f32,

    /// Candidates tried around each active point (K).
    #[arg(long, short = 'k', value_name = "NUM", default_value_t = 30)]
    pub attempts: u32,

    /// Random seed. A fresh one is drawn and logged when omitted.
    #[arg(long, short = 's', value_name = "NUM")]
    pub seed: Option<u64>,

    /// Neighbourhood rule used by the acceptance test.
    #[arg(long, value_enum, default_value_t = RuleArg::Canonical)]
    pub rule: RuleArg,

    /// Run the sampler to completion before opening the window.
    #[arg(long)]
    pub finish: bool,
}

impl Options {
    /// Sampler configuration described by the options.
    pub fn config(&self) -> SamplerConfig {
        SamplerConfig {
            width: self.width,
            height: self.height,
            min_distance: self.min_distance,
            attempts: self.attempts,
            seed: self.seed,
            rule: self.rule.into(),
        }
    }
}
